//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces to the assistant backend and the settings store
//! - **Services**: The dashboard session and the order status poller
//! - **Use Cases**: Refresh, roll, order and ticker workflows
//! - **DTOs**: Outcome reports for bulk operations

pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use services::*;
pub use use_cases::*;
