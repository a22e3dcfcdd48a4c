//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `backend/`: Assistant backend over HTTP
//!   - `persistence/`: JSON file settings store
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod backend;
pub mod config;
pub mod persistence;
