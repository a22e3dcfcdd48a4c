//! Assistant Backend Adapter
//!
//! HTTP implementation of `WheelBackendPort` with:
//! - Lenient decoding of broker-sourced numbers
//! - Retry with exponential backoff for idempotent requests
//! - Single-shot submission for requests that create orders

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::HttpWheelBackend;
pub use config::{BackendHttpConfig, DEFAULT_BASE_URL, RetryConfig};
pub use error::BackendHttpError;
