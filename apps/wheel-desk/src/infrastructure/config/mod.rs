//! Infrastructure Configuration
//!
//! Dependency injection container for wiring application components.

pub mod container;

pub use container::{AppContainer, ContainerError, HttpContainer};
