//! Data Transfer Objects
//!
//! Reports returned by bulk use cases to the presentation layer.

mod bulk_dto;

pub use bulk_dto::{BulkOutcome, ItemFailure};
