//! RecDB common types, errors, and configuration.
//!
//! This crate provides shared definitions used by the storage crate.

pub mod config;
pub mod error;
pub mod record;

pub use config::{MAX_INITIAL_CAPACITY, TableConfig};
pub use error::{RecDbError, Result};
pub use record::{Position, Record};
