//! Domain layer for FilmSay.
//!
//! Entity models, the error taxonomy, and the port traits that adapter
//! crates implement. This crate performs no I/O of its own.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{DomainError, Result};
pub use models::*;
pub use ports::*;
