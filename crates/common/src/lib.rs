//! Shared error definitions and time utilities used across all warden crates.

pub mod error;
pub mod time;

pub use error::{Error, Result};
