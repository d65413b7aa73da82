//! Shared error definitions and utilities used across all courier crates.

pub mod error;
pub mod time;

pub use {
    error::{Error, FromMessage, Result},
    time::now_ms,
};
