//! Per-user conversation sessions and their file-backed store.
//!
//! One self-describing JSON record per user at
//! `<storage dir>/<sanitized user_id>.json`. History is bounded: the
//! store trims to the configured `max_history` before every save,
//! dropping the oldest entries first.

pub mod error;
pub mod message;
pub mod session;
pub mod store;

pub use {
    error::{Error, Result},
    message::{Message, Role},
    session::Session,
    store::SessionStore,
};
