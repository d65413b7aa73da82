use thiserror::Error;

/// Catalog loading is the only fallible surface here; everything is a
/// contextualized message built through [`Context`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),
}

impl courier_common::FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message(message)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

courier_common::impl_context!();
