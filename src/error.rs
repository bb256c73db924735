//! Error type shared by the entry points and the FFI layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutofillError>;

#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("Malformed value manifest: {0}")]
    MalformedManifest(#[source] serde_json::Error),

    #[error("Malformed config: {0}")]
    MalformedConfig(#[source] serde_json::Error),

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("{0} is null")]
    NullPointer(&'static str),
}
