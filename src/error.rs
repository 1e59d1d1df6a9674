use thiserror::Error;

/// Failures at the edges of the crate: configuration, names typed by a user
/// and long-form content. Calendar and astronomy computations never fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unknown {kind}: {name:?}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Fetch of {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
