use thiserror::Error;

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[cfg(feature = "sled")]
    #[error("Sled Error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Encode Error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Decode Error for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: bincode::error::DecodeError,
    },

    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    #[error("Invalid Config: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}
