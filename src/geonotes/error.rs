use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeonotesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl GeonotesError {
    /// Stable name of the error kind, used as the prefix of system failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GeonotesError::Io(_) => "IoError",
            GeonotesError::Serialization(_) => "SerializationError",
            GeonotesError::Store(_) => "StoreError",
            GeonotesError::PasswordHash(_) => "PasswordHashError",
            GeonotesError::Config(_) => "ConfigError",
            GeonotesError::Logging(_) => "LoggingError",
        }
    }

    /// The underlying message without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            GeonotesError::Io(e) => e.to_string(),
            GeonotesError::Serialization(e) => e.to_string(),
            GeonotesError::Store(msg)
            | GeonotesError::PasswordHash(msg)
            | GeonotesError::Config(msg)
            | GeonotesError::Logging(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeonotesError>;
