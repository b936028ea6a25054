use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Device returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<&str> for TelemetryError {
    fn from(error: &str) -> Self {
        TelemetryError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
