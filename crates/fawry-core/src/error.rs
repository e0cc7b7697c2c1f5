//! Error types for the Fawry gateway integration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A field the signature recipe needs is absent from the input.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid value for field {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    /// The gateway answered 2xx but reported a failure in the body.
    #[error("Gateway error {status_code}: {description}")]
    Gateway {
        status_code: i32,
        description: String,
        kind: Option<String>,
    },

    #[error("Notification signature does not match")]
    SignatureMismatch,
}

impl Error {
    pub(crate) fn invalid(field: &'static str, message: impl ToString) -> Self {
        Error::InvalidField {
            field,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
