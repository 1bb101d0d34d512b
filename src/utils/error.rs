use serde::Serialize;
use thiserror::Error;

/// Domain-level failure classification handed to callers inside `Resource::Failure`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum AppError {
    #[error("Network error: the data source could not be reached")]
    NetworkError,

    #[error("Server error: {}", .message.as_deref().unwrap_or("remote responded with a failure"))]
    ServerError { message: Option<String> },

    #[error("Data error: {}", .message.as_deref().unwrap_or("unexpected data"))]
    DataError { message: Option<String> },

    #[error("Not found")]
    NotFoundError,

    #[error("Unknown error: {}", .message.as_deref().unwrap_or("no details"))]
    UnknownError { message: Option<String> },
}

impl AppError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: Some(message.into()),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::DataError {
            message: Some(message.into()),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::UnknownError {
            message: Some(message.into()),
        }
    }

    /// Maps a raw data-source failure onto the taxonomy. First match wins:
    /// no response reached, then HTTP status, then bad data, then anything else.
    pub fn classify(cause: &SourceError) -> Self {
        match cause {
            SourceError::Connection(_) | SourceError::Io(_) => Self::NetworkError,
            SourceError::Status { status, message } => Self::ServerError {
                message: Some(
                    message
                        .clone()
                        .unwrap_or_else(|| format!("HTTP {}", status)),
                ),
            },
            SourceError::Decode(message) | SourceError::InvalidState(message) => {
                Self::data(message.clone())
            }
            SourceError::Other(message) => Self::UnknownError {
                message: message.clone(),
            },
        }
    }

    /// Diagnostic message carried by the variant, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::ServerError { message }
            | Self::DataError { message }
            | Self::UnknownError { message } => message.as_deref(),
            Self::NetworkError | Self::NotFoundError => None,
        }
    }

    /// Whether re-invoking the same operation could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::ServerError { .. } | Self::UnknownError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NetworkError => {
                "Unable to reach the olympiad catalog. Check your connection and try again."
                    .to_string()
            }
            Self::ServerError { .. } => {
                "The catalog server returned an error. Please try again later.".to_string()
            }
            Self::DataError { message } => match message {
                Some(detail) => format!("The request or its data is invalid: {}", detail),
                None => "The request or its data is invalid.".to_string(),
            },
            Self::NotFoundError => "The requested olympiad does not exist.".to_string(),
            Self::UnknownError { .. } => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Failure reported by a data source before classification.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Malformed data: {0}")]
    Decode(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unclassified failure: {}", .0.as_deref().unwrap_or("no details"))]
    Other(Option<String>),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
                message: Some(err.to_string()),
            }
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            SourceError::Connection(err.to_string())
        } else if err.is_decode() || err.is_body() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Other(Some(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::classify(&err)
    }
}

/// Errors raised while loading configuration and wiring the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl CatalogError {
    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::IoError(_) => "Check that the file exists and is readable".to_string(),
            CatalogError::HttpClientError(_) => {
                "Check the TLS setup and request timeout settings".to_string()
            }
            CatalogError::ConfigError { .. } | CatalogError::ConfigParseError { .. } => {
                "Fix the configuration file syntax and try again".to_string()
            }
            CatalogError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            CatalogError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
