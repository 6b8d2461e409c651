//! Error types and utilities for msc-chart

use thiserror::Error;

/// Result type alias for msc-chart operations
pub type Result<T> = std::result::Result<T, MscError>;

/// Main error type for msc-chart operations
#[derive(Error, Debug)]
pub enum MscError {
    /// Missing, invalid or expired API credentials
    #[error("Authentication error: {message}")]
    Authentication {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network or API failure while fetching records
    #[error("Fetch error: {message}")]
    TransientFetch {
        /// Human readable description
        message: String,
        /// HTTP status of the failed response, if there was one
        status_code: Option<u16>,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A chart type that has no renderer
    #[error("Unsupported chart type: '{requested}' (expected 'stacked-area' or 'pie')")]
    UnsupportedChartType {
        /// The chart type as given
        requested: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MscError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new transient fetch error
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientFetch {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new transient fetch error carrying the HTTP status
    pub fn transient_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::TransientFetch {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new transient fetch error with source
    pub fn transient_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransientFetch {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an unsupported chart type error
    pub fn unsupported_chart_type(requested: impl Into<String>) -> Self {
        Self::UnsupportedChartType {
            requested: requested.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status attached to a fetch error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::TransientFetch { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether an opt-in retry may succeed.
    ///
    /// Connection-level failures, rate limits (403/429) and server errors
    /// qualify. Authentication failures and other client errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransientFetch { status_code, .. } => {
                matches!(status_code, None | Some(403) | Some(429) | Some(500..=599))
            }
            _ => false,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to MscError
impl From<reqwest::Error> for MscError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transient_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::transient_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16());
            Self::TransientFetch {
                message: format!("HTTP error: {}", status_code.unwrap_or(0)),
                status_code,
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::transient_with_source("Failed to decode response body", err)
        } else {
            Self::transient_with_source("Network request failed", err)
        }
    }
}

/// Convert from toml::de::Error to MscError
impl From<toml::de::Error> for MscError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to MscError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for MscError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
