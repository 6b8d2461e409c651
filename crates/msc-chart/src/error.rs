//! Application-wide error types using thiserror.

use msc_common::MscError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Failed to load configuration")]
    Config(#[source] MscError),

    /// Logging could not be initialized.
    #[error("Failed to initialize logging")]
    Logging(#[source] MscError),

    /// Fetching, aggregating or rendering the chart failed.
    #[error(transparent)]
    Chart(#[from] MscError),
}

impl AppError {
    /// The underlying workspace error
    pub fn inner(&self) -> &MscError {
        match self {
            AppError::Config(e) | AppError::Logging(e) | AppError::Chart(e) => e,
        }
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_keeps_source() {
        let err = AppError::Config(MscError::config("missing token"));
        assert_eq!(err.to_string(), "Failed to load configuration");
        assert!(err.source().is_some());
        assert!(matches!(err.inner(), MscError::Config { .. }));
    }

    #[test]
    fn test_chart_error_is_transparent() {
        let err = AppError::from(MscError::graph("No data"));
        assert_eq!(err.to_string(), "Graph error: No data");
    }
}
