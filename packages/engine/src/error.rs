//! Error types for the siteweaver engine

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Failed to load or parse a site plan
    #[error("Failed to load site plan: {0}")]
    LoadError(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A parent selector string could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// No element with the given id exists in the plan
    #[error("No element with id '{0}' in plan")]
    UnknownElement(String),

    /// Transport-level failure while talking to the device
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The plan endpoint answered with a non-success status
    #[error("Could not load configuration: {0}")]
    FetchRejected(u16),

    /// A required form field was left empty
    #[error("Required field '{0}' is empty")]
    MissingRequiredField(String),

    /// The device rejected the submitted configuration
    #[error("Configuration submission rejected with status {0}")]
    SubmitRejected(u16),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::InvalidSelector("??".to_string());
        assert_eq!(err.to_string(), "Invalid selector: ??");
    }

    #[test]
    fn test_fetch_rejected_display() {
        let err = BuildError::FetchRejected(404);
        assert_eq!(err.to_string(), "Could not load configuration: 404");
    }

    #[test]
    fn test_missing_required_field_display() {
        let err = BuildError::MissingRequiredField("WifiEssid".to_string());
        assert_eq!(err.to_string(), "Required field 'WifiEssid' is empty");
    }
}
