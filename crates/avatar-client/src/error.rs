//! Error types for the upload client.

use thiserror::Error;

/// Message shown when the server rejects an upload without explaining why.
pub const FALLBACK_REJECTION_MESSAGE: &str = "Error uploading profile photo";

/// Message shown when the server could not be reached.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

/// Errors from configuring or talking to the profile API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration value is present but unusable.
    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No session token was available for the request.
    #[error("No access token in session")]
    MissingSession,
}

impl ClientError {
    /// Message to surface in the crop editor.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Transport(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            ClientError::MissingSession => "Your session has expired".to_string(),
            ClientError::Config { .. } => FALLBACK_REJECTION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_passes_server_message() {
        let err = ClientError::Rejected {
            status: 413,
            message: "File too large".to_string(),
        };
        assert_eq!(err.user_message(), "File too large");
        assert_eq!(err.to_string(), "Upload rejected (413): File too large");
    }

    #[test]
    fn test_config_error_display() {
        let err = ClientError::Config {
            key: "PROFILE_API_TIMEOUT_SECS",
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for PROFILE_API_TIMEOUT_SECS: invalid digit found in string"
        );
        assert_eq!(err.user_message(), FALLBACK_REJECTION_MESSAGE);
    }
}
