//! Error types for the OpsBuddy core library.
//!
//! Every failure in the chat path is eventually converted into a static
//! user-facing reply, but the library still reports precise errors so the
//! caller can log them and the CLI can print suggestions.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Config file and value validation errors |
//! | E3001-E3099 | Data | Incident fixture loading and lookup errors |
//! | E5001-E5099 | Remote | Backend and LLM API errors |
//! | E9001-E9099 | General | Internal, IO, and serialization errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// The main error type for the OpsBuddy core library.
#[derive(Debug, Error)]
pub enum OpsBuddyError {
    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E2004] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2005] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // Incident Data Errors (E3001-E3099)
    // ========================================================================
    /// Incident not present in the dataset
    #[error("[E3001] Incident not found: {0}")]
    IncidentNotFound(String),

    /// Fixture file could not be loaded
    #[error("[E3002] Failed to load incident data from '{path}': {message}")]
    DatasetLoadFailed { path: String, message: String },

    // ========================================================================
    // Remote Errors (E5001-E5099)
    // ========================================================================
    /// API request failed
    #[error("[E5001] API request failed: {0}")]
    ApiRequestFailed(String),

    /// API response parse error
    #[error("[E5002] Failed to parse API response: {0}")]
    ApiParseError(String),

    /// Backend answered with an error body
    #[error("[E5003] Backend returned an error ({status}): {message}")]
    BackendError { status: u16, message: String },

    /// API authentication failed
    #[error("[E5004] API authentication failed for {service}: {message}")]
    ApiAuthenticationFailed { service: String, message: String },

    /// Remote service unreachable
    #[error("[E5005] API service unavailable: {0}")]
    ApiServiceUnavailable(String),

    /// Request timed out
    #[error("[E5006] Request timed out: {0}")]
    Timeout(String),

    /// No API key has been provided for the LLM client
    #[error("[E5007] No API key configured for {0}")]
    MissingApiKey(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("[E9005] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9006] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for OpsBuddy operations.
pub type OpsBuddyResult<T> = Result<T, OpsBuddyError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

fn host_of(err: &reqwest::Error) -> String {
    err.url()
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<reqwest::Error> for OpsBuddyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OpsBuddyError::Timeout(host_of(&err))
        } else if err.is_connect() {
            OpsBuddyError::ApiServiceUnavailable(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    return OpsBuddyError::ApiAuthenticationFailed {
                        service: host_of(&err),
                        message: status.to_string(),
                    };
                }
            }
            OpsBuddyError::ApiRequestFailed(err.to_string())
        } else if err.is_decode() {
            OpsBuddyError::ApiParseError(err.to_string())
        } else {
            OpsBuddyError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OpsBuddyError {
    fn from(err: serde_json::Error) -> Self {
        OpsBuddyError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for OpsBuddyError {
    fn from(err: std::io::Error) -> Self {
        OpsBuddyError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for OpsBuddyError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => OpsBuddyError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => OpsBuddyError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => OpsBuddyError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => OpsBuddyError::ConfigParseError(err.to_string()),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl OpsBuddyError {
    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            OpsBuddyError::ConfigParseError(_) | OpsBuddyError::InvalidConfigValue { .. }
        )
    }

    /// Returns true if this error came from a backend or LLM call.
    pub fn is_remote_error(&self) -> bool {
        matches!(
            self,
            OpsBuddyError::ApiRequestFailed(_)
                | OpsBuddyError::ApiParseError(_)
                | OpsBuddyError::BackendError { .. }
                | OpsBuddyError::ApiAuthenticationFailed { .. }
                | OpsBuddyError::ApiServiceUnavailable(_)
                | OpsBuddyError::Timeout(_)
                | OpsBuddyError::MissingApiKey(_)
        )
    }

    /// Returns true if the remote side might answer on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OpsBuddyError::ApiServiceUnavailable(_) | OpsBuddyError::Timeout(_)
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            OpsBuddyError::ConfigParseError(_) => "E2004",
            OpsBuddyError::InvalidConfigValue { .. } => "E2005",
            OpsBuddyError::IncidentNotFound(_) => "E3001",
            OpsBuddyError::DatasetLoadFailed { .. } => "E3002",
            OpsBuddyError::ApiRequestFailed(_) => "E5001",
            OpsBuddyError::ApiParseError(_) => "E5002",
            OpsBuddyError::BackendError { .. } => "E5003",
            OpsBuddyError::ApiAuthenticationFailed { .. } => "E5004",
            OpsBuddyError::ApiServiceUnavailable(_) => "E5005",
            OpsBuddyError::Timeout(_) => "E5006",
            OpsBuddyError::MissingApiKey(_) => "E5007",
            OpsBuddyError::Internal(_) => "E9001",
            OpsBuddyError::IoError(_) => "E9005",
            OpsBuddyError::SerializationError(_) => "E9006",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            OpsBuddyError::InvalidConfigValue { .. } | OpsBuddyError::ConfigParseError(_) => {
                Some("Check opsbuddy.toml and the OPSBUDDY_* environment variables")
            }
            OpsBuddyError::DatasetLoadFailed { .. } => {
                Some("Check data.incidents_path or unset it to use the bundled fixture")
            }
            OpsBuddyError::ApiServiceUnavailable(_) | OpsBuddyError::Timeout(_) => {
                Some("Check that the backend is running, or run 'opsbuddy probe'")
            }
            OpsBuddyError::ApiAuthenticationFailed { .. } | OpsBuddyError::MissingApiKey(_) => {
                Some("Paste an API key into the chat or set OPENAI_API_KEY")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with its suggestion.
pub struct CliErrorDisplay<'a> {
    error: &'a OpsBuddyError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a OpsBuddyError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        Ok(())
    }
}
