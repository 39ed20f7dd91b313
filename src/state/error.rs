/// Error taxonomy
///
/// Validation errors never leave the client, analysis errors come back
/// from the analysis service (or never reach it), and config errors stop
/// the process before a window opens.

use thiserror::Error;

/// Generic text for a service failure without a usable `detail`
pub const ANALYSIS_FAILED: &str = "Analysis failed. Please try again.";

/// Generic text for a request that never produced a usable response
pub const TRANSPORT_FAILED: &str = "Failed to analyze image. Please try again.";

/// Client-side validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a valid image file (JPEG, PNG)")]
    NotAnImage,

    #[error("Please select an image first")]
    NoImageSelected,
}

/// Failures while turning a picked or dropped path into a file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Could not read {name}: {reason}")]
    Read { name: String, reason: String },
}

/// Failures of a submission to the analysis service
///
/// Kept `Clone` so it can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status
    #[error("analysis service returned {status}")]
    Service { status: u16, detail: Option<String> },

    /// The request never completed
    #[error("{0}")]
    Transport(String),

    /// A success status with a body that is not an analysis result
    #[error("{0}")]
    InvalidResponse(String),
}

impl AnalysisError {
    /// Text shown in the error banner
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Service { detail, .. } => detail
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(ANALYSIS_FAILED)
                .to_string(),
            AnalysisError::Transport(description) | AnalysisError::InvalidResponse(description) => {
                if description.is_empty() {
                    TRANSPORT_FAILED.to_string()
                } else {
                    description.clone()
                }
            }
        }
    }
}

/// Configuration problems detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid service url '{url}': {reason}")]
    ServiceUrl { url: String, reason: String },

    #[error("unknown route '{0}' (expected '/' or '/analyze')")]
    Route(String),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
