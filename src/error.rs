//! Error types for CampusCrush.

use serde::Serialize;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("Deletion error: {0}")]
    Deletion(#[from] DeletionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the backend provider (identity API and profiles table).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("Unexpected status {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Validation errors raised by the onboarding step writes.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Not enough photos: got {got}, need at least {min}")]
    NotEnoughPhotos { got: usize, min: usize },
}

/// Which deletion step failed.
///
/// Profile data is always deleted before the identity record, so a failure
/// at `Profile` leaves the identity intact, while a failure at `Identity`
/// leaves the known inconsistent state (profile gone, identity present).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStage {
    Profile,
    Identity,
}

impl std::fmt::Display for DeletionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::Identity => write!(f, "identity"),
        }
    }
}

/// Errors from the account deletion protocol.
#[derive(Debug, thiserror::Error)]
pub enum DeletionError {
    /// No valid caller identity resolved. Nothing was mutated.
    #[error("User not found")]
    Unauthenticated,

    /// The delete call at `stage` failed. Not retried automatically.
    #[error("Failed to delete {stage}: {reason}")]
    Failed {
        stage: DeletionStage,
        reason: String,
    },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
