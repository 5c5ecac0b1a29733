use thiserror::Error;

/// Failures that stop [`crate::HeroController::init`].
#[derive(Debug, Error)]
pub enum InitError {
    #[error("canvas '{0}' was not found")]
    MissingCanvas(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A mesh bundle that could not be loaded. The slot stays empty for the rest
/// of the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetLoadError {
    #[error("failed to read '{url}': {reason}")]
    Io { url: String, reason: String },
    #[error("failed to parse '{url}': {reason}")]
    Parse { url: String, reason: String },
    #[error("'{url}' contains no drawable triangles")]
    EmptyMesh { url: String },
    #[error("'{url}' is not supported: {reason}")]
    Unsupported { url: String, reason: String },
}
