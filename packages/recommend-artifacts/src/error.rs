use thiserror::Error;

/// A failure to load one variant's artifact set. Recovered locally by the
/// loader: the offending variant is disabled and the rest proceed.
#[derive(Debug, Error)]
#[error("artifact error for variant '{variant}' (file: {file}): {reason}")]
pub struct ArtifactError {
    pub variant: String,
    pub file: String,
    pub reason: String,
}

impl ArtifactError {
    pub fn new(variant: impl Into<String>, file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level failure: no variant in any family loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no audio or lyrics variant could be loaded from {models_dir}")]
    NoUsableVariants { models_dir: String },

    #[error("models directory not found or unreadable: {0}")]
    ModelsDirUnreadable(String),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;
