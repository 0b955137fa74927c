use thiserror::Error;

/// Top-level error type for the textatlas pipeline.
///
/// Every stage of the pipeline returns this type directly so the `?` operator
/// composes across crate boundaries. Each variant carries enough context
/// (offending index, path, cluster id) for the caller to act on the failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("Labeling error for cluster {cluster_id}: {reason}")]
    Labeling { cluster_id: i32, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AtlasError {
    fn from(err: toml::de::Error) -> Self {
        AtlasError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AtlasError {
    fn from(err: toml::ser::Error) -> Self {
        AtlasError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for textatlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
