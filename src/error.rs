use std::path::PathBuf;
use thiserror::Error;

/// PPM統一エラー型
#[derive(Debug, Error)]
pub enum PpmError {
    #[error("Invalid plugin name: {0}")]
    InvalidPluginName(String),

    #[error("Can't find plugin: {0}")]
    PluginNotFound(String),

    #[error("Invalid package descriptor {}: {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PpmError>;

impl PpmError {
    /// パッケージマネージャを起動できなかったエラーかどうか
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, PpmError::Launch { .. })
    }
}
