use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to configure git credentials: {0:#}")]
    CredentialConfiguration(anyhow::Error),

    #[error("failed to read trusted content: direct read failed ({direct}); fallback checkout failed ({fallback})")]
    Retrieval { direct: String, fallback: String },

    #[error("failed to read file from current branch at {}: {source}", .path.display())]
    CurrentFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file content mismatch between branch '{current}' and trusted branch '{trusted}'")]
    ContentMismatch { current: String, trusted: String },

    #[error("failed to write {key}: {source:#}")]
    Output {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl VerifyError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            VerifyError::ContentMismatch { .. } => 1,
            VerifyError::Configuration(_) => 2,
            VerifyError::CredentialConfiguration(_) => 3,
            VerifyError::Retrieval { .. } => 4,
            VerifyError::CurrentFileRead { .. } => 5,
            VerifyError::Output { .. } => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
