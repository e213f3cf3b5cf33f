use std::fmt;

use anyhow::Context;

use crate::error::{Result, VerifyError};
use crate::git::Git;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMethod {
    /// `git show <branch>:<path>`, working tree untouched.
    Direct,
    /// Fetch, `checkout -B`, then read from disk.
    Fallback,
}

impl fmt::Display for RetrievalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMethod::Direct => f.write_str("direct"),
            RetrievalMethod::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrustedContent {
    pub bytes: Vec<u8>,
    pub method: RetrievalMethod,
}

/// Reads a file as committed on the tip of a trusted branch.
pub struct Retriever<'a> {
    git: &'a Git,
    remote: &'a str,
}

impl<'a> Retriever<'a> {
    pub fn new(git: &'a Git, remote: &'a str) -> Self {
        Self { git, remote }
    }

    pub fn retrieve(&self, branch: &str, file_path: &str) -> Result<TrustedContent> {
        let direct = match self.git.show_blob(branch, file_path) {
            Ok(bytes) => {
                tracing::debug!(branch, file_path, "read trusted content directly");
                return Ok(TrustedContent {
                    bytes,
                    method: RetrievalMethod::Direct,
                });
            }
            Err(err) => format!("{err:#}"),
        };

        tracing::warn!("Lightweight access failed: {direct}. Falling back to heavyweight checkout...");

        match self.checkout_and_read(branch, file_path) {
            Ok(bytes) => Ok(TrustedContent {
                bytes,
                method: RetrievalMethod::Fallback,
            }),
            Err(err) => Err(VerifyError::Retrieval {
                direct,
                fallback: format!("{err:#}"),
            }),
        }
    }

    fn checkout_and_read(&self, branch: &str, file_path: &str) -> anyhow::Result<Vec<u8>> {
        // remember where we were so the working tree can be put back afterwards
        let original = self.original_checkout();

        self.git.fetch_branch(self.remote, branch)?;
        self.git
            .checkout_force_branch(branch, &format!("{}/{branch}", self.remote))?;

        let full_path = self.git.workdir().join(file_path);
        let read = std::fs::read(&full_path)
            .with_context(|| format!("failed to read file {}", full_path.display()));

        if let Some(original) = original {
            if original != branch {
                match self.git.checkout(&original) {
                    Ok(()) => tracing::debug!(checkout = %original, "restored original checkout"),
                    Err(err) => tracing::warn!("failed to restore checkout {original}: {err:#}"),
                }
            }
        }
        read
    }

    fn original_checkout(&self) -> Option<String> {
        match self.git.current_branch() {
            Ok(name) if name != "HEAD" => Some(name),
            _ => self.git.head_commit().ok(),
        }
    }
}
