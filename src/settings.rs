use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, VerifyError};

/// Environment variable the CI platform sets to the checked-out workspace.
pub const WORKSPACE_ENV: &str = "DRONE_WORKSPACE";

/// Unvalidated parameters as they arrive from flags and the environment.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub repo_path: Option<PathBuf>,
    pub file_path: Option<String>,
    pub trusted_branch: Option<String>,
    pub current_branch: Option<String>,
    pub git_pat: Option<String>,
    pub remote: String,
    pub credential_host: String,
}

/// Parameters for one verification run. Immutable once resolved.
#[derive(Clone)]
pub struct Settings {
    pub repo_path: PathBuf,
    pub file_path: String,
    pub trusted_branch: String,
    pub current_branch: String,
    pub git_pat: Option<String>,
    pub remote: String,
    pub credential_host: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("repo_path", &self.repo_path)
            .field("file_path", &self.file_path)
            .field("trusted_branch", &self.trusted_branch)
            .field("current_branch", &self.current_branch)
            .field("git_pat", &self.git_pat.as_ref().map(|_| "***"))
            .field("remote", &self.remote)
            .field("credential_host", &self.credential_host)
            .finish()
    }
}

impl Settings {
    /// Apply defaults and validate. `detect_branch` is only called when no
    /// current branch was supplied.
    pub fn resolve<F>(inputs: Inputs, workspace: Option<String>, detect_branch: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> anyhow::Result<String>,
    {
        let repo_path = match inputs.repo_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path,
            None => non_empty(workspace).map(PathBuf::from).ok_or_else(|| {
                VerifyError::Configuration(format!(
                    "repo_path is not set and {WORKSPACE_ENV} is unavailable"
                ))
            })?,
        };

        let file_path = non_empty(inputs.file_path)
            .ok_or_else(|| VerifyError::Configuration("file_path is required".to_string()))?;
        validate_relative(&file_path)?;

        let trusted_branch = non_empty(inputs.trusted_branch)
            .ok_or_else(|| VerifyError::Configuration("trusted_branch is required".to_string()))?;

        let current_branch = match non_empty(inputs.current_branch) {
            Some(branch) => branch,
            None => detect_branch(&repo_path).map_err(|err| {
                VerifyError::Configuration(format!("failed to determine current branch: {err:#}"))
            })?,
        };

        let remote = non_empty(Some(inputs.remote)).unwrap_or_else(|| "origin".to_string());
        let credential_host =
            non_empty(Some(inputs.credential_host)).unwrap_or_else(|| "github.com".to_string());

        Ok(Self {
            repo_path,
            file_path,
            trusted_branch,
            current_branch,
            git_pat: non_empty(inputs.git_pat),
            remote,
            credential_host,
        })
    }

    /// Location of the file in the current working tree.
    pub fn current_file(&self) -> PathBuf {
        self.repo_path.join(&self.file_path)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_relative(file_path: &str) -> Result<()> {
    let path = Path::new(file_path);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(VerifyError::Configuration(format!(
            "file_path must be relative to the repository root: {file_path}"
        )));
    }
    Ok(())
}
