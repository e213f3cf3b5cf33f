use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::git;

/// Makes an access token available to later remote git operations.
pub trait CredentialProvisioner {
    fn provision(&self, host: &str, token: &str) -> Result<()>;
}

/// git's `store` credential helper: a plaintext `~/.git-credentials` file.
///
/// The token ends up on disk unencrypted and is never cleaned up. That is how
/// the store helper works; swap in another provisioner if that is not
/// acceptable for a runner.
#[derive(Debug, Clone, Default)]
pub struct GitCredentialStore {
    home: Option<PathBuf>,
}

impl GitCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn credentials_path(&self) -> Result<PathBuf> {
        let home = match &self.home {
            Some(home) => home.clone(),
            None => dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?,
        };
        Ok(home.join(".git-credentials"))
    }
}

pub(crate) fn credential_line(host: &str, token: &str) -> String {
    format!("https://x-access-token:{token}@{host}\n")
}

impl CredentialProvisioner for GitCredentialStore {
    fn provision(&self, host: &str, token: &str) -> Result<()> {
        git::set_global_config("credential.helper", "store")?;

        let path = self.credentials_path()?;
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(credential_line(host, token).as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        tracing::warn!(
            path = %path.display(),
            "access token stored in plaintext for git credential helper"
        );
        Ok(())
    }
}
