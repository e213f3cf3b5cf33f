use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::redact::redact;

/// Handle on the `git` binary bound to one repository working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    secrets: Vec<String>,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            secrets: Vec::new(),
        }
    }

    /// Values masked out of any git error text this handle reports.
    pub fn with_secret(mut self, secret: &str) -> Self {
        if !secret.is_empty() {
            self.secrets.push(secret.to_string());
        }
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn current_branch(&self) -> Result<String> {
        let out = self.git_output(["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(String::from_utf8(out)?.trim().to_string())
    }

    pub fn head_commit(&self) -> Result<String> {
        let out = self.git_output(["rev-parse", "HEAD"])?;
        Ok(String::from_utf8(out)?.trim().to_string())
    }

    /// Raw blob bytes of `path` as committed on `rev`, without touching the
    /// working tree.
    pub fn show_blob(&self, rev: &str, path: &str) -> Result<Vec<u8>> {
        self.git_output(["show", format!("{rev}:{path}").as_str()])
    }

    /// Fetch `branch` from `remote` into `refs/remotes/<remote>/<branch>`.
    pub fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        self.git_output(["fetch", "--quiet", remote, refspec.as_str()])
            .with_context(|| format!("failed to fetch branch {branch} from {remote}"))?;
        Ok(())
    }

    /// `git checkout -B`: create or reset `branch` to `start_point` and check it out.
    pub fn checkout_force_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.git_output(["checkout", "--quiet", "-B", branch, start_point])
            .with_context(|| format!("failed to checkout branch {branch}"))?;
        Ok(())
    }

    pub fn checkout(&self, commitish: &str) -> Result<()> {
        self.git_output(["checkout", "--quiet", commitish])
            .with_context(|| format!("failed to checkout {commitish}"))?;
        Ok(())
    }

    fn git_output<I, S>(&self, args: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let out = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output()
            .context("failed to run git")?;
        if !out.status.success() {
            return Err(anyhow!(
                "git command failed: {}",
                self.scrub(String::from_utf8_lossy(&out.stderr).trim())
            ));
        }
        Ok(out.stdout)
    }

    fn scrub(&self, text: &str) -> String {
        let secrets: Vec<&str> = self.secrets.iter().map(String::as_str).collect();
        redact(text, &secrets)
    }
}

/// Set a key in the user's global git configuration.
pub fn set_global_config(key: &str, value: &str) -> Result<()> {
    let out = Command::new("git")
        .args(["config", "--global", key, value])
        .output()
        .context("failed to run git")?;
    if !out.status.success() {
        return Err(anyhow!(
            "git config --global {key} failed: {}",
            redact(String::from_utf8_lossy(&out.stderr).trim(), &[])
        ));
    }
    Ok(())
}
