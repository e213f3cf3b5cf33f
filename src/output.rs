use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const TRUSTED: &str = "TRUSTED";
pub const TRUSTED_FILE_CONTENT: &str = "TRUSTED_FILE_CONTENT";

/// Where step outputs go: appended `KEY=VALUE` lines in the file the CI
/// platform hands us, or stdout when there is none.
#[derive(Debug, Clone)]
pub struct OutputSink {
    path: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let line = format!("{key}={value}\n");
        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                file.write_all(line.as_bytes())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Writes `TRUSTED` exactly once when dropped. Holds `false` unless
/// [`TrustFlag::mark_trusted`] was called, so every early return reports an
/// untrusted file.
#[derive(Debug)]
pub struct TrustFlag<'a> {
    sink: &'a OutputSink,
    trusted: bool,
}

impl<'a> TrustFlag<'a> {
    pub fn new(sink: &'a OutputSink) -> Self {
        Self {
            sink,
            trusted: false,
        }
    }

    pub fn mark_trusted(&mut self) {
        self.trusted = true;
    }
}

impl Drop for TrustFlag<'_> {
    fn drop(&mut self) {
        let value = if self.trusted { "true" } else { "false" };
        if let Err(err) = self.sink.write(TRUSTED, value) {
            tracing::warn!("Failed to write {TRUSTED} variable: {err:#}");
        }
    }
}
