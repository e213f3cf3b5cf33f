use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "read-trusted",
    version,
    about = "Verify that a file matches its content on a trusted branch"
)]
pub(crate) struct Cli {
    /// Repository root (defaults to $DRONE_WORKSPACE)
    #[arg(long, env = "PLUGIN_REPO_PATH")]
    pub(crate) repo_path: Option<PathBuf>,

    /// File to verify, relative to the repository root
    #[arg(long, env = "PLUGIN_FILE_PATH")]
    pub(crate) file_path: Option<String>,

    /// Branch holding the trusted copy of the file
    #[arg(long, env = "PLUGIN_TRUSTED_BRANCH")]
    pub(crate) trusted_branch: Option<String>,

    /// Branch under verification (detected from the checkout when unset)
    #[arg(long, env = "PLUGIN_CURRENT_BRANCH")]
    pub(crate) current_branch: Option<String>,

    /// Access token for private remotes
    #[arg(long, env = "PLUGIN_GIT_PAT", hide_env_values = true)]
    pub(crate) git_pat: Option<String>,

    /// Remote fetched from when the trusted branch is not available locally
    #[arg(long, env = "PLUGIN_REMOTE", default_value = "origin")]
    pub(crate) remote: String,

    /// Host the access token is stored for
    #[arg(long, env = "PLUGIN_GIT_HOST", default_value = "github.com")]
    pub(crate) credential_host: String,

    /// File receiving KEY=VALUE outputs (stdout when unset)
    #[arg(long, env = "DRONE_OUTPUT")]
    pub(crate) output_file: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "PLUGIN_LOG_LEVEL", value_parser = parse_log_level, default_value = "info")]
    pub(crate) log_level: LogLevel,

    /// Verbose output (stderr)
    #[arg(long)]
    pub(crate) verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Unset CI settings arrive as empty strings; those mean the default level.
fn parse_log_level(raw: &str) -> Result<LogLevel, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(LogLevel::Info);
    }
    LogLevel::from_str(raw, true)
}

impl LogLevel {
    pub(crate) fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
