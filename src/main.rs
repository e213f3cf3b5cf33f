mod cli;
mod credentials;
mod error;
mod git;
mod output;
mod redact;
mod retrieve;
mod settings;
mod verify;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, LogLevel};
use crate::credentials::GitCredentialStore;
use crate::output::{OutputSink, TrustFlag};
use crate::settings::{Inputs, WORKSPACE_ENV};

fn main() -> ExitCode {
    ExitCode::from(run())
}

fn run() -> u8 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.use_stderr() {
                // bad invocation is still an untrusted file as far as the pipeline knows
                let sink = OutputSink::new(std::env::var_os("DRONE_OUTPUT").map(PathBuf::from));
                drop(TrustFlag::new(&sink));
            }
            err.exit()
        }
    };
    initialize_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level
    });

    let sink = OutputSink::new(cli.output_file);
    let provisioner = GitCredentialStore::new();
    let inputs = Inputs {
        repo_path: cli.repo_path,
        file_path: cli.file_path,
        trusted_branch: cli.trusted_branch,
        current_branch: cli.current_branch,
        git_pat: cli.git_pat,
        remote: cli.remote,
        credential_host: cli.credential_host,
    };
    let workspace = std::env::var(WORKSPACE_ENV).ok();

    match verify::run(inputs, workspace, &sink, &provisioner) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("read-trusted: {err}");
            err.exit_code()
        }
    }
}

/// Plain message lines on stderr; stdout may be carrying step outputs.
fn initialize_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
