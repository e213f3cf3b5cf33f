use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::credentials::CredentialProvisioner;
use crate::error::{Result, VerifyError};
use crate::git::Git;
use crate::output::{OutputSink, TrustFlag, TRUSTED_FILE_CONTENT};
use crate::retrieve::Retriever;
use crate::settings::{Inputs, Settings};

/// Run one verification. `TRUSTED` is written on every path out of here.
pub fn run(
    inputs: Inputs,
    workspace: Option<String>,
    sink: &OutputSink,
    provisioner: &dyn CredentialProvisioner,
) -> Result<()> {
    let mut flag = TrustFlag::new(sink);

    let settings = Settings::resolve(inputs, workspace, |repo| Git::new(repo).current_branch())?;
    tracing::debug!(?settings, output = ?sink.path(), "resolved settings");

    if let Some(token) = settings.git_pat.as_deref() {
        provisioner
            .provision(&settings.credential_host, token)
            .map_err(VerifyError::CredentialConfiguration)?;
    }

    let git = Git::new(&settings.repo_path).with_secret(settings.git_pat.as_deref().unwrap_or(""));

    // read before retrieval: the fallback tier moves the working tree
    let current_path = settings.current_file();
    let current = std::fs::read(&current_path).map_err(|source| VerifyError::CurrentFileRead {
        path: current_path.clone(),
        source,
    })?;

    let trusted = Retriever::new(&git, &settings.remote)
        .retrieve(&settings.trusted_branch, &settings.file_path)?;

    if trusted.bytes != current {
        tracing::debug!(
            current = %digest(&current),
            trusted = %digest(&trusted.bytes),
            method = %trusted.method,
            "content digests differ"
        );
        return Err(VerifyError::ContentMismatch {
            current: settings.current_branch.clone(),
            trusted: settings.trusted_branch.clone(),
        });
    }

    flag.mark_trusted();

    let encoded = STANDARD.encode(&trusted.bytes);
    sink.write(TRUSTED_FILE_CONTENT, &encoded)
        .map_err(|source| VerifyError::Output {
            key: TRUSTED_FILE_CONTENT,
            source,
        })?;

    tracing::info!(
        sha256 = %digest(&trusted.bytes),
        method = %trusted.method,
        "File content matches the trusted branch. Validation succeeded."
    );
    Ok(())
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
