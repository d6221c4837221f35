use std::env;
use std::fs;

use crate::error::BatchError;

pub mod batch;
pub mod error;
pub mod gcloud;
mod gcloud_api;
pub mod gemini;
mod gemini_api;
pub mod provider;
pub mod retry;
pub mod synthesizer;
pub mod tts;
pub mod voice;
pub mod wav;

/// Resolves a credential reference: `env:NAME` reads an environment variable,
/// `file:PATH` reads a file, anything else is taken literally.
///
/// The result is sent as is, a bearer access token or an API key. Service account
/// key files are refused, mint a token with `gcloud auth print-access-token` instead.
pub fn credential(value: &str) -> Result<String, BatchError> {
    let resolved = if let Some(name) = value.strip_prefix("env:") {
        env::var(name).map_err(|_| BatchError::MissingCredentials(format!("can not find env, name={name}")))?
    } else if let Some(path) = value.strip_prefix("file:") {
        fs::read_to_string(path)
            .map_err(|err| BatchError::MissingCredentials(format!("can not read file, path={path}, error={err}")))?
    } else {
        value.to_string()
    };

    let resolved = resolved.trim();
    if resolved.is_empty() {
        return Err(BatchError::MissingCredentials(format!("credential is empty, source={value}")));
    }
    if resolved.starts_with('{') {
        return Err(BatchError::MissingCredentials(format!(
            "credential looks like a service account json, expected an access token or api key, source={value}"
        )));
    }
    Ok(resolved.to_string())
}
