use std::io;
use std::path::PathBuf;
use std::time::Duration;

use base64::DecodeError;
use thiserror::Error;

/// Failure of a single synthesis call.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("rate limited, message={message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("no audio returned")]
    NoAudioReturned,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for SynthesisError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map_or("", |url| url.as_str()).to_string();
        SynthesisError::Other(format!("http request failed, url={url}, error={err}"))
    }
}

impl From<anyhow::Error> for SynthesisError {
    fn from(err: anyhow::Error) -> Self {
        SynthesisError::Other(format!("{err:#}"))
    }
}

impl From<DecodeError> for SynthesisError {
    fn from(err: DecodeError) -> Self {
        SynthesisError::Other(format!("failed to decode audio content, error={err}"))
    }
}

impl From<hound::Error> for SynthesisError {
    fn from(err: hound::Error) -> Self {
        SynthesisError::Other(format!("failed to encode wav, error={err}"))
    }
}

/// Errors that stop the whole batch before any line is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("missing credentials, {0}")]
    MissingCredentials(String),

    #[error("input file not found, path={}", .0.display())]
    MissingInputFile(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a line ended up failed. Never escapes the per-line boundary.
#[derive(Debug, Error)]
pub enum LineFailure {
    #[error("gave up after {attempts} attempts, last_error={last}")]
    MaxRetriesExceeded { attempts: u32, last: SynthesisError },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("failed to write audio, path={}, error={error}", .path.display())]
    Write { path: PathBuf, error: io::Error },
}
