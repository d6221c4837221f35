use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tokio::fs;
use tokio::time::Instant;
use tokio::time::sleep;
use tracing::info;
use tracing::warn;

use crate::error::BatchError;
use crate::error::LineFailure;
use crate::retry::RetryPolicy;
use crate::synthesizer::Synthesizer;

pub const DEFAULT_INPUT: &str = "sentences.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "output_audio";

const PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub voice: String,
    /// regenerate lines whose output already exists
    pub force: bool,
    /// pause between two successful synthesis calls
    pub delay: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug)]
pub enum LineOutcome {
    Skipped,
    Succeeded { attempts: u32 },
    Failed(LineFailure),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Reads the utterances of an input file, one per non-empty line, trimmed.
pub async fn read_lines(path: &Path) -> Result<Vec<String>, BatchError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(BatchError::MissingInputFile(path.to_path_buf())),
        Err(err) => return Err(err.into()),
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// `line_001.wav` for index 1.
pub fn output_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("line_{index:03}.wav"))
}

pub struct Batch<S> {
    synthesizer: S,
    config: BatchConfig,
    // a successful call happened and nobody waited for it yet
    pace_pending: bool,
}

impl<S> Batch<S>
where
    S: Synthesizer,
{
    pub fn new(synthesizer: S, config: BatchConfig) -> Self {
        Batch {
            synthesizer,
            config,
            pace_pending: false,
        }
    }

    pub async fn run(&mut self, lines: &[String]) -> Result<Summary, BatchError> {
        fs::create_dir_all(&self.config.output_dir).await?;
        info!(
            "start batch, lines={}, voice={}, output_dir={}, force={}",
            lines.len(),
            self.config.voice,
            self.config.output_dir.to_string_lossy(),
            self.config.force
        );

        let start = Instant::now();
        let mut summary = Summary {
            total: lines.len(),
            ..Summary::default()
        };
        for (i, text) in lines.iter().enumerate() {
            let index = i + 1;
            match self.process_line(index, lines.len(), text).await {
                LineOutcome::Skipped => summary.skipped += 1,
                LineOutcome::Succeeded { .. } => summary.succeeded += 1,
                LineOutcome::Failed(failure) => {
                    warn!("failed to generate line, index={index}, error={failure}");
                    summary.failed += 1;
                }
            }
        }
        summary.elapsed = start.elapsed();

        info!(
            "batch completed, succeeded={}, skipped={}, failed={}, elapsed={:.2}s",
            summary.succeeded,
            summary.skipped,
            summary.failed,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    /// Takes one line from pending to skipped, succeeded or failed.
    pub async fn process_line(&mut self, index: usize, total: usize, text: &str) -> LineOutcome {
        let path = output_path(&self.config.output_dir, index);
        let preview = preview(text);

        if !self.config.force && self.exists(&path).await {
            info!("skip line ({index}/{total}), file already exists, text={preview}");
            return LineOutcome::Skipped;
        }

        if self.pace_pending {
            sleep(self.config.delay).await;
            self.pace_pending = false;
        }

        info!("process line ({index}/{total}), text={preview}");
        let (audio, attempts) = match self.synthesize(text).await {
            Ok(result) => result,
            Err(failure) => return LineOutcome::Failed(failure),
        };
        self.pace_pending = true;

        if let Err(error) = fs::write(&path, &audio).await {
            return LineOutcome::Failed(LineFailure::Write { path, error });
        }
        info!("generated, path={}, attempts={attempts}", path.to_string_lossy());
        LineOutcome::Succeeded { attempts }
    }

    // an unreadable target counts as missing, the write afterwards reports the real error
    async fn exists(&self, path: &Path) -> bool {
        match fs::try_exists(path).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!("failed to check output file, regenerate it, path={}, error={err}", path.to_string_lossy());
                false
            }
        }
    }

    async fn synthesize(&self, text: &str) -> Result<(Vec<u8>, u32), LineFailure> {
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let error = match self.synthesizer.synthesize(text, &self.config.voice).await {
                Ok(audio) => return Ok((audio, attempts)),
                Err(error) => error,
            };

            let Some(delay) = policy.delay_for(&error) else {
                return Err(LineFailure::Synthesis(error));
            };
            if attempts >= max_attempts {
                return Err(LineFailure::MaxRetriesExceeded { attempts, last: error });
            }
            warn!(
                "rate limited, attempt={attempts}/{max_attempts}, wait={:.1}s, error={error}",
                delay.as_secs_f64()
            );
            sleep(delay).await;
        }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut preview: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        preview.push_str("...");
    }
    preview
}
