use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use speech::batch;
use speech::batch::Batch;
use speech::batch::BatchConfig;
use speech::provider::Provider;
use speech::retry::RetryPolicy;
use tracing::info;
use tracing::warn;

use crate::config::Config;

#[derive(Args)]
pub struct Generate {
    #[arg(long, help = "tts backend, gcloud or gemini, defaults to the conf backend or gcloud")]
    backend: Option<Provider>,

    #[arg(long, help = "voice name, defaults to the backend's default voice")]
    voice: Option<String>,

    #[arg(long, help = "overwrite existing audio files", default_value_t = false)]
    force: bool,

    #[arg(long, help = "input text file, one utterance per line", default_value = batch::DEFAULT_INPUT)]
    input: PathBuf,

    #[arg(long, help = "output directory", default_value = batch::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    #[arg(long, help = "pause between successful calls in milliseconds")]
    delay_ms: Option<u64>,

    #[arg(long, help = "attempts per line when rate limited", default_value_t = 10)]
    max_attempts: u32,

    #[arg(long, help = "conf path")]
    conf: Option<PathBuf>,
}

impl Generate {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.conf.as_deref())?;
        let backend = config.provider(self.backend);
        let speech = config.create(backend)?;

        let voice = self.voice.clone().unwrap_or_else(|| backend.default_voice().to_string());
        if !backend.is_known_voice(&voice) {
            warn!("voice is not in catalog, pass it through, backend={backend}, voice={voice}");
        }

        let lines = batch::read_lines(&self.input).await?;
        info!("found {} lines, backend={backend}, voice={voice}", lines.len());

        let delay = self
            .delay_ms
            .map_or_else(|| config.delay(backend), Duration::from_millis);
        let mut batch = Batch::new(
            speech,
            BatchConfig {
                output_dir: self.output.clone(),
                voice,
                force: self.force,
                delay,
                retry: RetryPolicy {
                    max_attempts: self.max_attempts,
                    ..RetryPolicy::default()
                },
            },
        );
        let summary = batch.run(&lines).await?;

        println!(
            "batch completed, generated {} of {} files in {:.2} seconds, skipped={}, failed={}",
            summary.succeeded,
            summary.total,
            summary.elapsed.as_secs_f64(),
            summary.skipped,
            summary.failed
        );
        Ok(())
    }
}
