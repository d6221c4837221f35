use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use framework::json;
use serde::Deserialize;
use speech::credential;
use speech::error::BatchError;
use speech::gcloud;
use speech::gcloud::GCloudTTS;
use speech::gemini;
use speech::gemini::GeminiTTS;
use speech::provider::Provider;
use speech::tts::Speech;
use tracing::info;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    /// backend used when `--backend` is not given
    pub backend: Option<Provider>,
    pub gcloud: GCloudConfig,
    pub gemini: GeminiConfig,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct GCloudConfig {
    pub endpoint: String,
    pub project: Option<String>,
    pub token: String,
    pub delay_ms: Option<u64>,
}

impl Default for GCloudConfig {
    fn default() -> Self {
        GCloudConfig {
            endpoint: gcloud::DEFAULT_ENDPOINT.to_string(),
            project: None,
            token: "env:GCLOUD_AUTH_TOKEN".to_string(),
            delay_ms: None,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub delay_ms: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            endpoint: gemini::DEFAULT_ENDPOINT.to_string(),
            model: gemini::DEFAULT_MODEL.to_string(),
            api_key: "env:GEMINI_API_KEY".to_string(),
            delay_ms: None,
        }
    }
}

impl Config {
    /// Loads the given file, or `~/.config/narrate/tts.json` when it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path().filter(|path| path.exists()) {
                Some(path) => path,
                None => {
                    info!("config file not found, use defaults");
                    return Ok(Config::default());
                }
            },
        };
        info!("load config, path={}", path.to_string_lossy());
        json::load_file(&path)
    }

    pub fn provider(&self, backend: Option<Provider>) -> Provider {
        backend.or(self.backend).unwrap_or(Provider::GCloud)
    }

    /// Creates the backend, resolving its credentials first.
    pub fn create(&self, provider: Provider) -> Result<Speech, BatchError> {
        info!("create speech, provider={provider}");
        let speech = match provider {
            Provider::GCloud => Speech::GCloud(GCloudTTS {
                endpoint: self.gcloud.endpoint.to_string(),
                project: self.gcloud.project.clone(),
                token: credential(&self.gcloud.token)?,
            }),
            Provider::Gemini => Speech::Gemini(GeminiTTS::new(
                &self.gemini.endpoint,
                &self.gemini.model,
                credential(&self.gemini.api_key)?,
            )),
        };
        Ok(speech)
    }

    pub fn delay(&self, provider: Provider) -> Duration {
        let delay_ms = match provider {
            Provider::GCloud => self.gcloud.delay_ms,
            Provider::Gemini => self.gemini.delay_ms,
        };
        delay_ms.map_or_else(|| provider.default_delay(), Duration::from_millis)
    }
}

fn default_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/narrate/tts.json"))
}
