use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SynthesizeRequest<'a> {
    #[serde(rename = "audioConfig")]
    pub audio_config: AudioConfig,
    pub input: Input<'a>,
    pub voice: Voice<'a>,
}

#[derive(Debug, Serialize)]
pub struct AudioConfig {
    #[serde(rename = "audioEncoding")]
    pub audio_encoding: &'static str,
    #[serde(rename = "sampleRateHertz")]
    pub sample_rate_hertz: u32,
}

#[derive(Debug, Serialize)]
pub struct Input<'a> {
    pub text: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
pub struct Voice<'a> {
    #[serde(rename = "languageCode")]
    pub language_code: String,
    pub name: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    pub audio_content: Option<String>,
}

// error payload shared by google apis
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Error,
}

#[derive(Debug, Deserialize)]
pub struct Error {
    pub message: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "retryDelay")]
    pub retry_delay: Option<String>,
}
