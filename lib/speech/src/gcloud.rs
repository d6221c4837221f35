use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use framework::http_client::HTTP_CLIENT;
use framework::json;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use tracing::debug;
use tracing::info;

use crate::error::SynthesisError;
use crate::gcloud_api::AudioConfig;
use crate::gcloud_api::ErrorResponse;
use crate::gcloud_api::Input;
use crate::gcloud_api::SynthesizeRequest;
use crate::gcloud_api::SynthesizeResponse;
use crate::gcloud_api::Voice;
use crate::retry;
use crate::synthesizer::Synthesizer;
use crate::voice;
use crate::wav;

pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

pub struct GCloudTTS {
    pub endpoint: String,
    pub project: Option<String>,
    pub token: String,
}

#[async_trait]
impl Synthesizer for GCloudTTS {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        info!("call gcloud synthesize api, endpoint={}, voice={voice}", self.endpoint);
        let body = json::to_json(&synthesize_request(text, voice))?;

        let mut request = HTTP_CLIENT
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(project) = &self.project {
            request = request.header("x-goog-user-project", project);
        }
        let response = request.body(body).send().await?;

        let status = response.status();
        if status != 200 {
            let retry_after = retry_after(&response);
            let response_text = response.text().await?;
            return Err(api_error(status, retry_after, &response_text));
        }

        let response_body = response.text().await?;
        let response: SynthesizeResponse = json::from_json(&response_body)?;
        let content = response
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or(SynthesisError::NoAudioReturned)?;
        let audio = BASE64_STANDARD.decode(content)?;

        if wav::is_wav(&audio) {
            Ok(audio)
        } else {
            debug!("audio content has no riff header, framing as pcm, length={}", audio.len());
            Ok(wav::from_pcm(&audio, wav::spec(wav::SAMPLE_RATE))?)
        }
    }
}

fn synthesize_request<'a>(text: &'a str, voice: &'a str) -> SynthesizeRequest<'a> {
    SynthesizeRequest {
        audio_config: AudioConfig {
            audio_encoding: "LINEAR16",
            sample_rate_hertz: wav::SAMPLE_RATE,
        },
        input: Input { text: Cow::from(text) },
        voice: Voice {
            language_code: voice::language_code(voice),
            name: Cow::from(voice),
        },
    }
}

pub(crate) fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Converts a failed google api response into a synthesis error.
///
/// A 429 or a `RESOURCE_EXHAUSTED` status is a rate limit. The wait hint is taken
/// from the `Retry-After` header, then from a `RetryInfo` detail, then from the message text.
pub(crate) fn api_error(status: StatusCode, retry_after: Option<Duration>, response_text: &str) -> SynthesisError {
    let error = json::from_json::<ErrorResponse>(response_text).ok().map(|response| response.error);
    let exhausted = error
        .as_ref()
        .is_some_and(|error| error.status.as_deref() == Some("RESOURCE_EXHAUSTED"));

    let message = format!("status={status}, response={response_text}");
    if status != StatusCode::TOO_MANY_REQUESTS && !exhausted {
        return SynthesisError::Other(format!("failed to call api, {message}"));
    }

    let retry_after = retry_after
        .or_else(|| {
            error.as_ref().and_then(|error| {
                error
                    .details
                    .iter()
                    .filter_map(|detail| detail.retry_delay.as_deref())
                    .find_map(retry::parse_duration)
            })
        })
        .or_else(|| {
            let text = error.as_ref().and_then(|error| error.message.as_deref()).unwrap_or(response_text);
            retry::parse_retry_hint(text)
        });

    SynthesisError::RateLimited { message, retry_after }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_derives_language_from_voice() {
        let request = synthesize_request("Halo", "id-ID-Wavenet-A");
        let json = json::to_json(&request).unwrap();
        assert_eq!(
            json,
            r#"{"audioConfig":{"audioEncoding":"LINEAR16","sampleRateHertz":24000},"input":{"text":"Halo"},"voice":{"languageCode":"id-ID","name":"id-ID-Wavenet-A"}}"#
        );
    }

    #[test]
    fn bad_request_is_not_retryable() {
        let body = r#"{"error":{"code":400,"message":"Invalid voice","status":"INVALID_ARGUMENT"}}"#;
        let error = api_error(StatusCode::BAD_REQUEST, None, body);
        assert!(matches!(error, SynthesisError::Other(message) if message.contains("Invalid voice")));
    }

    #[test]
    fn retry_info_detail() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED","details":[
            {"@type":"type.googleapis.com/google.rpc.QuotaFailure"},
            {"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"38s"}]}}"#;
        let error = api_error(StatusCode::TOO_MANY_REQUESTS, None, body);
        assert!(matches!(
            error,
            SynthesisError::RateLimited { retry_after: Some(delay), .. } if delay == Duration::from_secs(38)
        ));
    }

    #[test]
    fn retry_hint_in_message() {
        let body = r#"{"error":{"code":429,"message":"You exceeded your current quota. Please retry in 5.0s.","status":"RESOURCE_EXHAUSTED"}}"#;
        let error = api_error(StatusCode::TOO_MANY_REQUESTS, None, body);
        assert!(matches!(
            error,
            SynthesisError::RateLimited { retry_after: Some(delay), .. } if delay == Duration::from_secs(5)
        ));
    }

    #[test]
    fn header_wins_over_body() {
        let body = r#"{"error":{"message":"Please retry in 5.0s.","status":"RESOURCE_EXHAUSTED"}}"#;
        let error = api_error(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(2)), body);
        assert!(matches!(
            error,
            SynthesisError::RateLimited { retry_after: Some(delay), .. } if delay == Duration::from_secs(2)
        ));
    }

    #[test]
    fn exhausted_without_hint() {
        let error = api_error(StatusCode::TOO_MANY_REQUESTS, None, "rate limit exceeded");
        assert!(matches!(error, SynthesisError::RateLimited { retry_after: None, .. }));
    }
}
