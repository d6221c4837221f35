use std::borrow::Cow;

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use framework::http_client::HTTP_CLIENT;
use framework::json;
use tracing::info;
use tracing::warn;

use crate::error::SynthesisError;
use crate::gcloud::api_error;
use crate::gcloud::retry_after;
use crate::gemini_api::Content;
use crate::gemini_api::GenerateContentRequest;
use crate::gemini_api::GenerateContentResponse;
use crate::gemini_api::GenerationConfig;
use crate::gemini_api::Part;
use crate::gemini_api::PrebuiltVoiceConfig;
use crate::gemini_api::SpeechConfig;
use crate::gemini_api::VoiceConfig;
use crate::synthesizer::Synthesizer;
use crate::wav;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

pub struct GeminiTTS {
    url: String,
    api_key: String,
}

impl GeminiTTS {
    pub fn new(endpoint: &str, model: &str, api_key: String) -> Self {
        let url = format!("{}/models/{model}:generateContent", endpoint.trim_end_matches('/'));
        GeminiTTS { url, api_key }
    }
}

#[async_trait]
impl Synthesizer for GeminiTTS {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        info!("call gemini generate content api, url={}, voice={voice}", self.url);
        let body = json::to_json(&generate_content_request(text, voice))?;

        let response = HTTP_CLIENT
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != 200 {
            let retry_after = retry_after(&response);
            let response_text = response.text().await?;
            return Err(api_error(status, retry_after, &response_text));
        }

        let response_body = response.text().await?;
        let response: GenerateContentResponse = json::from_json(&response_body)?;
        audio(response)
    }
}

fn generate_content_request<'a>(text: &'a str, voice: &'a str) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: Cow::from(text) }],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["AUDIO"],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: Cow::from(voice),
                    },
                },
            },
        },
    }
}

// the model answers with raw pcm, the rate is carried in the mime type
fn audio(response: GenerateContentResponse) -> Result<Vec<u8>, SynthesisError> {
    let candidate = response.candidates.into_iter().next().ok_or(SynthesisError::NoAudioReturned)?;
    let finish_reason = candidate.finish_reason;
    let Some(inline_data) = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
    else {
        warn!("candidate has no inline data, finish_reason={finish_reason:?}");
        return Err(SynthesisError::NoAudioReturned);
    };

    let pcm = BASE64_STANDARD.decode(inline_data.data)?;
    if pcm.is_empty() {
        return Err(SynthesisError::NoAudioReturned);
    }
    let sample_rate = inline_data
        .mime_type
        .as_deref()
        .and_then(wav::sample_rate)
        .unwrap_or(wav::SAMPLE_RATE);
    Ok(wav::from_pcm(&pcm, wav::spec(sample_rate))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_endpoint_and_model() {
        let tts = GeminiTTS::new("https://generativelanguage.googleapis.com/v1beta/", DEFAULT_MODEL, "key".to_string());
        assert_eq!(
            tts.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"
        );
    }

    #[test]
    fn request_selects_prebuilt_voice() {
        let json = json::to_json(&generate_content_request("Selamat pagi", "Kore")).unwrap();
        assert_eq!(
            json,
            r#"{"contents":[{"parts":[{"text":"Selamat pagi"}]}],"generationConfig":{"responseModalities":["AUDIO"],"speechConfig":{"voiceConfig":{"prebuiltVoiceConfig":{"voiceName":"Kore"}}}}}"#
        );
    }

    #[test]
    fn inline_pcm_becomes_wav() {
        // four zero samples
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"inlineData":{"mimeType":"audio/L16;codec=pcm;rate=24000","data":"AAAAAAAAAAA="}}]},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = json::from_json(body).unwrap();
        let audio = audio(response).unwrap();
        assert!(wav::is_wav(&audio));
        assert_eq!(audio.len(), 44 + 8);
    }

    #[test]
    fn missing_inline_data() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]},"finishReason":"OTHER"}]}"#;
        let response: GenerateContentResponse = json::from_json(body).unwrap();
        assert!(matches!(audio(response), Err(SynthesisError::NoAudioReturned)));

        let response: GenerateContentResponse = json::from_json("{}").unwrap();
        assert!(matches!(audio(response), Err(SynthesisError::NoAudioReturned)));
    }
}
