use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig<'a> {
    #[serde(rename = "responseModalities")]
    pub response_modalities: Vec<&'static str>,
    #[serde(rename = "speechConfig")]
    pub speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
pub struct SpeechConfig<'a> {
    #[serde(rename = "voiceConfig")]
    pub voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
pub struct VoiceConfig<'a> {
    #[serde(rename = "prebuiltVoiceConfig")]
    pub prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
pub struct PrebuiltVoiceConfig<'a> {
    #[serde(rename = "voiceName")]
    pub voice_name: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(rename = "inlineData")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    pub data: String,
}
