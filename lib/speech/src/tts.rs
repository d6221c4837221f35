use async_trait::async_trait;

use crate::error::SynthesisError;
use crate::gcloud::GCloudTTS;
use crate::gemini::GeminiTTS;
use crate::synthesizer::Synthesizer;

pub enum Speech {
    GCloud(GCloudTTS),
    Gemini(GeminiTTS),
}

#[async_trait]
impl Synthesizer for Speech {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        match self {
            Speech::GCloud(model) => model.synthesize(text, voice).await,
            Speech::Gemini(model) => model.synthesize(text, voice).await,
        }
    }
}
