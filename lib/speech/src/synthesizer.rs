use async_trait::async_trait;

use crate::error::SynthesisError;

/// Turns one piece of text into audio.
///
/// Implementations return a complete WAV file (RIFF header included),
/// whatever the wire format of the underlying service is.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError>;
}

#[async_trait]
impl<T> Synthesizer for &T
where
    T: Synthesizer + ?Sized,
{
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        (**self).synthesize(text, voice).await
    }
}
