use anyhow::Result;
use clap::Args;
use speech::provider::Provider;

#[derive(Args)]
pub struct Voices {
    #[arg(long, help = "tts backend, gcloud or gemini", default_value_t = Provider::GCloud)]
    backend: Provider,
}

impl Voices {
    pub fn execute(&self) -> Result<()> {
        let default_voice = self.backend.default_voice();
        for voice in self.backend.voices() {
            if *voice == default_voice {
                println!("{voice} (default)");
            } else {
                println!("{voice}");
            }
        }
        Ok(())
    }
}
