use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::voice;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    #[serde(rename = "gcloud")]
    GCloud,
    #[serde(rename = "gemini")]
    Gemini,
}

impl Provider {
    pub fn default_voice(self) -> &'static str {
        match self {
            Provider::GCloud => "id-ID-Wavenet-A",
            Provider::Gemini => "Kore",
        }
    }

    /// Pause after each successful call. Cloud tts allows 1000 requests/min,
    /// the gemini free tier only 3.
    pub fn default_delay(self) -> Duration {
        match self {
            Provider::GCloud => Duration::from_millis(100),
            Provider::Gemini => Duration::from_secs(21),
        }
    }

    pub fn voices(self) -> &'static [&'static str] {
        match self {
            Provider::GCloud => voice::GCLOUD_VOICES,
            Provider::Gemini => voice::GEMINI_VOICES,
        }
    }

    pub fn is_known_voice(self, name: &str) -> bool {
        self.voices().contains(&name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gcloud" => Ok(Provider::GCloud),
            "gemini" => Ok(Provider::Gemini),
            _ => Err(format!("unknown provider, name={value}, expected=gcloud|gemini")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Provider::GCloud => write!(f, "gcloud"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_provider() {
        assert_eq!("gemini".parse::<Provider>(), Ok(Provider::Gemini));
        assert_eq!(Provider::GCloud.to_string().parse::<Provider>(), Ok(Provider::GCloud));
        assert!("azure".parse::<Provider>().is_err());
    }

    #[test]
    fn default_voice_is_in_catalog() {
        for provider in [Provider::GCloud, Provider::Gemini] {
            assert!(provider.is_known_voice(provider.default_voice()), "{provider}");
        }
    }
}
