use std::fs::read_to_string;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde::Serialize;
use serde::de;

// synthesis responses carry the whole audio as base64, keep error messages readable
const EXCERPT_CHARS: usize = 256;

pub fn load_file<T>(path: &Path) -> Result<T>
where
    T: de::DeserializeOwned,
{
    let path = path.to_string_lossy();
    let json = read_to_string(path.as_ref()).with_context(|| format!("failed to read file, path={path}"))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse json file, path={path}"))
}

pub fn from_json<'a, T>(json: &'a str) -> Result<T>
where
    T: de::Deserialize<'a>,
{
    serde_json::from_str(json).with_context(|| format!("failed to deserialize, length={}, json={}", json.len(), excerpt(json)))
}

pub fn to_json<T>(object: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(object).with_context(|| format!("failed to serialize, type={}", std::any::type_name::<T>()))
}

fn excerpt(json: &str) -> String {
    match json.char_indices().nth(EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &json[..end]),
        None => json.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Audio {
        #[serde(rename = "audioContent")]
        audio_content: String,
    }

    #[test]
    fn to_json_uses_renamed_fields() {
        let audio = Audio {
            audio_content: "UklGRg==".to_string(),
        };
        assert_eq!(to_json(&audio).unwrap(), r#"{"audioContent":"UklGRg=="}"#);
    }

    #[test]
    fn from_json_reports_short_payload() {
        let result: Result<Audio> = from_json(r#"{"audioContent":1}"#);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains(r#"json={"audioContent":1}"#), "{message}");
    }

    #[test]
    fn from_json_cuts_large_payload() {
        let json = format!(r#"{{"audioContent":"{}",}}"#, "A".repeat(100_000));

        let result: Result<Audio> = from_json(&json);
        let message = format!("{:#}", result.unwrap_err());

        assert!(message.contains(&format!("length={}", json.len())), "{message}");
        assert!(message.contains("..."), "{message}");
        assert!(message.len() < 1_000, "{}", message.len());
    }

    #[test]
    fn excerpt_keeps_char_boundary() {
        let json = "é".repeat(EXCERPT_CHARS + 1);
        assert_eq!(excerpt(&json), format!("{}...", "é".repeat(EXCERPT_CHARS)));
        assert_eq!(excerpt("{}"), "{}");
    }

    #[test]
    fn load_file_names_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();

        let result: Result<Audio> = load_file(&path);
        let message = format!("{:#}", result.unwrap_err());

        assert!(message.contains("broken.json"), "{message}");
    }
}
