pub const GCLOUD_VOICES: &[&str] = &[
    "id-ID-Standard-A",
    "id-ID-Standard-B",
    "id-ID-Standard-C",
    "id-ID-Standard-D",
    "id-ID-Wavenet-A",
    "id-ID-Wavenet-B",
    "id-ID-Wavenet-C",
    "id-ID-Wavenet-D",
];

// prebuilt voices of the gemini tts models
pub const GEMINI_VOICES: &[&str] = &[
    "Achernar",
    "Achird",
    "Algenib",
    "Algieba",
    "Alnilam",
    "Aoede",
    "Autonoe",
    "Callirrhoe",
    "Charon",
    "Despina",
    "Enceladus",
    "Erinome",
    "Fenrir",
    "Gacrux",
    "Iapetus",
    "Kore",
    "Laomedeia",
    "Leda",
    "Orus",
    "Puck",
    "Pulcherrima",
    "Rasalgethi",
    "Sadachbia",
    "Sadaltager",
    "Schedar",
    "Sulafat",
    "Umbriel",
    "Vindemiatrix",
    "Zephyr",
    "Zubenelgenubi",
];

/// Language code of a cloud tts voice, e.g. "id-ID" for "id-ID-Wavenet-A".
pub fn language_code(voice: &str) -> String {
    voice.split('-').take(2).collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_from_voice_name() {
        assert_eq!(language_code("id-ID-Wavenet-A"), "id-ID");
        assert_eq!(language_code("en-US-Neural2-C"), "en-US");
        assert_eq!(language_code("Kore"), "Kore");
    }

    #[test]
    fn every_gcloud_voice_is_indonesian() {
        assert!(GCLOUD_VOICES.iter().all(|voice| language_code(voice) == "id-ID"));
    }
}
