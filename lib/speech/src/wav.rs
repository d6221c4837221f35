use std::io::Cursor;

use hound::SampleFormat;
use hound::WavSpec;
use hound::WavWriter;
use tracing::debug;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

/// mono, 16-bit, 24kHz
pub fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

pub fn is_wav(audio: &[u8]) -> bool {
    audio.len() >= 12 && &audio[0..4] == b"RIFF" && &audio[8..12] == b"WAVE"
}

/// Frames raw little-endian 16-bit PCM into an in-memory WAV file.
pub fn from_pcm(pcm: &[u8], spec: WavSpec) -> Result<Vec<u8>, hound::Error> {
    if pcm.len() % 2 != 0 {
        debug!("pcm has odd length, dropping trailing byte, length={}", pcm.len());
    }

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for sample in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Reads the sample rate from a mime type like "audio/L16;codec=pcm;rate=24000".
pub fn sample_rate(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
}

#[cfg(test)]
mod tests {
    use hound::WavReader;

    use super::*;

    #[test]
    fn frames_pcm_as_wav() {
        let pcm: Vec<u8> = [0i16, 1000, -1000, i16::MAX].iter().flat_map(|s| s.to_le_bytes()).collect();
        let audio = from_pcm(&pcm, spec(SAMPLE_RATE)).unwrap();
        assert!(is_wav(&audio));
        assert_eq!(audio.len(), 44 + pcm.len());

        let mut reader = WavReader::new(Cursor::new(audio)).unwrap();
        assert_eq!(reader.spec(), spec(SAMPLE_RATE));
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 1000, -1000, i16::MAX]);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let audio = from_pcm(&[1, 0, 7], spec(SAMPLE_RATE)).unwrap();
        assert_eq!(audio.len(), 44 + 2);
    }

    #[test]
    fn detects_riff_header() {
        assert!(!is_wav(b"RIFF"));
        assert!(!is_wav(&[0u8; 64]));
    }

    #[test]
    fn sample_rate_from_mime_type() {
        assert_eq!(sample_rate("audio/L16;codec=pcm;rate=24000"), Some(24_000));
        assert_eq!(sample_rate("audio/L16; rate=16000"), Some(16_000));
        assert_eq!(sample_rate("audio/wav"), None);
    }
}
