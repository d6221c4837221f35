use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::SynthesisError;

/// How the driver reacts to a rate-limited synthesis call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// attempts per line, the first call included
    pub max_attempts: u32,
    /// added on top of the wait time suggested by the service
    pub buffer: Duration,
    /// wait time when the service gives no hint
    pub fallback: Duration,
    /// upper bound of a single wait, whatever the service asks for
    pub max_delay: Duration,
}

static RETRY_HINT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)retry in (\d+(?:\.\d+)?)\s*s").ok());

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            buffer: Duration::from_secs(10),
            fallback: Duration::from_secs(70),
            max_delay: Duration::from_secs(3600),
        }
    }
}

impl RetryPolicy {
    /// Wait time before the next attempt, `None` if the error is not worth retrying.
    pub fn delay_for(&self, error: &SynthesisError) -> Option<Duration> {
        match error {
            SynthesisError::RateLimited {
                retry_after: Some(retry_after),
                ..
            } => Some(retry_after.saturating_add(self.buffer).min(self.max_delay)),
            SynthesisError::RateLimited { retry_after: None, .. } => Some(self.fallback.min(self.max_delay)),
            _ => None,
        }
    }
}

/// Extracts the wait time from free text such as "Please retry in 5.0s."
pub fn parse_retry_hint(message: &str) -> Option<Duration> {
    let captures = RETRY_HINT.as_ref()?.captures(message)?;
    seconds(&captures[1])
}

/// Parses a protobuf JSON duration, e.g. "38s" or "5.250s".
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim().strip_suffix('s')?;
    seconds(value)
}

fn seconds(value: &str) -> Option<Duration> {
    let seconds: f64 = value.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited(retry_after: Option<Duration>) -> SynthesisError {
        SynthesisError::RateLimited {
            message: "quota exceeded".to_string(),
            retry_after,
        }
    }

    #[test]
    fn hint_from_message() {
        let message = "429 RESOURCE_EXHAUSTED. You exceeded your current quota. Please retry in 5.0s.";
        assert_eq!(parse_retry_hint(message), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_hint("Retry in 31.5s"), Some(Duration::from_millis(31_500)));
        assert_eq!(parse_retry_hint("quota exceeded, try again later"), None);
    }

    #[test]
    fn protobuf_duration() {
        assert_eq!(parse_duration("38s"), Some(Duration::from_secs(38)));
        assert_eq!(parse_duration("0.5s"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("38"), None);
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn hinted_delay_gets_buffer() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_for(&rate_limited(Some(Duration::from_secs(5))));
        assert_eq!(delay, Some(Duration::from_secs(15)));
    }

    #[test]
    fn huge_hint_is_capped() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_for(&rate_limited(Some(Duration::from_secs(u64::MAX))));
        assert_eq!(delay, Some(Duration::from_secs(3600)));

        let delay = policy.delay_for(&rate_limited(Some(Duration::MAX)));
        assert_eq!(delay, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn unhinted_delay_uses_fallback() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(&rate_limited(None)), Some(Duration::from_secs(70)));
    }

    #[test]
    fn other_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(&SynthesisError::NoAudioReturned), None);
        assert_eq!(policy.delay_for(&SynthesisError::Other("bad request".to_string())), None);
    }
}
