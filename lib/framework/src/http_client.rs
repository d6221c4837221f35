use std::sync::LazyLock;
use std::time::Duration;

use tracing::warn;

// speech synthesis of a long line can take a while, keep the timeout generous
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_idle_timeout(Duration::from_secs(300))
        .connection_verbose(false)
        .build()
        .unwrap_or_else(|err| {
            warn!("failed to build http client, fallback to default, error={err}");
            reqwest::Client::new()
        })
});
