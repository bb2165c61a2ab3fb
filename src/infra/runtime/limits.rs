use std::time::Duration;

use crate::infra::config::TranscriptionConfig;

/// Build a reqwest client for the transcription upstream. No timeout unless
/// one is configured; reqwest defaults apply otherwise.
pub fn make_http_client_with(cfg: &TranscriptionConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(ms) = cfg.timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    builder.build()
}
