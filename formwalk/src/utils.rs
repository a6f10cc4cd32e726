use log::{info, log_enabled, Level};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Longest spacing between two polls of a wait condition.
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// log to console if configuration verbose.
pub fn log(message: &'static str, data: impl AsRef<str>) {
    if log_enabled!(Level::Info) {
        info!("{message} - {}", data.as_ref());
    }
}

/// Poll `predicate` until it holds or `timeout` elapses.
///
/// The spacing starts at `interval` and grows by half each round, capped at
/// one second. The predicate is always evaluated at least once and once more
/// at the deadline. Returns whether the predicate held.
pub async fn wait_until<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    let mut interval = interval.max(Duration::from_millis(1));

    loop {
        if predicate().await {
            return true;
        }

        let now = Instant::now();

        if now >= deadline {
            return false;
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
        interval = interval.mul_f32(1.5).min(MAX_POLL_INTERVAL);
    }
}

/// The first non-blank line of `text`, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
}

/// Prefix `https://` when the url carries no scheme.
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
