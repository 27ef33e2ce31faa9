use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Poll `read` until it returns a value different from `previous`.
///
/// Bounded by `timeout`. On timeout the price read before the wait is
/// returned; a stale read is an accepted degradation, not an error.
pub async fn wait_for_change<F, Fut>(
    mut read: F,
    previous: Option<&str>,
    timeout: Duration,
    interval: Duration,
) -> Option<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(current) = read().await {
            if previous != Some(current.as_str()) {
                return Some(current);
            }
        }

        if Instant::now() >= deadline {
            tracing::debug!("price did not settle within {:?}, using previous read", timeout);
            return previous.map(String::from);
        }

        sleep(interval).await;
    }
}
