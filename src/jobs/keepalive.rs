use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Pings `url` every `every` so an idling host keeps the service warm.
/// Failures are logged and never escalate.
pub async fn run_keepalive(url: String, every: Duration) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "keep-alive disabled: cannot build HTTP client");
            return;
        }
    };

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        match ping(&client, &url).await {
            Ok(status) if status.is_success() => debug!(%url, %status, "keep-alive ok"),
            Ok(status) => warn!(%url, %status, "keep-alive got non-success status"),
            Err(e) => warn!(%url, error = ?e, "keep-alive failed"),
        }
    }
}

pub async fn ping(client: &reqwest::Client, url: &str) -> Result<StatusCode> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    Ok(response.status())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_target_is_an_error_not_a_panic() {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert!(ping(&client, "http://127.0.0.1:9/health").await.is_err());
    }
}
