//! Webhook delivery of refresh stats.
//!
//! After each refresh the stats are POSTed as JSON to the configured
//! endpoint. Delivery failures are logged and never affect the refresh
//! outcome or the installed index.

use reqwest::header::AUTHORIZATION;
use tokio::sync::mpsc;

use watchlist_search_service::RefreshStats;

/// Consume the refresh updates channel, posting each outcome to the
/// webhook endpoint until the channel closes.
pub async fn run_notifier(
    mut updates: mpsc::Receiver<RefreshStats>,
    endpoint: String,
    auth_token: Option<String>,
) {
    let client = reqwest::Client::new();

    while let Some(stats) = updates.recv().await {
        if let Err(e) = notify(&client, &endpoint, auth_token.as_deref(), &stats).await {
            tracing::error!(error = %e, endpoint, "webhook notification failed");
        }
    }
}

async fn notify(
    client: &reqwest::Client,
    endpoint: &str,
    auth_token: Option<&str>,
    stats: &RefreshStats,
) -> Result<(), reqwest::Error> {
    let mut request = client.post(endpoint).json(stats);
    if let Some(token) = auth_token {
        request = request.header(AUTHORIZATION, token);
    }
    request.send().await?.error_for_status()?;

    tracing::info!(endpoint, "posted refresh stats to webhook");
    Ok(())
}
