//! Server configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Periodic refresh default: every 12 hours.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// Watchlist Search HTTP Server
#[derive(Parser, Debug)]
#[command(name = "watchlist-search-httpd")]
#[command(about = "HTTP server for the watchlist search service")]
pub struct Args {
    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0:8084", env = "HTTP_BIND_ADDRESS")]
    pub http_bind_address: SocketAddr,

    /// Base path to serve HTTP routes from
    #[arg(long, default_value = "/", env = "BASE_PATH")]
    pub base_path: String,

    /// Format for log lines (json, plain)
    #[arg(long, default_value = "plain", env = "LOG_FORMAT")]
    pub log_format: String,

    /// Directory holding the pre-parsed list files
    #[arg(long, default_value = "data", env = "INITIAL_DATA_DIRECTORY")]
    pub initial_data_directory: PathBuf,

    /// How often to refresh list data (e.g. 12h, 30m; "off" disables)
    #[arg(long, default_value = "12h", env = "DATA_REFRESH_INTERVAL")]
    pub data_refresh_interval: String,

    /// Maximum number of concurrent search workers
    #[arg(long, default_value_t = 1024, env = "SEARCH_MAX_WORKERS")]
    pub search_max_workers: usize,

    /// Comma-separated list groups to skip (us_ofac, us_csl, eu_csl, uk_csl)
    #[arg(long, env = "DISABLED_LISTS", value_delimiter = ',')]
    pub disabled_lists: Vec<String>,

    /// Log every normalization stage of each prepared name
    #[arg(long, default_value_t = false, env = "DEBUG_NAME_PIPELINE")]
    pub debug_name_pipeline: bool,

    /// Endpoint to POST refresh stats to after each data refresh
    #[arg(long, env = "WEBHOOK_ENDPOINT")]
    pub webhook_endpoint: Option<String>,

    /// Authorization header value for webhook requests
    #[arg(long, env = "WEBHOOK_AUTH_TOKEN")]
    pub webhook_auth_token: Option<String>,
}

/// Parse a refresh interval.
///
/// `off` (case-insensitive) disables periodic refresh. Durations are
/// digit/unit pairs that may be chained: `12h`, `30m`, `1h30m`, `90s`.
/// Empty or unparseable input falls back to the 12 hour default.
pub fn parse_refresh_interval(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();
    if value.eq_ignore_ascii_case("off") {
        return None;
    }

    match parse_duration(&value) {
        Some(duration) if duration > Duration::ZERO => Some(duration),
        _ => {
            if !value.is_empty() {
                tracing::warn!(value, "unparseable refresh interval, using default");
            }
            Some(DEFAULT_REFRESH_INTERVAL)
        }
    }
}

fn parse_duration(value: &str) -> Option<Duration> {
    let mut total = Duration::ZERO;
    let mut digits = String::new();
    let mut parsed_any = false;

    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let amount: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c {
            'h' => Duration::from_secs(3600),
            'm' => Duration::from_secs(60),
            's' => Duration::from_secs(1),
            _ => return None,
        };
        total += unit * amount as u32;
        parsed_any = true;
    }

    if !digits.is_empty() || !parsed_any {
        // trailing digits without a unit, or nothing parsed
        return None;
    }
    Some(total)
}

/// Initialize tracing with the configured format.
pub fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_disables_refresh() {
        assert_eq!(parse_refresh_interval("off"), None);
        assert_eq!(parse_refresh_interval(" OFF "), None);
    }

    #[test]
    fn test_simple_durations() {
        assert_eq!(
            parse_refresh_interval("12h"),
            Some(Duration::from_secs(12 * 3600))
        );
        assert_eq!(parse_refresh_interval("30m"), Some(Duration::from_secs(1800)));
        assert_eq!(parse_refresh_interval("90s"), Some(Duration::from_secs(90)));
        assert_eq!(
            parse_refresh_interval("1h30m"),
            Some(Duration::from_secs(5400))
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_default() {
        assert_eq!(parse_refresh_interval(""), Some(DEFAULT_REFRESH_INTERVAL));
        assert_eq!(
            parse_refresh_interval("often"),
            Some(DEFAULT_REFRESH_INTERVAL)
        );
        assert_eq!(parse_refresh_interval("12"), Some(DEFAULT_REFRESH_INTERVAL));
        assert_eq!(parse_refresh_interval("0s"), Some(DEFAULT_REFRESH_INTERVAL));
    }
}
