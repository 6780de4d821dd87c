//! Watchlist search server binary.
//!
//! Startup order matters: configuration, then the mandatory initial data
//! refresh, and only then the listen socket. A failed initial refresh
//! exits non-zero without ever binding the HTTP port.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use watchlist_ingest::{DirectoryFetcher, ListFetcher};
use watchlist_search_httpd::{build_router, config, webhook, AppState, Args};
use watchlist_search_service::{Refresher, Searcher, SearcherConfig, SnapshotHandle};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    config::init_tracing(&args.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %args.http_bind_address,
        data_directory = %args.initial_data_directory.display(),
        "starting watchlist search server"
    );

    let fetcher = DirectoryFetcher::new(&args.initial_data_directory)
        .with_disabled_lists(&args.disabled_lists);

    let handle = Arc::new(SnapshotHandle::new());
    let searcher_config =
        SearcherConfig::default().with_max_workers(args.search_max_workers);
    let searcher = Searcher::new(Arc::clone(&handle), searcher_config);

    let mut refresher = Refresher::new(
        Arc::new(fetcher) as Arc<dyn ListFetcher>,
        Arc::clone(&handle),
    );

    // Webhook notifier consumes the refresh updates channel.
    if let Some(endpoint) = args.webhook_endpoint.clone() {
        let (tx, rx) = mpsc::channel(16);
        refresher = refresher.with_updates(tx);
        tokio::spawn(webhook::run_notifier(
            rx,
            endpoint,
            args.webhook_auth_token.clone(),
        ));
    }
    let refresher = Arc::new(refresher);

    // Initial refresh is mandatory; the port is never bound if it fails.
    match refresher.refresh().await {
        Ok(stats) => info!(
            entities = stats.indexed_entities,
            sdns = stats.stats.sdns,
            ssi = stats.stats.sectoral_sanctions,
            eu_csl = stats.stats.eu_csl,
            "initial data refresh complete"
        ),
        Err(e) => {
            error!(error = %e, "failed to load initial data");
            std::process::exit(1);
        }
    }

    // Periodic refresh, unless disabled with DATA_REFRESH_INTERVAL=off.
    match config::parse_refresh_interval(&args.data_refresh_interval) {
        Some(interval) => {
            info!(?interval, "scheduling periodic data refresh");
            tokio::spawn(Arc::clone(&refresher).run_periodic(interval));
        }
        None => info!("periodic data refresh disabled"),
    }

    let state = Arc::new(AppState {
        searcher,
        refresher,
        handle,
        preparer: watchlist_prepare::Preparer::new(),
        debug_name_pipeline: args.debug_name_pipeline,
    });

    let router = build_router(state);
    let app = if args.base_path == "/" {
        router
    } else {
        axum::Router::new().nest(&args.base_path, router)
    };

    let listener = tokio::net::TcpListener::bind(args.http_bind_address)
        .await
        .expect("failed to bind listen address");

    info!(address = %args.http_bind_address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}
