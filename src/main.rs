use std::sync::Arc;

use anyhow::Context;
use matchbook::api::{Api, AppState};
use matchbook::config::Config;
use matchbook::matching_engine;
use matchbook::orderlog::{LogConfig, LogWriter};
use tracing::{error, info};

/// Process bootstrap: the log writer for the API, the matcher thread tailing
/// the same directory, and the HTTP server are all wired explicitly here.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    info!(
        log_dir = %config.log_dir.display(),
        addr = %config.listen_addr,
        "starting matchbook"
    );

    // Producer side of the pipeline.
    let log_config = LogConfig {
        segment_bytes: config.segment_bytes,
        ..LogConfig::new(&config.log_dir)
    };
    let writer = LogWriter::open(log_config).context("opening order log")?;

    // Consumer side: the matcher replays the log and then tails it.
    let engine = matching_engine::spawn(&config.log_dir).context("starting matcher")?;

    // Drain the trade stream into the log so executions are visible without
    // a market-data consumer attached.
    let trade_rx = engine.trades().clone();
    std::thread::Builder::new()
        .name("trade-log".into())
        .spawn(move || {
            for trade in trade_rx.iter() {
                info!(
                    buy = %trade.buy_order_id,
                    sell = %trade.sell_order_id,
                    price = trade.price,
                    quantity = trade.quantity,
                    "trade"
                );
            }
        })
        .context("starting trade logger")?;

    let state = Arc::new(AppState::new(writer, engine.stats()));
    let api = Api::new(config.listen_addr, state);

    tokio::select! {
        result = api.serve() => {
            if let Err(err) = result {
                error!(error = %err, "API server failed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    engine.shutdown().context("matcher shutdown")?;
    info!("matchbook stopped");
    Ok(())
}
