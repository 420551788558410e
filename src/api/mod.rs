//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// REST submission adapter built on Axum. This is the producer side of the
// pipeline: it validates client input, appends to the durable order log, and
// acknowledges. It never touches the book; everything it reports about book
// state comes from the matcher's published stats.
//
// | Component      | Description                                                |
// |----------------|-----------------------------------------------------------|
// | AppState       | Shared handles: log writer (mutexed) and engine stats      |
// | Api            | Router construction and serving                            |
// | Routes         | Handler functions for the endpoints                        |
// | DTOs           | Request/acknowledgement bodies                             |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::matching_engine::EngineStats;
use crate::orderlog::LogWriter;

pub use dto::{CancelAck, OrderAck, SubmitOrderRequest};
pub use error::{ApiError, ApiResult};

/// Shared application state accessible by all handlers.
pub struct AppState {
    /// The durable log writer. Axum handlers run on many threads, so the
    /// single-producer discipline is restored by this mutex: whoever holds it
    /// defines the total submission order the matcher will see.
    pub log: Mutex<LogWriter>,
    /// Matcher observability, read-only here.
    pub stats: Arc<EngineStats>,
}

impl AppState {
    pub fn new(log: LogWriter, stats: Arc<EngineStats>) -> AppState {
        AppState {
            log: Mutex::new(log),
            stats,
        }
    }
}

/// Main API structure.
pub struct Api {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl Api {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Api {
        Api { addr, state }
    }

    /// Creates all routes for the API.
    pub fn routes(&self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/orders", post(routes::submit_order))
            .route("/orders/:id", delete(routes::cancel_order))
            .route("/book", get(routes::book_stats))
            .layer(Extension(self.state.clone()))
            .layer(TraceLayer::new_for_http())
    }

    /// Starts the API server and runs until shutdown.
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.routes();
        tracing::info!(addr = %self.addr, "API listening");
        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
