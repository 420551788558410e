// Expose the modules
pub mod api;
pub mod config;
pub mod matching_engine;
pub mod orderbook;
pub mod orderlog;
pub mod types;

// Re-export key types for easier usage
pub use api::Api;
pub use config::Config;
pub use matching_engine::{EngineHandle, EngineStats, MatchingEngine, StatsSnapshot};
pub use orderbook::OrderBook;
pub use orderlog::{LogConfig, LogCursor, LogError, LogRecord, LogWriter, OrderRecord};
pub use types::{Order, OrderError, OrderStatus, Price, Qty, Side, Trade};
