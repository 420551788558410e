//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The matcher runtime: a single dedicated thread that tails the durable order
// log and drives the order book. All book mutation happens here; everything
// the rest of the process sees goes out through the trade channel or the
// atomic stats block.
//
// | Component       | Description                                                             |
// |-----------------|-------------------------------------------------------------------------|
// | MatchingEngine  | Consumer loop: cursor -> decode -> book.submit / book.cancel            |
// | EngineStats     | Atomics written by the matcher, read by the HTTP adapter                |
// | EngineHandle    | Owns the matcher thread; shutdown flag + join                           |
//
// The loop replays the whole log from the beginning on startup, so a restart
// reconstructs the exact book state the previous process had (determinism:
// same record order, same trades). When the cursor reports no data the loop
// spins briefly for latency and then sleeps a bounded interval to cap idle
// CPU.
//--------------------------------------------------------------------------------------------------

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

use crate::orderbook::OrderBook;
use crate::orderlog::{LogCursor, LogError, LogRecord};
use crate::types::{Order, Side, Trade};

/// Busy-poll iterations before the idle path falls back to sleeping.
const IDLE_SPIN_LIMIT: u32 = 64;

/// Bounded idle sleep once spinning has not produced data.
const IDLE_SLEEP: Duration = Duration::from_micros(200);

//--------------------------------------------------------------------------------------------------
//  STATS
//--------------------------------------------------------------------------------------------------

/// Read-only engine observability, safe to read from any thread. Written
/// only by the matcher; a snapshot is not a consistent cut of the book, which
/// is fine for monitoring.
#[derive(Debug, Default)]
pub struct EngineStats {
    best_bid_price: AtomicI64,
    best_bid_qty: AtomicI64,
    best_ask_price: AtomicI64,
    best_ask_qty: AtomicI64,
    bid_orders: AtomicU64,
    ask_orders: AtomicU64,
    trade_count: AtomicU64,
    records_processed: AtomicU64,
    corrupt_records: AtomicU64,
}

/// One side of the top of book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub price: i64,
    pub qty: i64,
}

/// Point-in-time view of the stats block.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub best_bid: Option<Quote>,
    pub best_ask: Option<Quote>,
    pub bid_orders: u64,
    pub ask_orders: u64,
    pub trade_count: u64,
    pub records_processed: u64,
    pub corrupt_records: u64,
}

impl EngineStats {
    fn publish_book(&self, book: &OrderBook) {
        let (bid_px, bid_qty) = book.best_bid().unwrap_or((0, 0));
        let (ask_px, ask_qty) = book.best_ask().unwrap_or((0, 0));
        self.best_bid_price.store(bid_px, Ordering::Relaxed);
        self.best_bid_qty.store(bid_qty, Ordering::Relaxed);
        self.best_ask_price.store(ask_px, Ordering::Relaxed);
        self.best_ask_qty.store(ask_qty, Ordering::Relaxed);
        self.bid_orders
            .store(book.resting_orders(Side::Buy) as u64, Ordering::Relaxed);
        self.ask_orders
            .store(book.resting_orders(Side::Sell) as u64, Ordering::Relaxed);
        self.trade_count
            .store(book.trade_count() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let quote = |price: &AtomicI64, qty: &AtomicI64| {
            let price = price.load(Ordering::Relaxed);
            let qty = qty.load(Ordering::Relaxed);
            (qty > 0).then_some(Quote { price, qty })
        };
        StatsSnapshot {
            best_bid: quote(&self.best_bid_price, &self.best_bid_qty),
            best_ask: quote(&self.best_ask_price, &self.best_ask_qty),
            bid_orders: self.bid_orders.load(Ordering::Relaxed),
            ask_orders: self.ask_orders.load(Ordering::Relaxed),
            trade_count: self.trade_count.load(Ordering::Relaxed),
            records_processed: self.records_processed.load(Ordering::Relaxed),
            corrupt_records: self.corrupt_records.load(Ordering::Relaxed),
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  ENGINE
//--------------------------------------------------------------------------------------------------

/// Single-threaded matcher. Owns the book; reads the log through a cursor
/// opened inside `run`, so the file handle is released on every exit path.
pub struct MatchingEngine {
    log_dir: PathBuf,
    book: OrderBook,
    running: Arc<AtomicBool>,
    trade_tx: Sender<Trade>,
    stats: Arc<EngineStats>,
}

impl MatchingEngine {
    pub fn new(
        log_dir: impl Into<PathBuf>,
        running: Arc<AtomicBool>,
        trade_tx: Sender<Trade>,
        stats: Arc<EngineStats>,
    ) -> MatchingEngine {
        MatchingEngine {
            log_dir: log_dir.into(),
            book: OrderBook::new(),
            running,
            trade_tx,
            stats,
        }
    }

    /// The consumer loop. Returns when the shutdown flag is cleared, or with
    /// an error if the log storage fails (fatal: a restart replays the log).
    pub fn run(&mut self) -> Result<(), LogError> {
        let mut cursor = LogCursor::open(&self.log_dir)?;
        tracing::info!(dir = %self.log_dir.display(), "matcher started, replaying order log");

        let mut idle_spins: u32 = 0;
        while self.running.load(Ordering::Acquire) {
            match cursor.next() {
                Ok(Some(record)) => {
                    idle_spins = 0;
                    self.apply(record);
                }
                Ok(None) => {
                    // Caught up with the producer. Spin briefly for latency,
                    // then sleep a bounded interval to cap idle CPU.
                    if idle_spins < IDLE_SPIN_LIMIT {
                        idle_spins += 1;
                        std::hint::spin_loop();
                    } else {
                        thread::sleep(IDLE_SLEEP);
                    }
                }
                Err(LogError::Corrupt { segment, offset, detail }) => {
                    // One bad record must not wedge the engine, but it has to
                    // be visible to operators.
                    tracing::warn!(segment, offset, %detail, "skipping corrupt log record");
                    self.stats.corrupt_records.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    tracing::error!(error = %err, "order log failure, stopping matcher");
                    return Err(err);
                }
            }
        }

        tracing::info!("matcher shut down");
        Ok(())
    }

    fn apply(&mut self, record: LogRecord) {
        match record {
            LogRecord::Submit(rec) => {
                match Order::new(rec.order_id, rec.side, rec.price, rec.quantity) {
                    Ok(order) => {
                        let trades = self.book.submit(order);
                        for trade in trades {
                            // A disconnected receiver just means nobody is
                            // listening; the book's trade log is authoritative.
                            let _ = self.trade_tx.send(trade);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping unprocessable submit record");
                    }
                }
            }
            LogRecord::Cancel { order_id } => {
                if !self.book.cancel(&order_id) {
                    tracing::warn!(order_id, "cancel for unknown or terminal order");
                }
            }
            LogRecord::Unknown { kind } => {
                tracing::warn!(kind, "ignoring record of unknown kind");
            }
        }
        self.stats.records_processed.fetch_add(1, Ordering::Relaxed);
        self.stats.publish_book(&self.book);
    }

    /// Direct access for tests that drive the engine synchronously.
    #[cfg(test)]
    pub(crate) fn book(&self) -> &OrderBook {
        &self.book
    }
}

//--------------------------------------------------------------------------------------------------
//  HANDLE
//--------------------------------------------------------------------------------------------------

/// Handle to a running matcher thread.
pub struct EngineHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<(), LogError>>>,
    stats: Arc<EngineStats>,
    trades: Receiver<Trade>,
}

impl EngineHandle {
    pub fn stats(&self) -> Arc<EngineStats> {
        Arc::clone(&self.stats)
    }

    /// Stream of trades in execution order. Replays from the start of the
    /// log, so a consumer attached from process start sees every trade.
    pub fn trades(&self) -> &Receiver<Trade> {
        &self.trades
    }

    /// Signals the matcher to stop and joins it, returning the loop's result.
    pub fn shutdown(mut self) -> Result<(), LogError> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(thread) => match thread.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => Ok(()),
        }
    }
}

/// Starts the matcher on its own named thread, the way the process bootstrap
/// wires it at startup.
pub fn spawn(log_dir: impl Into<PathBuf>) -> Result<EngineHandle, LogError> {
    let running = Arc::new(AtomicBool::new(true));
    let stats = Arc::new(EngineStats::default());
    let (trade_tx, trade_rx) = crossbeam_channel::unbounded();

    let mut engine = MatchingEngine::new(
        log_dir,
        Arc::clone(&running),
        trade_tx,
        Arc::clone(&stats),
    );
    let thread = thread::Builder::new()
        .name("matcher".into())
        .spawn(move || engine.run())?;

    Ok(EngineHandle {
        running,
        thread: Some(thread),
        stats,
        trades: trade_rx,
    })
}
