//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// End-to-end tests of the full pipeline: order log writer (producer) ->
// matcher thread (consumer) -> trade stream and stats. Each test gets its own
// temporary log directory; the matcher is shut down and joined on every path.
//--------------------------------------------------------------------------------------------------

use std::time::{Duration, Instant};

use matchbook::matching_engine::{self, EngineHandle};
use matchbook::orderlog::{LogConfig, LogError, LogWriter};
use matchbook::types::{Side, Trade};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Polls `condition` until it holds or the timeout elapses.
fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

fn setup() -> (TempDir, LogWriter, EngineHandle) {
    let tmp = TempDir::new().unwrap();
    let writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
    let engine = matching_engine::spawn(tmp.path()).unwrap();
    (tmp, writer, engine)
}

/// Blocks until the matcher has applied `count` records.
fn wait_for_records(engine: &EngineHandle, count: u64) {
    let stats = engine.stats();
    assert!(
        wait_until(Duration::from_secs(2), || stats
            .snapshot()
            .records_processed
            >= count),
        "matcher did not process {count} records in time"
    );
}

#[test]
fn test_direct_cross_produces_one_trade() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("S1", Side::Sell, 10_000, 5).unwrap();
    writer.append_submit("B1", Side::Buy, 10_100, 5).unwrap();
    wait_for_records(&engine, 2);

    let trade = engine
        .trades()
        .recv_timeout(Duration::from_secs(1))
        .expect("expected one trade");
    assert_eq!(trade.buy_order_id, "B1");
    assert_eq!(trade.sell_order_id, "S1");
    assert_eq!(trade.price, 10_000);
    assert_eq!(trade.quantity, 5);

    // Both orders filled; the book is empty on both sides.
    let snap = engine.stats().snapshot();
    assert_eq!(snap.trade_count, 1);
    assert_eq!(snap.best_bid, None);
    assert_eq!(snap.best_ask, None);

    engine.shutdown().unwrap();
}

/// With the BUY resting first it is the maker, so execution happens at the
/// resting bid price.
#[test]
fn test_symmetric_cross_executes_at_bid() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("B1", Side::Buy, 10_100, 5).unwrap();
    writer.append_submit("S1", Side::Sell, 10_000, 5).unwrap();
    wait_for_records(&engine, 2);

    let trade = engine
        .trades()
        .recv_timeout(Duration::from_secs(1))
        .expect("expected one trade");
    assert_eq!(trade.buy_order_id, "B1");
    assert_eq!(trade.sell_order_id, "S1");
    assert_eq!(trade.price, 10_100);

    engine.shutdown().unwrap();
}

#[test]
fn test_partial_sweep_leaves_remainder_resting() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("S1", Side::Sell, 10_000, 3).unwrap();
    writer.append_submit("S2", Side::Sell, 10_000, 2).unwrap();
    writer.append_submit("B1", Side::Buy, 10_100, 6).unwrap();
    wait_for_records(&engine, 3);

    let first = engine.trades().recv_timeout(Duration::from_secs(1)).unwrap();
    let second = engine.trades().recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(
        (first.sell_order_id.as_str(), first.price, first.quantity),
        ("S1", 10_000, 3)
    );
    assert_eq!(
        (second.sell_order_id.as_str(), second.price, second.quantity),
        ("S2", 10_000, 2)
    );

    let snap = engine.stats().snapshot();
    assert_eq!(snap.trade_count, 2);
    let bid = snap.best_bid.expect("remainder should rest on the bid side");
    assert_eq!(bid.price, 10_100);
    assert_eq!(bid.qty, 1);
    assert_eq!(snap.best_ask, None);

    engine.shutdown().unwrap();
}

#[test]
fn test_non_crossing_orders_rest() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("B1", Side::Buy, 9_000, 5).unwrap();
    writer.append_submit("S1", Side::Sell, 10_000, 5).unwrap();
    wait_for_records(&engine, 2);

    assert!(engine.trades().try_recv().is_err(), "no trades expected");
    let snap = engine.stats().snapshot();
    assert_eq!(snap.trade_count, 0);
    assert_eq!(snap.best_bid.map(|q| (q.price, q.qty)), Some((9_000, 5)));
    assert_eq!(snap.best_ask.map(|q| (q.price, q.qty)), Some((10_000, 5)));
    assert_eq!(snap.bid_orders, 1);
    assert_eq!(snap.ask_orders, 1);

    engine.shutdown().unwrap();
}

/// A cancel record between submissions wins the race in log order: the
/// canceled order never trades.
#[test]
fn test_cancel_through_log_prevents_match() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("S1", Side::Sell, 10_000, 10).unwrap();
    writer.append_cancel("S1").unwrap();
    writer.append_submit("B1", Side::Buy, 11_000, 5).unwrap();
    wait_for_records(&engine, 3);

    assert!(engine.trades().try_recv().is_err(), "canceled order must not trade");
    let snap = engine.stats().snapshot();
    assert_eq!(snap.trade_count, 0);
    assert_eq!(snap.best_bid.map(|q| (q.price, q.qty)), Some((11_000, 5)));
    assert_eq!(snap.best_ask, None);

    engine.shutdown().unwrap();
}

/// A cancel for an id that was never submitted is applied as a no-op: the
/// matcher consumes the record and warns, and book state is untouched.
#[test]
fn test_cancel_of_unknown_order_is_a_no_op() {
    let (_tmp, mut writer, engine) = setup();

    writer.append_submit("B1", Side::Buy, 9_000, 5).unwrap();
    writer.append_cancel("GHOST").unwrap();
    wait_for_records(&engine, 2);

    assert!(engine.trades().try_recv().is_err(), "no trades expected");
    let snap = engine.stats().snapshot();
    assert_eq!(snap.records_processed, 2);
    assert_eq!(snap.trade_count, 0);
    assert_eq!(snap.best_bid.map(|q| (q.price, q.qty)), Some((9_000, 5)));
    assert_eq!(snap.bid_orders, 1);

    engine.shutdown().unwrap();
}

/// Malformed submissions never reach the log; the matcher sees nothing.
#[test]
fn test_invalid_fields_rejected_before_the_log() {
    let (_tmp, mut writer, engine) = setup();

    assert!(matches!(
        writer.append_submit("X1", Side::Buy, 0, 5),
        Err(LogError::Encode(_))
    ));
    assert!(matches!(
        writer.append_submit("X2", Side::Buy, -10, 5),
        Err(LogError::Encode(_))
    ));
    assert!(matches!(
        writer.append_submit("X3", Side::Buy, 10_000, 0),
        Err(LogError::Encode(_))
    ));
    assert!(matches!(
        writer.append_submit("", Side::Buy, 10_000, 5),
        Err(LogError::Encode(_))
    ));

    // A valid order afterwards is processed as record number one.
    writer.append_submit("B1", Side::Buy, 10_000, 5).unwrap();
    wait_for_records(&engine, 1);
    assert_eq!(engine.stats().snapshot().records_processed, 1);

    engine.shutdown().unwrap();
}

fn collect_trades(engine: &EngineHandle, expected_records: u64) -> Vec<Trade> {
    wait_for_records(engine, expected_records);
    let mut trades = Vec::new();
    while let Ok(trade) = engine.trades().try_recv() {
        trades.push(trade);
    }
    trades
}

/// Replaying the same log prefix from an empty book produces the identical
/// trade sequence.
#[test]
fn test_replay_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();

    // A seeded pseudo-random flow, heavy enough to exercise sweeps, partial
    // fills and cancels.
    let mut rng = StdRng::seed_from_u64(7);
    for i in 0..500 {
        if i % 11 == 10 {
            writer.append_cancel(&format!("O{}", rng.gen_range(0..i))).unwrap();
            continue;
        }
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = 10_000 + rng.gen_range(-50..=50);
        let qty = rng.gen_range(1..=20);
        writer.append_submit(&format!("O{i}"), side, price, qty).unwrap();
    }
    drop(writer);

    let first_engine = matching_engine::spawn(tmp.path()).unwrap();
    let first = collect_trades(&first_engine, 500);
    first_engine.shutdown().unwrap();

    let second_engine = matching_engine::spawn(tmp.path()).unwrap();
    let second = collect_trades(&second_engine, 500);
    second_engine.shutdown().unwrap();

    assert!(!first.is_empty(), "flow should have produced trades");
    assert_eq!(first, second);
}

/// A matcher restarted against an existing log reconstructs the book and
/// continues matching against liquidity logged before the restart.
#[test]
fn test_restart_replays_and_continues() {
    let tmp = TempDir::new().unwrap();
    let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();

    writer.append_submit("S1", Side::Sell, 10_000, 5).unwrap();

    let engine = matching_engine::spawn(tmp.path()).unwrap();
    wait_for_records(&engine, 1);
    engine.shutdown().unwrap();

    // New consumer, same log. The resting ask must still be there to match.
    writer.append_submit("B1", Side::Buy, 10_000, 5).unwrap();
    let engine = matching_engine::spawn(tmp.path()).unwrap();
    wait_for_records(&engine, 2);

    let trade = engine
        .trades()
        .recv_timeout(Duration::from_secs(1))
        .expect("replayed liquidity should match");
    assert_eq!(trade.sell_order_id, "S1");
    assert_eq!(trade.buy_order_id, "B1");
    assert_eq!(trade.price, 10_000);

    engine.shutdown().unwrap();
}

/// Quantity is conserved over an arbitrary flow: no order ever trades more
/// than it submitted, and per-order buy fills mirror per-order sell fills.
#[test]
fn test_conservation_over_random_flow() {
    let tmp = TempDir::new().unwrap();
    let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let mut submitted: std::collections::HashMap<String, i64> = Default::default();
    for i in 0..300 {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = 5_000 + rng.gen_range(-20..=20);
        let qty = rng.gen_range(1..=10);
        let id = format!("O{i}");
        submitted.insert(id.clone(), qty);
        writer.append_submit(&id, side, price, qty).unwrap();
    }
    drop(writer);

    let engine = matching_engine::spawn(tmp.path()).unwrap();
    let trades = collect_trades(&engine, 300);
    engine.shutdown().unwrap();

    assert!(!trades.is_empty(), "flow should have produced trades");
    assert!(trades.iter().all(|t| t.quantity > 0 && t.price > 0));

    let mut filled: std::collections::HashMap<&str, i64> = Default::default();
    for trade in &trades {
        *filled.entry(trade.buy_order_id.as_str()).or_default() += trade.quantity;
        *filled.entry(trade.sell_order_id.as_str()).or_default() += trade.quantity;
    }
    for (id, qty) in &filled {
        assert!(
            qty <= &submitted[*id],
            "order {id} filled {qty} of {} submitted",
            submitted[*id]
        );
    }

    // Each trade counts once per side, so side totals are twice the trade sum.
    let trade_sum: i64 = trades.iter().map(|t| t.quantity).sum();
    let filled_sum: i64 = filled.values().sum();
    assert_eq!(filled_sum, 2 * trade_sum);
}
