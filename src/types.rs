//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types used throughout the matching engine:
// orders, trades, and the side/status enums.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ENUMS              | Side and OrderStatus.                                            |
// | STRUCTS            | Order (mutable fill state) and Trade (pure value).               |
// | ERRORS             | Validation errors raised at construction.                        |
// | TESTS              | Unit tests for validation and the order lifecycle.               |
//
// Prices and quantities are plain i64 "ticks" and "lots"; a price of 10050
// means 100.50 at two implied decimals. No floating point anywhere in the
// matching path.
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Price in ticks. Strictly positive for any constructed order or trade.
pub type Price = i64;

/// Quantity in lots. Strictly positive at construction, non-increasing after.
pub type Qty = i64;

//--------------------------------------------------------------------------------------------------
//  ENUMS
//--------------------------------------------------------------------------------------------------

/// Represents the side of an order (Buy or Sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// A buy order, resting on the bid side.
    Buy,
    /// A sell order, resting on the ask side.
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire encoding used by the durable order log: 0 = BUY, 1 = SELL.
    pub fn to_wire(self) -> i32 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Decodes the wire representation, rejecting anything but 0 or 1.
    pub fn from_wire(raw: i32) -> Result<Side, OrderError> {
        match raw {
            0 => Ok(Side::Buy),
            1 => Ok(Side::Sell),
            other => Err(OrderError::InvalidArgument(format!(
                "unknown side encoding: {other}"
            ))),
        }
    }
}

/// Lifecycle status of an order.
///
/// Transitions: `Open -> PartiallyFilled | Filled | Canceled`,
/// `PartiallyFilled -> PartiallyFilled | Filled | Canceled`.
/// `Filled` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, nothing filled yet.
    Open,
    /// Some quantity filled, remainder still live.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Canceled before completion.
    Canceled,
}

impl OrderStatus {
    /// Terminal orders never fill again and are evicted lazily from queues.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled)
    }
}

//--------------------------------------------------------------------------------------------------
//  ERRORS
//--------------------------------------------------------------------------------------------------

/// Validation errors for order and trade construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Malformed input: empty id, non-positive price or quantity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

//--------------------------------------------------------------------------------------------------
//  STRUCTS
//--------------------------------------------------------------------------------------------------

/// A limit order. Identity (`id`, `side`, `limit_price`) is immutable after
/// construction; `remaining_qty` and `status` evolve through `fill` and
/// `cancel` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: String,
    side: Side,
    limit_price: Price,
    remaining_qty: Qty,
    status: OrderStatus,
}

impl Order {
    /// Creates a new open order.
    ///
    /// # Errors
    /// `OrderError::InvalidArgument` if `price <= 0`, `qty <= 0`, or the id
    /// is empty.
    pub fn new(id: impl Into<String>, side: Side, price: Price, qty: Qty) -> Result<Order, OrderError> {
        let id = id.into();
        if id.is_empty() {
            return Err(OrderError::InvalidArgument("order id must not be empty".into()));
        }
        if price <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "price must be > 0, got {price}"
            )));
        }
        if qty <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "quantity must be > 0, got {qty}"
            )));
        }
        Ok(Order {
            id,
            side,
            limit_price: price,
            remaining_qty: qty,
            status: OrderStatus::Open,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn limit_price(&self) -> Price {
        self.limit_price
    }

    pub fn remaining_qty(&self) -> Qty {
        self.remaining_qty
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// True while the order can still trade.
    pub fn is_live(&self) -> bool {
        !self.status.is_terminal() && self.remaining_qty > 0
    }

    /// Executes a fill of `qty` lots against this order.
    ///
    /// The matching loop guarantees `0 < qty <= remaining_qty`; a violation
    /// here means book state is corrupt, so this panics rather than letting a
    /// negative remainder propagate.
    pub fn fill(&mut self, qty: Qty) {
        assert!(qty > 0, "fill quantity must be > 0, got {qty} on order {}", self.id);
        assert!(
            qty <= self.remaining_qty,
            "fill of {qty} exceeds remaining {} on order {}",
            self.remaining_qty,
            self.id
        );
        self.remaining_qty -= qty;
        self.status = if self.remaining_qty == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Cancels the order: status `Canceled`, remaining quantity zeroed.
    /// Idempotent when already canceled; a no-op on a filled order, which is
    /// already terminal.
    pub fn cancel(&mut self) {
        if self.status == OrderStatus::Filled {
            return;
        }
        self.status = OrderStatus::Canceled;
        self.remaining_qty = 0;
    }
}

/// A trade produced by matching a buy and a sell order. Pure value: trades
/// are appended to the trade log and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub buy_order_id: String,
    pub sell_order_id: String,
    pub price: Price,
    pub quantity: Qty,
}

impl Trade {
    /// Creates a trade, validating that price and quantity are positive.
    pub fn new(
        buy_order_id: impl Into<String>,
        sell_order_id: impl Into<String>,
        price: Price,
        quantity: Qty,
    ) -> Result<Trade, OrderError> {
        if price <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "trade price must be > 0, got {price}"
            )));
        }
        if quantity <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "trade quantity must be > 0, got {quantity}"
            )));
        }
        Ok(Trade {
            buy_order_id: buy_order_id.into(),
            sell_order_id: sell_order_id.into(),
            price,
            quantity,
        })
    }
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
