//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                 | Description                                    |
// |----------------------|------------------------------------------------|
// | SubmitOrderRequest   | POST /orders body                              |
// | OrderAck             | Acknowledgement for an accepted submission     |
// | CancelAck            | Acknowledgement for an accepted cancel         |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::types::{Price, Qty, Side};

/// Body of `POST /orders`.
///
/// ```json
/// { "order_id": "B123", "side": "BUY", "price": 10100, "quantity": 5 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    /// Client-assigned order id; uniqueness is the client's responsibility.
    pub order_id: String,
    /// BUY or SELL.
    pub side: Side,
    /// Limit price in ticks, > 0.
    pub price: Price,
    /// Quantity in lots, > 0.
    pub quantity: Qty,
}

/// Acknowledgement for an accepted submission. Acceptance means the order is
/// durably logged, not that it has executed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAck {
    pub order_id: String,
    pub status: &'static str,
}

impl OrderAck {
    pub fn accepted(order_id: String) -> OrderAck {
        OrderAck {
            order_id,
            status: "accepted",
        }
    }
}

/// Acknowledgement for an accepted cancel request. The outcome (canceled, or
/// a no-op because the order was already terminal or unknown) is decided by
/// the matcher in log order.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAck {
    pub order_id: String,
    pub status: &'static str,
}

impl CancelAck {
    pub fn accepted(order_id: String) -> CancelAck {
        CancelAck {
            order_id,
            status: "cancel_accepted",
        }
    }
}
