use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// The provider-side identifiers captured when the fulfillment provider accepts an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderFulfillment {
    pub provider_order_id: Option<String>,
    pub provider_status: Option<String>,
}

/// The result of a settlement attempt.
#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    /// The order transitioned to `COMPLETED` and the agent's commission was credited in the same transaction.
    Settled(Order),
    /// The order was already in a terminal state. Nothing was changed, and no commission was credited.
    AlreadyTerminal(Order),
}

impl SettlementOutcome {
    pub fn order(&self) -> &Order {
        match self {
            SettlementOutcome::Settled(o) => o,
            SettlementOutcome::AlreadyTerminal(o) => o,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, SettlementOutcome::Settled(_))
    }
}
