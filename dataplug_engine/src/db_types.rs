use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use dp_common::Cedis;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

/// Per-package price overrides set by an agent, keyed by package id.
pub type PriceOverrides = BTreeMap<String, Cedis>;

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------    AgentStatus    -----------------------------------------------------------
/// Lifecycle status of an agent account. Only `ACTIVATED` agents can sell.
///
/// The only transition this crate performs is `PENDING → ACTIVATED`, via the activation-payment flow.
/// `SUSPENDED` and `DELETED` are administrative states set out-of-band; they are never reversed implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Pending,
    Activated,
    Suspended,
    Deleted,
}

impl Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Pending => write!(f, "PENDING"),
            AgentStatus::Activated => write!(f, "ACTIVATED"),
            AgentStatus::Suspended => write!(f, "SUSPENDED"),
            AgentStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

impl FromStr for AgentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACTIVATED" => Ok(Self::Activated),
            "SUSPENDED" => Ok(Self::Suspended),
            "DELETED" => Ok(Self::Deleted),
            s => Err(ConversionError(format!("Invalid agent status: {s}"))),
        }
    }
}

//--------------------------------------      Agent       ------------------------------------------------------------
/// A reseller account. The earnings counters (`total_earned`, `balance`, `total_orders`) only ever increase, and
/// only as a side effect of an order completing. They are mutated exclusively through the settlement update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Agent {
    pub id: i64,
    /// Identifier issued by the external auth provider. Opaque to this system.
    pub auth_uid: String,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub phone: String,
    /// The unique shop-URL slug. Immutable once the shop link has been shared.
    pub slug: String,
    pub status: AgentStatus,
    pub price_overrides: Json<PriceOverrides>,
    pub total_earned: Cedis,
    pub balance: Cedis,
    pub total_orders: i64,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn price_override_for(&self, package_id: &str) -> Option<Cedis> {
        self.price_overrides.get(package_id).copied()
    }
}

//--------------------------------------     NewAgent     ------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub auth_uid: String,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub phone: String,
    pub slug: String,
}

//--------------------------------------      Package     ------------------------------------------------------------
/// A catalog entry for a sellable data bundle. `base_price` is both the floor for agent-set prices and the
/// provider's cost. Inactive packages are not offered to customers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub network: String,
    pub capacity: String,
    pub base_price: Cedis,
    pub active: bool,
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// Status of a customer order. Transitions are one-directional:
/// `PENDING → COMPLETED | FAILED | PENDING_FULFILLMENT` and `PENDING_FULFILLMENT → COMPLETED`.
/// `COMPLETED` and `FAILED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusType {
    /// The order has been created; payment has not been confirmed.
    Pending,
    /// Payment was confirmed and the fulfillment provider accepted the order. Commission has been settled.
    Completed,
    /// Payment failed or was rejected. No commission is settled.
    Failed,
    /// Payment was confirmed but the fulfillment provider has not yet accepted the order.
    /// The fulfillment worker retries these.
    PendingFulfillment,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatusType::Completed | OrderStatusType::Failed)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "PENDING"),
            OrderStatusType::Completed => write!(f, "COMPLETED"),
            OrderStatusType::Failed => write!(f, "FAILED"),
            OrderStatusType::PendingFulfillment => write!(f, "PENDING_FULFILLMENT"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "PENDING_FULFILLMENT" => Ok(Self::PendingFulfillment),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to PENDING");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------      OrderId      -----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       Order       -----------------------------------------------------------
/// One purchase attempt tied to one agent and one package.
///
/// The package snapshot and all price fields are frozen when the order is created and never recalculated.
/// `commission` is always `max(0, sale_price - base_price)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub agent_id: i64,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub package_id: String,
    pub package_name: String,
    pub network: String,
    pub capacity: String,
    pub base_price: Cedis,
    pub sale_price: Cedis,
    pub commission: Cedis,
    pub status: OrderStatusType,
    /// The fulfillment provider's order identifier, once known. Used for reconciliation.
    pub provider_order_id: Option<String>,
    pub provider_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder     -----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub agent_id: i64,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub package_id: String,
    pub package_name: String,
    pub network: String,
    pub capacity: String,
    pub base_price: Cedis,
    pub sale_price: Cedis,
    pub commission: Cedis,
}

//--------------------------------------  TransactionStatus  ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

//--------------------------------------  TransactionPurpose  --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionPurpose {
    /// A customer purchase through an agent's shop.
    Order,
    /// An agent's one-time account activation fee.
    Activation,
}

impl Display for TransactionPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionPurpose::Order => write!(f, "ORDER"),
            TransactionPurpose::Activation => write!(f, "ACTIVATION"),
        }
    }
}

//--------------------------------------    Transaction    -----------------------------------------------------------
/// One payment attempt against the gateway. The unique constraint on `reference` is the uniqueness backstop for
/// the best-effort reference generator: inserting a colliding reference fails with `DuplicateReference`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub reference: String,
    pub purpose: TransactionPurpose,
    /// Present for `ORDER` transactions; `ACTIVATION` transactions have no order.
    pub order_id: Option<OrderId>,
    pub agent_id: i64,
    /// Amount in pesewas, as charged by the gateway.
    pub amount: Cedis,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   NewTransaction   ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub reference: String,
    pub purpose: TransactionPurpose,
    pub order_id: Option<OrderId>,
    pub agent_id: i64,
    pub amount: Cedis,
}

impl NewTransaction {
    pub fn for_order(reference: String, order_id: OrderId, agent_id: i64, amount: Cedis) -> Self {
        Self { reference, purpose: TransactionPurpose::Order, order_id: Some(order_id), agent_id, amount }
    }

    pub fn for_activation(reference: String, agent_id: i64, amount: Cedis) -> Self {
        Self { reference, purpose: TransactionPurpose::Activation, order_id: None, agent_id, amount }
    }
}
