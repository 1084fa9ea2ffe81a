use thiserror::Error;

use crate::{
    db_types::{Agent, NewOrder, NewTransaction, Order, OrderId, Transaction},
    traits::{
        data_objects::{ProviderFulfillment, SettlementOutcome},
        AgentApiError,
        AgentManagement,
        CatalogApiError,
        CatalogManagement,
    },
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A transaction with reference '{0}' already exists")]
    DuplicateReference(String),
    #[error("No transaction with reference '{0}' exists")]
    ReferenceNotFound(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error(transparent)]
    AgentError(#[from] AgentApiError),
    #[error(transparent)]
    CatalogError(#[from] CatalogApiError),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

/// This trait defines the highest level of behaviour for backends supporting the storefront.
///
/// This behaviour includes:
/// * Creating an order together with its payment transaction in a single atomic step.
/// * Recording payment outcomes against the transaction ledger.
/// * The settlement flow: moving an order to `COMPLETED` and crediting the agent's commission exactly once.
/// * Parking paid orders whose fulfillment call failed, so the retry worker can pick them up.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase: AgentManagement + CatalogManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Takes a new order and its payment transaction and stores both in a single atomic transaction.
    ///
    /// Returns `DuplicateReference` if the payment reference is already in the ledger. In that case neither
    /// record is written.
    async fn create_checkout(
        &self,
        order: NewOrder,
        transaction: NewTransaction,
    ) -> Result<(Order, Transaction), OrderFlowError>;

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderFlowError>;

    /// Fetches the payment transaction linked to an order. Used by the fulfillment retry worker, which starts
    /// from a parked order and needs its reference to settle.
    async fn fetch_transaction_for_order(&self, order_id: &OrderId) -> Result<Option<Transaction>, OrderFlowError>;

    /// Stores a standalone transaction (used for activation payments, which have no order).
    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, OrderFlowError>;

    /// Records a failed payment: the transaction moves to `FAILED`, and the linked order (if any) moves from
    /// `PENDING` to `FAILED`. Orders already past `PENDING` are left untouched.
    async fn fail_order(&self, reference: &str) -> Result<Transaction, OrderFlowError>;

    /// Marks the transaction `FAILED` without touching any order. Used for activation payments.
    async fn fail_transaction(&self, reference: &str) -> Result<Transaction, OrderFlowError>;

    /// Records a confirmed payment whose fulfillment call did not go through: the transaction moves to
    /// `COMPLETED` (the money was received) and the order to `PENDING_FULFILLMENT`.
    ///
    /// No commission is credited; that happens when fulfillment eventually succeeds.
    async fn park_order_for_fulfillment(&self, reference: &str) -> Result<Order, OrderFlowError>;

    /// The settlement update. In one database transaction:
    /// * the transaction moves to `COMPLETED`,
    /// * the order moves to `COMPLETED` (conditional on it being `PENDING` or `PENDING_FULFILLMENT`), and
    /// * the agent's `total_earned`, `balance` and `total_orders` are incremented by the order's commission.
    ///
    /// The order update is a conditional single statement, so when two confirmations race, exactly one of them
    /// observes the transition and credits the commission; the other gets `AlreadyTerminal`.
    async fn complete_order_and_settle(
        &self,
        reference: &str,
        fulfillment: ProviderFulfillment,
    ) -> Result<SettlementOutcome, OrderFlowError>;

    /// Fetches orders in `PENDING_FULFILLMENT`, oldest first, for the retry worker.
    async fn fetch_orders_awaiting_fulfillment(&self, limit: i64) -> Result<Vec<Order>, OrderFlowError>;

    /// Completes an activation payment: the transaction moves to `COMPLETED` and the agent is activated.
    /// Activation is idempotent; a repeat confirmation returns the already-activated agent.
    async fn complete_activation(&self, reference: &str) -> Result<Agent, OrderFlowError>;
}
