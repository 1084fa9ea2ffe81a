//! `SqliteDatabase` is a concrete implementation of a DataPlug engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{agents, db_url, new_pool, orders, packages, transactions};
use crate::{
    db_types::{
        Agent,
        NewAgent,
        NewOrder,
        NewTransaction,
        Order,
        OrderId,
        Package,
        PriceOverrides,
        Transaction,
        TransactionPurpose,
        TransactionStatus,
    },
    traits::{
        AgentApiError,
        AgentManagement,
        CatalogApiError,
        CatalogManagement,
        OrderFlowError,
        ProviderFulfillment,
        SettlementOutcome,
        StorefrontDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the database URL from the `DPG_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AgentManagement for SqliteDatabase {
    async fn fetch_agent_by_slug(&self, slug: &str) -> Result<Option<Agent>, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let agent = agents::fetch_agent_by_slug(slug, &mut conn).await?;
        Ok(agent)
    }

    async fn fetch_agent_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Agent>, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let agent = agents::fetch_agent_by_auth_uid(auth_uid, &mut conn).await?;
        Ok(agent)
    }

    async fn insert_agent(&self, agent: NewAgent) -> Result<Agent, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let agent = agents::insert_agent(agent, &mut conn).await?;
        debug!("🗃️ New agent #{} registered with shop slug '{}'", agent.id, agent.slug);
        Ok(agent)
    }

    async fn update_price_overrides(&self, agent_id: i64, overrides: PriceOverrides) -> Result<Agent, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let agent = agents::update_price_overrides(agent_id, overrides, &mut conn).await?;
        Ok(agent)
    }

    async fn activate_agent(&self, agent_id: i64) -> Result<Option<Agent>, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let agent = agents::activate_agent(agent_id, &mut conn).await?;
        Ok(agent)
    }

    async fn fetch_orders_for_agent(&self, agent_id: i64) -> Result<Vec<Order>, AgentApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_agent(agent_id, &mut conn).await?;
        Ok(orders)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_active_packages(&self) -> Result<Vec<Package>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let packages = packages::fetch_active_packages(&mut conn).await?;
        Ok(packages)
    }

    async fn fetch_package(&self, package_id: &str) -> Result<Option<Package>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let package = packages::fetch_package(package_id, &mut conn).await?;
        Ok(package)
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_checkout(
        &self,
        order: NewOrder,
        transaction: NewTransaction,
    ) -> Result<(Order, Transaction), OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        let transaction = transactions::insert_transaction(transaction, &mut tx).await?;
        tx.commit().await?;
        debug!("🛒️ Checkout created: order [{}], payment reference {}", order.order_id, transaction.reference);
        Ok((order, transaction))
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let transaction = transactions::fetch_transaction_by_reference(reference, &mut conn).await?;
        Ok(transaction)
    }

    async fn fetch_transaction_for_order(&self, order_id: &OrderId) -> Result<Option<Transaction>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let transaction = transactions::fetch_transaction_for_order(order_id.as_str(), &mut conn).await?;
        Ok(transaction)
    }

    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let transaction = transactions::insert_transaction(transaction, &mut conn).await?;
        Ok(transaction)
    }

    async fn fail_order(&self, reference: &str) -> Result<Transaction, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let transaction = transactions::fetch_transaction_by_reference(reference, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        let transaction = match transactions::update_transaction_status(reference, TransactionStatus::Failed, &mut tx)
            .await?
        {
            Some(t) => t,
            // Already terminal. Leave the recorded outcome alone.
            None => {
                tx.commit().await?;
                return Ok(transaction);
            },
        };
        if let Some(order_id) = &transaction.order_id {
            if orders::mark_order_failed(order_id, &mut tx).await?.is_some() {
                info!("🛒️ Order [{order_id}] marked as failed (payment {reference} was declined)");
            }
        }
        tx.commit().await?;
        Ok(transaction)
    }

    async fn fail_transaction(&self, reference: &str) -> Result<Transaction, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let existing = transactions::fetch_transaction_by_reference(reference, &mut conn)
            .await?
            .ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        let transaction = transactions::update_transaction_status(reference, TransactionStatus::Failed, &mut conn)
            .await?
            .unwrap_or(existing);
        Ok(transaction)
    }

    async fn park_order_for_fulfillment(&self, reference: &str) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let transaction = transactions::fetch_transaction_by_reference(reference, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        let order_id =
            transaction.order_id.clone().ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        // The payment itself succeeded, so the transaction is complete even though the order is parked.
        transactions::update_transaction_status(reference, TransactionStatus::Completed, &mut tx).await?;
        let order = match orders::mark_order_awaiting_fulfillment(&order_id, &mut tx).await? {
            Some(o) => o,
            None => orders::fetch_order_by_order_id(&order_id, &mut tx)
                .await?
                .ok_or(OrderFlowError::OrderNotFound(order_id))?,
        };
        tx.commit().await?;
        warn!("🕰️ Order [{}] is paid but awaiting fulfillment. The retry worker will pick it up.", order.order_id);
        Ok(order)
    }

    async fn complete_order_and_settle(
        &self,
        reference: &str,
        fulfillment: ProviderFulfillment,
    ) -> Result<SettlementOutcome, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let transaction = transactions::fetch_transaction_by_reference(reference, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        let order_id =
            transaction.order_id.clone().ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        transactions::update_transaction_status(reference, TransactionStatus::Completed, &mut tx).await?;
        let outcome = match orders::complete_order(&order_id, &fulfillment, &mut tx).await? {
            Some(order) => {
                agents::credit_commission(order.agent_id, order.commission, &mut tx).await?;
                info!(
                    "💰️ Order [{}] completed. {} commission credited to agent #{}",
                    order.order_id, order.commission, order.agent_id
                );
                SettlementOutcome::Settled(order)
            },
            // The conditional update matched nothing, so another confirmation got here first.
            None => {
                let order = orders::fetch_order_by_order_id(&order_id, &mut tx)
                    .await?
                    .ok_or(OrderFlowError::OrderNotFound(order_id))?;
                debug!("💰️ Order [{}] is already {}. No commission credited.", order.order_id, order.status);
                SettlementOutcome::AlreadyTerminal(order)
            },
        };
        tx.commit().await?;
        Ok(outcome)
    }

    async fn fetch_orders_awaiting_fulfillment(&self, limit: i64) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_awaiting_fulfillment(limit, &mut conn).await?;
        Ok(orders)
    }

    async fn complete_activation(&self, reference: &str) -> Result<Agent, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let transaction = transactions::fetch_transaction_by_reference(reference, &mut tx)
            .await?
            .ok_or_else(|| OrderFlowError::ReferenceNotFound(reference.to_string()))?;
        if transaction.purpose != TransactionPurpose::Activation {
            return Err(OrderFlowError::ReferenceNotFound(reference.to_string()));
        }
        transactions::update_transaction_status(reference, TransactionStatus::Completed, &mut tx).await?;
        let agent = match agents::activate_agent(transaction.agent_id, &mut tx).await? {
            Some(agent) => agent,
            // Already activated. Return the current record.
            None => agents::fetch_agent_by_id(transaction.agent_id, &mut tx)
                .await?
                .ok_or(AgentApiError::AgentNotFound)?,
        };
        tx.commit().await?;
        info!("💻️ Agent #{} activation confirmed (reference {reference})", agent.id);
        Ok(agent)
    }
}
