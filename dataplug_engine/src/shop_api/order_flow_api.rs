use std::fmt::Debug;

use log::*;
use thiserror::Error;

use crate::{
    db_types::{AgentStatus, NewOrder, NewTransaction, Order, Transaction},
    helpers::{new_reference, resolve_price},
    shop_api::objects::{CheckoutRequest, PendingCheckout},
    traits::{
        AgentApiError,
        CatalogApiError,
        OrderFlowError,
        ProviderFulfillment,
        SettlementOutcome,
        StorefrontDatabase,
    },
};

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Invalid checkout request: {0}")]
    Validation(String),
    #[error("No shop exists at '{0}'")]
    AgentNotFound(String),
    #[error("The shop at '{0}' is not open for sales")]
    AgentNotActivated(String),
    #[error("Package '{0}' is not available")]
    PackageNotFound(String),
    #[error(transparent)]
    OrderFlowError(#[from] OrderFlowError),
    #[error(transparent)]
    AgentError(#[from] AgentApiError),
    #[error(transparent)]
    CatalogError(#[from] CatalogApiError),
}

/// `OrderFlowApi` is the primary API for handling the checkout, payment and settlement flow.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: StorefrontDatabase
{
    /// Creates a new order and its payment transaction from a customer checkout.
    ///
    /// The sale price is resolved from the catalog base price and the shop owner's override; any price carried by
    /// the client is ignored. The order snapshot freezes the package details and the commission split, so later
    /// catalog or pricing edits cannot change what this order settles at.
    ///
    /// The caller (the server layer) takes the returned transaction reference to the payment gateway. If the
    /// gateway cannot be reached, call [`Self::record_payment_failure`] so the order is not left dangling.
    pub async fn initiate_checkout(&self, request: CheckoutRequest) -> Result<PendingCheckout, CheckoutError> {
        let phone = request.customer_phone.trim();
        if phone.is_empty() {
            return Err(CheckoutError::Validation("A customer phone number is required".into()));
        }
        let agent = self
            .db
            .fetch_agent_by_slug(&request.agent_slug)
            .await?
            .ok_or_else(|| CheckoutError::AgentNotFound(request.agent_slug.clone()))?;
        if agent.status != AgentStatus::Activated {
            return Err(CheckoutError::AgentNotActivated(request.agent_slug.clone()));
        }
        let package = self
            .db
            .fetch_package(&request.package_id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| CheckoutError::PackageNotFound(request.package_id.clone()))?;
        let pricing = resolve_price(package.base_price, agent.price_override_for(&package.id));
        let order_id = new_reference("ord").into();
        let reference = new_reference("order");
        let order = NewOrder {
            order_id,
            agent_id: agent.id,
            customer_phone: phone.to_string(),
            customer_email: request.customer_email.filter(|e| !e.trim().is_empty()),
            package_id: package.id.clone(),
            package_name: package.name.clone(),
            network: package.network.clone(),
            capacity: package.capacity.clone(),
            base_price: package.base_price,
            sale_price: pricing.sale_price,
            commission: pricing.commission,
        };
        let transaction =
            NewTransaction::for_order(reference, order.order_id.clone(), agent.id, pricing.sale_price);
        let (order, transaction) = self.db.create_checkout(order, transaction).await?;
        info!(
            "🛒️ Checkout started in shop '{}': {} for {} (reference {})",
            agent.slug, order.package_name, order.sale_price, transaction.reference
        );
        Ok(PendingCheckout { order, transaction })
    }

    /// Fetches the payment transaction for a gateway reference, if one exists.
    pub async fn transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderFlowError> {
        self.db.fetch_transaction_by_reference(reference).await
    }

    /// Fetches the payment transaction for an order, if one exists.
    pub async fn transaction_for_order(&self, order: &Order) -> Result<Option<Transaction>, OrderFlowError> {
        self.db.fetch_transaction_for_order(&order.order_id).await
    }

    /// Fetches the order linked to a transaction.
    pub async fn order_for_transaction(&self, transaction: &Transaction) -> Result<Option<Order>, OrderFlowError> {
        match &transaction.order_id {
            Some(order_id) => self.db.fetch_order_by_order_id(order_id).await,
            None => Ok(None),
        }
    }

    /// Records a failed or declined payment against the reference. The linked order moves to `FAILED`.
    pub async fn record_payment_failure(&self, reference: &str) -> Result<Transaction, OrderFlowError> {
        let transaction = self.db.fail_order(reference).await?;
        info!("🛒️ Payment {reference} recorded as failed");
        Ok(transaction)
    }

    /// Records a confirmed payment and a successful fulfillment: completes the order and credits the agent's
    /// commission. Safe to call more than once per reference; only the first call settles.
    pub async fn confirm_and_settle(
        &self,
        reference: &str,
        fulfillment: ProviderFulfillment,
    ) -> Result<SettlementOutcome, OrderFlowError> {
        self.db.complete_order_and_settle(reference, fulfillment).await
    }

    /// Records a confirmed payment whose fulfillment call failed. The order is parked for the retry worker.
    pub async fn park_order(&self, reference: &str) -> Result<Order, OrderFlowError> {
        self.db.park_order_for_fulfillment(reference).await
    }

    /// Orders waiting on a fulfillment retry, oldest first.
    pub async fn orders_awaiting_fulfillment(&self, limit: i64) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders_awaiting_fulfillment(limit).await
    }
}
