use std::{collections::BTreeMap, fmt::Display};

use dataplug_engine::db_types::{Agent, Order, TransactionPurpose};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// What a customer gets back from a checkout: where to pay, and how to ask about the order afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub reference: String,
    /// The amount the customer will be charged, in GHS.
    pub amount: f64,
    pub authorization_url: String,
    pub access_code: String,
}

/// The outcome of a payment verification, for both order and activation payments.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub reference: String,
    pub purpose: TransactionPurpose,
    /// `COMPLETED`, `FAILED` or `PENDING_FULFILLMENT` once verification has run.
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Prices as submitted by an agent, keyed by package id, in GHS.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingUpdateRequest {
    pub prices: BTreeMap<String, f64>,
}

/// The agent's own view of their account. Money fields are in GHS.
#[derive(Debug, Clone, Serialize)]
pub struct AgentAccountSummary {
    pub slug: String,
    pub business_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub total_earned: f64,
    pub balance: f64,
    pub total_orders: i64,
    pub price_overrides: BTreeMap<String, f64>,
}

impl From<&Agent> for AgentAccountSummary {
    fn from(agent: &Agent) -> Self {
        let price_overrides = agent.price_overrides.iter().map(|(k, v)| (k.clone(), v.to_ghs())).collect();
        Self {
            slug: agent.slug.clone(),
            business_name: agent.business_name.clone(),
            name: agent.name.clone(),
            email: agent.email.clone(),
            phone: agent.phone.clone(),
            status: agent.status.to_string(),
            total_earned: agent.total_earned.to_ghs(),
            balance: agent.balance.to_ghs(),
            total_orders: agent.total_orders,
            price_overrides,
        }
    }
}

/// Returned when an agent starts their activation payment.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationInitResponse {
    pub reference: String,
    /// The activation fee, in GHS.
    pub amount: f64,
    pub authorization_url: String,
    pub access_code: String,
}
