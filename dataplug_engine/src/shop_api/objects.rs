use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Package, Transaction};
use crate::helpers::resolve_price;

/// A customer's checkout submission, as received from a shop page.
///
/// Deliberately carries no price: the sale price is always resolved from the catalog and the agent's overrides on
/// the server side, so a tampered client cannot change what gets charged.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub agent_slug: String,
    pub package_id: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// The order and payment transaction created by a checkout, before the customer is sent to the gateway.
#[derive(Debug, Clone)]
pub struct PendingCheckout {
    pub order: Order,
    pub transaction: Transaction,
}

/// A new agent registration submission.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgentRequest {
    pub auth_uid: String,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub phone: String,
}

/// A catalog entry as it appears in a specific agent's shop, with the agent's effective price applied.
#[derive(Debug, Clone, Serialize)]
pub struct ShopPackage {
    pub id: String,
    pub name: String,
    pub network: String,
    pub capacity: String,
    /// The price the customer pays, in GHS.
    pub price: f64,
}

impl ShopPackage {
    pub fn from_package(package: &Package, override_price: Option<dp_common::Cedis>) -> Self {
        let resolution = resolve_price(package.base_price, override_price);
        Self {
            id: package.id.clone(),
            name: package.name.clone(),
            network: package.network.clone(),
            capacity: package.capacity.clone(),
            price: resolution.sale_price.to_ghs(),
        }
    }
}

/// The public view of an agent's shop: the storefront identity plus the priced catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ShopProfile {
    pub slug: String,
    pub business_name: String,
    pub packages: Vec<ShopPackage>,
}
