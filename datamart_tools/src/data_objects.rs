use serde::{Deserialize, Serialize};

/// A fulfillment order submitted to DataMart. DataMart prices in decimal GHS at the wholesale (base) rate;
/// the agent's markup never reaches the provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDataMartOrder {
    pub network: String,
    pub phone_number: String,
    /// Wholesale price in GHS.
    pub amount: f64,
    pub capacity: String,
    pub reference: String,
}

/// DataMart's record of an accepted order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMartOrder {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}
