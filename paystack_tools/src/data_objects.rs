use serde::{Deserialize, Serialize};

/// Context attached to a charge so the webhook/verify side can tell what the payment was for without a
/// database lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeMetadata {
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_slug: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitializeTransactionRequest {
    pub email: String,
    /// Amount in the currency's minor unit (pesewas for GHS).
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub metadata: ChargeMetadata,
}

/// The gateway's response to an initialize call: where to send the customer to pay.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAuthorization {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifiedChargeStatus {
    Success,
    Failed,
    Abandoned,
    /// The customer has not completed payment yet.
    #[serde(other)]
    Pending,
}

impl VerifiedChargeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifiedChargeStatus::Success)
    }
}

/// The outcome of a verify call for a reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedCharge {
    pub status: VerifiedChargeStatus,
    /// Amount actually charged, in minor units.
    pub amount: i64,
    pub reference: String,
    #[serde(default)]
    pub metadata: Option<ChargeMetadata>,
}

// Paystack wraps every response in a status/message/data envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCharge {
    pub status: String,
    pub amount: i64,
    pub reference: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}
