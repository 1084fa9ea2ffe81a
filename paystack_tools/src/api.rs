use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PaystackConfig,
    data_objects::{ChargeMetadata, Envelope, InitializeTransactionRequest, RawCharge, VerifiedChargeStatus},
    PaymentAuthorization,
    PaystackApiError,
    VerifiedCharge,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct PaystackApi {
    config: PaystackConfig,
    client: Arc<Client>,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut val =
            HeaderValue::from_str(&bearer).map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaystackApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaystackApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            let envelope =
                response.json::<Envelope<T>>().await.map_err(|e| PaystackApiError::JsonError(e.to_string()))?;
            if !envelope.status {
                return Err(PaystackApiError::RequestRejected(envelope.message));
            }
            envelope.data.ok_or_else(|| PaystackApiError::RequestRejected(envelope.message))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaystackApiError::RestResponseError(e.to_string()))?;
            Err(PaystackApiError::QueryError { status, message })
        }
    }

    /// Initializes a payment for the given reference and amount. The returned authorization URL is where the
    /// customer goes to pay.
    pub async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<PaymentAuthorization, PaystackApiError> {
        debug!("💳️ Initializing payment of {} minor units (reference {})", request.amount, request.reference);
        let auth = self
            .rest_query::<PaymentAuthorization, InitializeTransactionRequest>(
                Method::POST,
                "/transaction/initialize",
                Some(request),
            )
            .await?;
        Ok(auth)
    }

    /// Asks the gateway for the definitive outcome of the payment with the given reference.
    pub async fn verify_transaction(&self, reference: &str) -> Result<VerifiedCharge, PaystackApiError> {
        debug!("💳️ Verifying payment with reference {reference}");
        let raw = self
            .rest_query::<RawCharge, ()>(Method::GET, &format!("/transaction/verify/{reference}"), None)
            .await?;
        let status = match raw.status.as_str() {
            "success" => VerifiedChargeStatus::Success,
            "failed" => VerifiedChargeStatus::Failed,
            "abandoned" => VerifiedChargeStatus::Abandoned,
            _ => VerifiedChargeStatus::Pending,
        };
        // Paystack sends metadata back as an empty string when none was attached.
        let metadata = serde_json::from_value::<ChargeMetadata>(raw.metadata).ok();
        Ok(VerifiedCharge { status, amount: raw.amount, reference: raw.reference, metadata })
    }
}
