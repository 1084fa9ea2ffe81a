use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::Deserialize;

use crate::{config::DataMartConfig, DataMartApiError, DataMartOrder, NewDataMartOrder};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// DataMart wraps responses in a status/data envelope.
#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    #[allow(dead_code)]
    pub status: Option<String>,
    pub data: DataMartOrder,
}

#[derive(Clone)]
pub struct DataMartApi {
    config: DataMartConfig,
    client: Arc<Client>,
}

impl DataMartApi {
    pub fn new(config: DataMartConfig) -> Result<Self, DataMartApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| DataMartApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DataMartApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Places a data-bundle order with DataMart. Call this only after the customer's payment has been confirmed.
    pub async fn create_order(&self, order: NewDataMartOrder) -> Result<DataMartOrder, DataMartApiError> {
        debug!("📡️ Forwarding order to DataMart: {} {} for {}", order.network, order.capacity, order.phone_number);
        let response = self
            .client
            .post(self.url("/api/orders"))
            .json(&order)
            .send()
            .await
            .map_err(|e| DataMartApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            let envelope = response.json::<Envelope>().await.map_err(|e| DataMartApiError::JsonError(e.to_string()))?;
            debug!("📡️ DataMart accepted order {} (reference {:?})", envelope.data.id, envelope.data.reference);
            Ok(envelope.data)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| DataMartApiError::RestResponseError(e.to_string()))?;
            Err(DataMartApiError::QueryError { status, message })
        }
    }
}
