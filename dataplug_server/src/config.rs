use std::env;

use dp_common::Cedis;
use datamart_tools::DataMartConfig;
use log::*;
use paystack_tools::PaystackConfig;

const DEFAULT_DPG_HOST: &str = "127.0.0.1";
const DEFAULT_DPG_PORT: u16 = 8360;
// GH₵20.00, in pesewas
const DEFAULT_ACTIVATION_FEE: i64 = 2000;
const DEFAULT_FULFILLMENT_RETRY_SECS: u64 = 60;
const DEFAULT_FULFILLMENT_BATCH: i64 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The public base URL of this server, used to build payment callback URLs.
    pub base_url: String,
    /// The one-time fee a new agent pays to open their shop.
    pub activation_fee: Cedis,
    /// How often the fulfillment worker sweeps for paid-but-unfulfilled orders.
    pub fulfillment_retry_secs: u64,
    /// How many parked orders each sweep picks up.
    pub fulfillment_batch: i64,
    pub paystack: PaystackConfig,
    pub datamart: DataMartConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DPG_HOST.to_string(),
            port: DEFAULT_DPG_PORT,
            database_url: String::default(),
            base_url: format!("http://{DEFAULT_DPG_HOST}:{DEFAULT_DPG_PORT}"),
            activation_fee: Cedis::from(DEFAULT_ACTIVATION_FEE),
            fulfillment_retry_secs: DEFAULT_FULFILLMENT_RETRY_SECS,
            fulfillment_batch: DEFAULT_FULFILLMENT_BATCH,
            paystack: PaystackConfig::default(),
            datamart: DataMartConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DPG_HOST").ok().unwrap_or_else(|| DEFAULT_DPG_HOST.into());
        let port = env::var("DPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DPG_PORT. {e} Using the default, {DEFAULT_DPG_PORT}, instead."
                    );
                    DEFAULT_DPG_PORT
                })
            })
            .unwrap_or(DEFAULT_DPG_PORT);
        let database_url = env::var("DPG_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ DPG_DATABASE_URL is not set. Using a default sqlite database.");
            "sqlite://data/dataplug.db".to_string()
        });
        let base_url = env::var("DPG_BASE_URL").unwrap_or_else(|_| {
            let url = format!("http://{host}:{port}");
            info!("🪛️ DPG_BASE_URL is not set. Payment callbacks will point at {url}.");
            url
        });
        let activation_fee = env::var("DPG_ACTIVATION_FEE")
            .ok()
            .and_then(|s| match Cedis::from_ghs(s.parse::<f64>().ok()?) {
                Ok(fee) => Some(fee),
                Err(e) => {
                    error!("🪛️ DPG_ACTIVATION_FEE is invalid ({e}). Using the default.");
                    None
                },
            })
            .unwrap_or_else(|| Cedis::from(DEFAULT_ACTIVATION_FEE));
        let fulfillment_retry_secs = env::var("DPG_FULFILLMENT_RETRY_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FULFILLMENT_RETRY_SECS);
        let fulfillment_batch = env::var("DPG_FULFILLMENT_BATCH")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_FULFILLMENT_BATCH);
        info!("🪛️ Activation fee is {activation_fee}. Fulfillment retries run every {fulfillment_retry_secs}s.");
        let paystack = PaystackConfig::new_from_env_or_default();
        let datamart = DataMartConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            base_url,
            activation_fee,
            fulfillment_retry_secs,
            fulfillment_batch,
            paystack,
            datamart,
        }
    }
}
