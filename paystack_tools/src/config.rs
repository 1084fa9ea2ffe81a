use log::*;
use dp_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct PaystackConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
}

impl PaystackConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("DPG_PAYSTACK_API_URL").unwrap_or_else(|_| {
            info!("DPG_PAYSTACK_API_URL not set, using https://api.paystack.co");
            "https://api.paystack.co".to_string()
        });
        let secret_key = Secret::new(std::env::var("DPG_PAYSTACK_SECRET_KEY").unwrap_or_else(|_| {
            warn!("DPG_PAYSTACK_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        Self { api_url, secret_key }
    }
}
