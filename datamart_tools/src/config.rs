use log::*;
use dp_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct DataMartConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
}

impl DataMartConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("DPG_DATAMART_API_URL").unwrap_or_else(|_| {
            info!("DPG_DATAMART_API_URL not set, using https://api.datamart.shop");
            "https://api.datamart.shop".to_string()
        });
        let api_key = Secret::new(std::env::var("DPG_DATAMART_API_KEY").unwrap_or_else(|_| {
            warn!("DPG_DATAMART_API_KEY not set, using (probably useless) default");
            "dm_00000000000000".to_string()
        }));
        Self { api_url, api_key }
    }
}
