//! A thin client for the DataMart wholesale API. The storefront only uses one call: placing a data-bundle
//! order for a customer's phone number after their payment has been confirmed.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::DataMartApi;
pub use config::DataMartConfig;
pub use data_objects::{DataMartOrder, NewDataMartOrder};
pub use error::DataMartApiError;
