//! A thin client for the parts of the Paystack API that the storefront uses: initializing a payment for a
//! checkout or activation fee, and verifying the payment outcome for a reference.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::PaystackApi;
pub use config::PaystackConfig;
pub use data_objects::{
    ChargeMetadata,
    InitializeTransactionRequest,
    PaymentAuthorization,
    VerifiedCharge,
    VerifiedChargeStatus,
};
pub use error::PaystackApiError;
