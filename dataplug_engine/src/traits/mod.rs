//! # Database management and control.
//!
//! This module provides the interfaces that define the contracts of the storefront database *backends*.
//!
//! ## Traits
//! * [`StorefrontDatabase`] defines the highest level of behavior for backends: the checkout/payment/settlement
//!   flow and the transaction ledger.
//! * [`AgentManagement`] defines behavior for managing agent accounts, their activation and their pricing.
//! * [`CatalogManagement`] provides read access to the shared package catalog.
mod agent_management;
mod catalog_management;
mod data_objects;
mod storefront_database;

pub use agent_management::{AgentApiError, AgentManagement};
pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use data_objects::{ProviderFulfillment, SettlementOutcome};
pub use storefront_database::{OrderFlowError, StorefrontDatabase};
