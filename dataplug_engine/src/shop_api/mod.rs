//! The engine public API.
//!
//! The three APIs in this module wrap a [`crate::traits::StorefrontDatabase`] backend with the business rules
//! of the storefront: validation, price resolution, reference generation and the activation flow. The server
//! crate holds one instance of each in its application state.
pub mod agent_api;
pub mod catalog_api;
pub mod objects;
pub mod order_flow_api;

pub use agent_api::{AgentApi, AgentFlowError};
pub use catalog_api::CatalogApi;
pub use order_flow_api::{CheckoutError, OrderFlowApi};
