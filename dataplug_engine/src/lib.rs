//! DataPlug Engine
//!
//! The DataPlug engine is the storage and domain layer of the DataPlug reseller storefront. It is responsible for
//! agents (resellers), the shared package catalog, orders and their payment transactions, and the commission
//! settlement that credits an agent when a customer order completes.
//!
//! The crate is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@shop_api`]). This provides the public-facing functionality of the engine:
//!    checkout initiation, payment outcome recording, settlement, agent registration, activation and pricing.
//!    Specific backends need to implement the traits in the [`mod@traits`] module in order to act as a backend for
//!    the DataPlug server.
//!
//! All multi-step writes (order status transitions plus the balance settlement) execute as single conditional
//! updates inside one database transaction, so concurrent payment confirmations for the same reference settle a
//! commission exactly once.
pub mod db_types;
pub mod helpers;
mod shop_api;
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::{run_migrations, SqliteDatabase};
pub use shop_api::{
    objects::{CheckoutRequest, NewAgentRequest, PendingCheckout, ShopPackage, ShopProfile},
    AgentApi,
    AgentFlowError,
    CatalogApi,
    CheckoutError,
    OrderFlowApi,
};
