//! # DataPlug server
//! This module hosts the HTTP layer of the DataPlug reseller storefront. It is responsible for:
//! * Serving public shop pages and the shared package catalog.
//! * Accepting customer checkouts and sending them to the payment gateway.
//! * Verifying payment outcomes (on customer return and via webhook) and driving fulfillment and settlement.
//! * The agent-facing endpoints: registration, account activation and shop pricing.
//!
//! ## Configuration
//! The server is configured via `DPG_*` environment variables. See [config](config/index.html) for more
//! information.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod fulfillment_worker;
pub mod helpers;
pub mod routes;
pub mod server;

pub mod agent_routes;

#[cfg(test)]
mod endpoint_tests;
