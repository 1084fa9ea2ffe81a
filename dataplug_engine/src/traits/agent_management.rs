use dp_common::Cedis;
use thiserror::Error;

use crate::db_types::{Agent, NewAgent, Order, PriceOverrides};

#[derive(Debug, Clone, Error)]
pub enum AgentApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Agent does not exist")]
    AgentNotFound,
    #[error("An agent with this auth id or email already exists")]
    AgentAlreadyExists,
    #[error("The shop slug '{0}' is already taken")]
    SlugTaken(String),
    #[error("Price for package '{0}' is below the catalog base price of {1}")]
    PriceBelowBase(String, Cedis),
}

impl From<sqlx::Error> for AgentApiError {
    fn from(e: sqlx::Error) -> Self {
        AgentApiError::DatabaseError(e.to_string())
    }
}

/// The `AgentManagement` trait defines behaviour for managing agent accounts.
///
/// An agent is a reseller with a shop slug and an optional set of price overrides against the shared catalog.
/// The [`StorefrontDatabase`](super::StorefrontDatabase) trait handles the money-moving machinery; this trait
/// covers the account records themselves.
#[allow(async_fn_in_trait)]
pub trait AgentManagement {
    /// Fetches the agent that owns the given shop slug.
    async fn fetch_agent_by_slug(&self, slug: &str) -> Result<Option<Agent>, AgentApiError>;

    /// Fetches the agent associated with the given external auth identifier.
    async fn fetch_agent_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Agent>, AgentApiError>;

    /// Creates a new agent record in `PENDING` status.
    ///
    /// Returns `AgentAlreadyExists` if the auth id or email is already registered, and `SlugTaken` if the slug
    /// collides with an existing shop.
    async fn insert_agent(&self, agent: NewAgent) -> Result<Agent, AgentApiError>;

    /// Replaces the agent's price override map. Floor validation happens in the API layer; this method persists
    /// whatever it is given.
    async fn update_price_overrides(&self, agent_id: i64, overrides: PriceOverrides) -> Result<Agent, AgentApiError>;

    /// Transitions the agent from `PENDING` to `ACTIVATED`, stamping `activated_at`.
    ///
    /// The update is conditional on the current status, so a repeated activation confirmation is a no-op and
    /// returns `None`.
    async fn activate_agent(&self, agent_id: i64) -> Result<Option<Agent>, AgentApiError>;

    /// Fetches the agent's orders, most recent first.
    async fn fetch_orders_for_agent(&self, agent_id: i64) -> Result<Vec<Order>, AgentApiError>;
}
