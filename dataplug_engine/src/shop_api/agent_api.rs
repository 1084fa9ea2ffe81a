use std::{collections::BTreeMap, fmt::Debug};

use dp_common::Cedis;
use log::*;
use thiserror::Error;

use crate::{
    db_types::{Agent, AgentStatus, NewAgent, NewTransaction, Order, Transaction},
    helpers::{new_reference, new_slug},
    shop_api::objects::{NewAgentRequest, ShopPackage, ShopProfile},
    traits::{AgentApiError, CatalogApiError, OrderFlowError, StorefrontDatabase},
};

// Slug generation carries a random suffix, so a handful of retries is plenty.
const MAX_SLUG_ATTEMPTS: usize = 3;

// Ghanaian mobile numbers in local format: a leading zero and nine digits.
fn is_ghana_msisdn(phone: &str) -> bool {
    phone.len() == 10 && phone.starts_with('0') && phone.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Error)]
pub enum AgentFlowError {
    #[error("Invalid registration: {0}")]
    Validation(String),
    #[error("Agent does not exist")]
    AgentNotFound,
    #[error("An account already exists for this user")]
    AgentAlreadyExists,
    #[error("This account is already activated")]
    AlreadyActivated,
    #[error("This account has not been activated yet")]
    NotActivated,
    #[error("Price for package '{0}' is below the minimum of {1}")]
    PriceBelowBase(String, Cedis),
    #[error("Unknown package '{0}'")]
    UnknownPackage(String),
    #[error(transparent)]
    AgentError(#[from] AgentApiError),
    #[error(transparent)]
    CatalogError(#[from] CatalogApiError),
    #[error(transparent)]
    OrderFlowError(#[from] OrderFlowError),
}

/// `AgentApi` covers the reseller-facing flows: registration, the activation payment, pricing and the shop view.
pub struct AgentApi<B> {
    db: B,
}

impl<B> Debug for AgentApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AgentApi")
    }
}

impl<B> AgentApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AgentApi<B>
where B: StorefrontDatabase
{
    /// Registers a new agent in `PENDING` status and assigns a shop slug derived from the business name.
    ///
    /// Slug collisions are retried with a fresh random suffix a few times before giving up.
    pub async fn register(&self, request: NewAgentRequest) -> Result<Agent, AgentFlowError> {
        if request.auth_uid.trim().is_empty() {
            return Err(AgentFlowError::Validation("An auth identifier is required".into()));
        }
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(AgentFlowError::Validation("A valid email address is required".into()));
        }
        if request.business_name.trim().is_empty() {
            return Err(AgentFlowError::Validation("A business name is required".into()));
        }
        if !is_ghana_msisdn(request.phone.trim()) {
            return Err(AgentFlowError::Validation(
                "A valid Ghanaian mobile number is required (e.g. 0241234567)".into(),
            ));
        }
        let mut last_err = AgentFlowError::AgentAlreadyExists;
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let agent = NewAgent {
                auth_uid: request.auth_uid.trim().to_string(),
                email: request.email.trim().to_lowercase(),
                name: request.name.trim().to_string(),
                business_name: request.business_name.trim().to_string(),
                phone: request.phone.trim().to_string(),
                slug: new_slug(&request.business_name),
            };
            match self.db.insert_agent(agent).await {
                Ok(agent) => {
                    info!("💻️ Agent '{}' registered. Shop slug: {}", agent.business_name, agent.slug);
                    return Ok(agent);
                },
                Err(AgentApiError::SlugTaken(slug)) => {
                    debug!("💻️ Shop slug '{slug}' collided. Trying again.");
                    last_err = AgentFlowError::AgentError(AgentApiError::SlugTaken(slug));
                },
                Err(AgentApiError::AgentAlreadyExists) => return Err(AgentFlowError::AgentAlreadyExists),
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err)
    }

    pub async fn agent_by_auth_uid(&self, auth_uid: &str) -> Result<Agent, AgentFlowError> {
        self.db.fetch_agent_by_auth_uid(auth_uid).await?.ok_or(AgentFlowError::AgentNotFound)
    }

    /// Creates the activation-fee payment transaction for a pending agent. The caller takes the reference to the
    /// payment gateway.
    pub async fn init_activation(&self, auth_uid: &str, fee: Cedis) -> Result<(Agent, Transaction), AgentFlowError> {
        let agent = self.agent_by_auth_uid(auth_uid).await?;
        if agent.status == AgentStatus::Activated {
            return Err(AgentFlowError::AlreadyActivated);
        }
        let transaction = NewTransaction::for_activation(new_reference("act"), agent.id, fee);
        let transaction = self.db.insert_transaction(transaction).await?;
        info!("💻️ Activation payment of {fee} initiated for agent #{} ({})", agent.id, transaction.reference);
        Ok((agent, transaction))
    }

    /// Confirms a successful activation payment. Idempotent; a repeated confirmation returns the activated agent.
    pub async fn complete_activation(&self, reference: &str) -> Result<Agent, AgentFlowError> {
        let agent = self.db.complete_activation(reference).await?;
        Ok(agent)
    }

    /// Records a failed activation payment. The agent stays `PENDING` and can try again.
    pub async fn fail_activation(&self, reference: &str) -> Result<Transaction, AgentFlowError> {
        let transaction = self.db.fail_transaction(reference).await?;
        Ok(transaction)
    }

    /// Replaces the agent's price overrides.
    ///
    /// Every price is validated against the catalog floor before anything is written: one bad price rejects the
    /// whole update, so the stored map never contains a below-base entry.
    pub async fn set_prices(&self, auth_uid: &str, prices: BTreeMap<String, Cedis>) -> Result<Agent, AgentFlowError> {
        let agent = self.agent_by_auth_uid(auth_uid).await?;
        if agent.status != AgentStatus::Activated {
            return Err(AgentFlowError::NotActivated);
        }
        let mut overrides = BTreeMap::new();
        for (package_id, price) in prices {
            let package = self
                .db
                .fetch_package(&package_id)
                .await?
                .ok_or_else(|| AgentFlowError::UnknownPackage(package_id.clone()))?;
            if price < package.base_price {
                return Err(AgentFlowError::PriceBelowBase(package_id, package.base_price));
            }
            overrides.insert(package_id, price);
        }
        let agent = self.db.update_price_overrides(agent.id, overrides).await?;
        info!("💻️ Agent #{} updated their shop prices", agent.id);
        Ok(agent)
    }

    /// The public shop view for a slug: storefront identity plus the catalog with the agent's prices applied.
    /// Only activated shops are visible.
    pub async fn shop_profile(&self, slug: &str) -> Result<Option<ShopProfile>, AgentFlowError> {
        let Some(agent) = self.db.fetch_agent_by_slug(slug).await? else {
            return Ok(None);
        };
        if agent.status != AgentStatus::Activated {
            return Ok(None);
        }
        let packages = self
            .db
            .fetch_active_packages()
            .await?
            .iter()
            .map(|p| ShopPackage::from_package(p, agent.price_override_for(&p.id)))
            .collect();
        Ok(Some(ShopProfile { slug: agent.slug, business_name: agent.business_name, packages }))
    }

    /// The agent's order history, most recent first.
    pub async fn orders(&self, auth_uid: &str) -> Result<Vec<Order>, AgentFlowError> {
        let agent = self.agent_by_auth_uid(auth_uid).await?;
        let orders = self.db.fetch_orders_for_agent(agent.id).await?;
        Ok(orders)
    }
}
