use log::debug;
use sqlx::{types::Json, SqliteConnection};
use dp_common::Cedis;

use crate::{
    db_types::{Agent, NewAgent, PriceOverrides},
    traits::AgentApiError,
};

pub async fn insert_agent(agent: NewAgent, conn: &mut SqliteConnection) -> Result<Agent, AgentApiError> {
    let inserted = sqlx::query_as(
        r#"
            INSERT INTO agents (auth_uid, email, name, business_name, phone, slug)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(agent.auth_uid)
    .bind(agent.email)
    .bind(agent.name)
    .bind(agent.business_name)
    .bind(agent.phone)
    .bind(agent.slug.clone())
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            if err.message().contains("slug") {
                AgentApiError::SlugTaken(agent.slug)
            } else {
                AgentApiError::AgentAlreadyExists
            }
        },
        e => AgentApiError::from(e),
    })?;
    Ok(inserted)
}

pub async fn fetch_agent_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Agent>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM agents WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_agent_by_slug(slug: &str, conn: &mut SqliteConnection) -> Result<Option<Agent>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM agents WHERE slug = $1").bind(slug).fetch_optional(conn).await
}

pub async fn fetch_agent_by_auth_uid(
    auth_uid: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Agent>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM agents WHERE auth_uid = $1").bind(auth_uid).fetch_optional(conn).await
}

pub async fn update_price_overrides(
    agent_id: i64,
    overrides: PriceOverrides,
    conn: &mut SqliteConnection,
) -> Result<Agent, AgentApiError> {
    let agent = sqlx::query_as(
        r#"
            UPDATE agents
            SET price_overrides = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(Json(overrides))
    .bind(agent_id)
    .fetch_optional(conn)
    .await?
    .ok_or(AgentApiError::AgentNotFound)?;
    Ok(agent)
}

/// Activates the agent. The update is conditional on the current status being `PENDING`, so a second activation
/// attempt returns `None` and changes nothing.
pub async fn activate_agent(agent_id: i64, conn: &mut SqliteConnection) -> Result<Option<Agent>, sqlx::Error> {
    let agent: Option<Agent> = sqlx::query_as(
        r#"
            UPDATE agents
            SET status = 'ACTIVATED', activated_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *;
        "#,
    )
    .bind(agent_id)
    .fetch_optional(conn)
    .await?;
    if let Some(agent) = &agent {
        debug!("🗃️ Agent {} ({}) activated", agent.id, agent.slug);
    }
    Ok(agent)
}

/// Credits a completed order's commission to the agent. The counters are incremented in place so concurrent
/// settlements for different orders cannot lose updates.
pub async fn credit_commission(
    agent_id: i64,
    commission: Cedis,
    conn: &mut SqliteConnection,
) -> Result<Agent, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE agents
            SET total_earned = total_earned + $1,
                balance = balance + $1,
                total_orders = total_orders + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(commission.value())
    .bind(agent_id)
    .fetch_one(conn)
    .await
}
