use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::{OrderFlowError, ProviderFulfillment},
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderFlowError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                agent_id,
                customer_phone,
                customer_email,
                package_id,
                package_name,
                network,
                capacity,
                base_price,
                sale_price,
                commission
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.agent_id)
    .bind(order.customer_phone)
    .bind(order.customer_email)
    .bind(order.package_id)
    .bind(order.package_name)
    .bind(order.network)
    .bind(order.capacity)
    .bind(order.base_price)
    .bind(order.sale_price)
    .bind(order.commission)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await
}

pub async fn fetch_orders_for_agent(agent_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE agent_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(agent_id)
        .fetch_all(conn)
        .await
}

/// Moves a `PENDING` order to `FAILED`. Orders in any other state are left untouched and `None` is returned.
pub async fn mark_order_failed(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'FAILED', updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1 AND status = 'PENDING'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await
}

/// Moves a `PENDING` order to `PENDING_FULFILLMENT` after a confirmed payment with a failed provider call.
pub async fn mark_order_awaiting_fulfillment(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'PENDING_FULFILLMENT', updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1 AND status = 'PENDING'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await
}

/// Moves an order to `COMPLETED` and stamps the provider identifiers. The update is conditional on the order
/// being in `PENDING` or `PENDING_FULFILLMENT`; when two confirmations race, only one sees the transition.
/// Returns `None` if the order was already terminal.
pub async fn complete_order(
    order_id: &OrderId,
    fulfillment: &ProviderFulfillment,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'COMPLETED',
                provider_order_id = $1,
                provider_status = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3 AND status IN ('PENDING', 'PENDING_FULFILLMENT')
            RETURNING *;
        "#,
    )
    .bind(fulfillment.provider_order_id.as_deref())
    .bind(fulfillment.provider_status.as_deref())
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await
}

/// Fetches orders waiting on a fulfillment retry, oldest first.
pub async fn fetch_orders_awaiting_fulfillment(
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM orders WHERE status = 'PENDING_FULFILLMENT' ORDER BY created_at ASC, id ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(conn)
    .await
}
