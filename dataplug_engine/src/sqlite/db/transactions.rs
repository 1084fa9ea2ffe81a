use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTransaction, Transaction, TransactionStatus},
    traits::OrderFlowError,
};

pub async fn insert_transaction(
    transaction: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Transaction, OrderFlowError> {
    let reference = transaction.reference.clone();
    let inserted = sqlx::query_as(
        r#"
            INSERT INTO transactions (reference, purpose, order_id, agent_id, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(transaction.reference)
    .bind(transaction.purpose)
    .bind(transaction.order_id)
    .bind(transaction.agent_id)
    .bind(transaction.amount)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => OrderFlowError::DuplicateReference(reference),
        e => OrderFlowError::from(e),
    })?;
    Ok(inserted)
}

pub async fn fetch_transaction_for_order(
    order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE order_id = $1 ORDER BY id DESC LIMIT 1")
        .bind(order_id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_transaction_by_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE reference = $1").bind(reference).fetch_optional(conn).await
}

/// Moves a `PENDING` transaction to the given terminal status. Transactions that are already terminal are left
/// untouched and `None` is returned.
pub async fn update_transaction_status(
    reference: &str,
    status: TransactionStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE transactions
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE reference = $2 AND status = 'PENDING'
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(reference)
    .fetch_optional(conn)
    .await
}
