use sqlx::SqliteConnection;

use crate::db_types::Package;

pub async fn fetch_active_packages(conn: &mut SqliteConnection) -> Result<Vec<Package>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM packages WHERE active = 1 ORDER BY network, base_price").fetch_all(conn).await
}

pub async fn fetch_package(package_id: &str, conn: &mut SqliteConnection) -> Result<Option<Package>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM packages WHERE id = $1").bind(package_id).fetch_optional(conn).await
}
