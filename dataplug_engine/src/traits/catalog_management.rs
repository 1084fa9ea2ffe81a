use thiserror::Error;

use crate::db_types::Package;

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// Read access to the shared package catalog. The catalog is seeded by migration and is the single source of
/// truth for base prices.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches all active packages, ordered by network then capacity.
    async fn fetch_active_packages(&self) -> Result<Vec<Package>, CatalogApiError>;

    /// Fetches a single package by id, whether active or not.
    async fn fetch_package(&self, package_id: &str) -> Result<Option<Package>, CatalogApiError>;
}
