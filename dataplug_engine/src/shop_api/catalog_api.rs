use std::fmt::Debug;

use crate::{
    db_types::Package,
    traits::{CatalogApiError, CatalogManagement},
};

/// Read access to the shared catalog, independent of any shop.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    /// All active packages at their base prices.
    pub async fn active_packages(&self) -> Result<Vec<Package>, CatalogApiError> {
        self.db.fetch_active_packages().await
    }

    pub async fn package(&self, package_id: &str) -> Result<Option<Package>, CatalogApiError> {
        self.db.fetch_package(package_id).await
    }
}
