//! Organization repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use coffer_core::organization::Organization;
use coffer_core::store::{OrganizationStore, StoreError};
use coffer_shared::types::OrganizationId;

use crate::entities::organizations;
use crate::error::store_error;

/// Organization persistence backed by the `organizations` table.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationStore for OrganizationRepository {
    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError> {
        let org = organizations::ActiveModel {
            id: Set(OrganizationId::new().into_inner()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = org.insert(&self.db).await.map_err(store_error)?;
        Ok(model.into())
    }

    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, StoreError> {
        let model = organizations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }
}
