//! User repository for principal persistence.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use coffer_core::accounts::{NewPrincipal, Principal};
use coffer_core::store::{PrincipalStore, StoreError};
use coffer_shared::types::UserId;

use crate::entities::users;
use crate::error::store_error;

/// Principal persistence backed by the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escapes `LIKE` wildcards and wraps the lowered query in `%`.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl PrincipalStore for UserRepository {
    async fn create_principal(&self, principal: NewPrincipal) -> Result<Principal, StoreError> {
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(principal.username),
            email: Set(principal.email),
            first_name: Set(principal.first_name),
            last_name: Set(principal.last_name),
            password_hash: Set(principal.password_hash),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = user.insert(&self.db).await.map_err(store_error)?;
        Ok(model.into())
    }

    async fn find_principal(&self, id: UserId) -> Result<Option<Principal>, StoreError> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_principal_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn search_principals(
        &self,
        query: &str,
        exclude: UserId,
        limit: u64,
    ) -> Result<Vec<Principal>, StoreError> {
        let pattern = contains_pattern(query);
        let matches = [
            users::Column::Username,
            users::Column::FirstName,
            users::Column::LastName,
            users::Column::Email,
        ]
        .into_iter()
        .fold(Condition::any(), |cond, column| {
            cond.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.as_str()))
        });

        let models = users::Entity::find()
            .filter(users::Column::Id.ne(exclude.into_inner()))
            .filter(matches)
            .order_by_asc(users::Column::Username)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
