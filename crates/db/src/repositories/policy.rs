//! Policy repository: durable rules and grouping edges.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use coffer_core::policy::{PolicyRule, PolicySnapshot, PolicyStore, RoleAssignment};
use coffer_core::store::StoreError;

use crate::entities::policy_rules::{self, ASSIGNMENT, RULE};
use crate::error::store_error;

/// Policy persistence backed by the `policy_rules` table.
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    db: DatabaseConnection,
}

impl PolicyRepository {
    /// Creates a new policy repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_row(&self, ptype: &str, values: [&str; 4]) -> Result<(), StoreError> {
        let [v0, v1, v2, v3] = values;
        let row = policy_rules::ActiveModel {
            ptype: Set(ptype.to_string()),
            v0: Set(v0.to_string()),
            v1: Set(v1.to_string()),
            v2: Set(v2.to_string()),
            v3: Set(v3.to_string()),
            ..Default::default()
        };

        policy_rules::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    policy_rules::Column::Ptype,
                    policy_rules::Column::V0,
                    policy_rules::Column::V1,
                    policy_rules::Column::V2,
                    policy_rules::Column::V3,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_row(&self, ptype: &str, values: [&str; 4]) -> Result<(), StoreError> {
        let [v0, v1, v2, v3] = values;
        policy_rules::Entity::delete_many()
            .filter(policy_rules::Column::Ptype.eq(ptype))
            .filter(policy_rules::Column::V0.eq(v0))
            .filter(policy_rules::Column::V1.eq(v1))
            .filter(policy_rules::Column::V2.eq(v2))
            .filter(policy_rules::Column::V3.eq(v3))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for PolicyRepository {
    async fn load_policies(&self) -> Result<PolicySnapshot, StoreError> {
        let rows = policy_rules::Entity::find()
            .order_by_asc(policy_rules::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        let mut snapshot = PolicySnapshot::default();
        for row in rows {
            match row.ptype.as_str() {
                RULE => snapshot
                    .rules
                    .push(PolicyRule::new(&row.v0, &row.v1, &row.v2, &row.v3)),
                ASSIGNMENT => snapshot
                    .assignments
                    .push(RoleAssignment::new(&row.v0, &row.v1, &row.v2)),
                other => tracing::warn!(id = row.id, ptype = other, "skipping unknown policy row"),
            }
        }

        tracing::debug!(
            rules = snapshot.rules.len(),
            assignments = snapshot.assignments.len(),
            "policies loaded"
        );
        Ok(snapshot)
    }

    async fn save_rule(&self, rule: &PolicyRule) -> Result<(), StoreError> {
        self.insert_row(
            RULE,
            [
                rule.subject.as_str(),
                rule.domain.as_str(),
                rule.object.as_str(),
                rule.action.as_str(),
            ],
        )
        .await
    }

    async fn remove_rule(&self, rule: &PolicyRule) -> Result<(), StoreError> {
        self.delete_row(
            RULE,
            [
                rule.subject.as_str(),
                rule.domain.as_str(),
                rule.object.as_str(),
                rule.action.as_str(),
            ],
        )
        .await
    }

    async fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        self.insert_row(
            ASSIGNMENT,
            [
                assignment.subject.as_str(),
                assignment.role.as_str(),
                assignment.domain.as_str(),
                "",
            ],
        )
        .await
    }

    async fn remove_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        self.delete_row(
            ASSIGNMENT,
            [
                assignment.subject.as_str(),
                assignment.role.as_str(),
                assignment.domain.as_str(),
                "",
            ],
        )
        .await
    }
}
