//! `SeaORM` Entity for the policy table.
//!
//! One row per rule (`ptype = 'p'`: subject, domain, object, action) or
//! grouping edge (`ptype = 'g'`: user, role, domain, with `v3` empty).

use sea_orm::entity::prelude::*;

/// Row kind for a permission rule.
pub const RULE: &str = "p";
/// Row kind for a role assignment.
pub const ASSIGNMENT: &str = "g";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "policy_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ptype: String,
    pub v0: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
