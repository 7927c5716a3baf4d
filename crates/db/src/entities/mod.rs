//! `SeaORM` entity definitions.

pub mod organizations;
pub mod policy_rules;
pub mod transactions;
pub mod users;
pub mod wallets;
