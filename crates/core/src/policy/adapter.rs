//! Casbin adapter over a [`PolicyStore`].
//!
//! Section `p` rows map to [`PolicyRule`], section `g` rows to
//! [`RoleAssignment`]. Store failures travel through casbin as
//! [`AdapterError`] and are unwrapped again by [`PolicyError`].
//!
//! [`PolicyError`]: crate::policy::PolicyError

use std::sync::Arc;

use async_trait::async_trait;
use casbin::error::AdapterError;
use casbin::{Adapter, Filter, Model};

use crate::policy::store::PolicyStore;
use crate::policy::types::{PolicyRule, PolicySnapshot, RoleAssignment};
use crate::store::StoreError;

const RULE: &str = "p";
const ASSIGNMENT: &str = "g";

fn adapter_error(err: StoreError) -> casbin::Error {
    casbin::Error::AdapterError(AdapterError(Box::new(err)))
}

/// Empty filter fields match anything.
fn matches(filter: &[impl AsRef<str>], values: &[String]) -> bool {
    filter
        .iter()
        .zip(values)
        .all(|(wanted, value)| wanted.as_ref().is_empty() || wanted.as_ref() == value)
}

/// Feeds the enforcer from the policy repository and writes its mutations back.
pub struct StoreAdapter {
    store: Arc<dyn PolicyStore>,
    filtered: bool,
}

impl StoreAdapter {
    /// Wraps a repository.
    #[must_use]
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            store,
            filtered: false,
        }
    }

    async fn snapshot(&self) -> casbin::Result<PolicySnapshot> {
        self.store.load_policies().await.map_err(adapter_error)
    }

    async fn save_row(&self, ptype: &str, values: &[String]) -> casbin::Result<bool> {
        match ptype {
            RULE => match PolicyRule::from_values(values) {
                Some(rule) => self.store.save_rule(&rule).await.map_err(adapter_error)?,
                None => return Ok(false),
            },
            ASSIGNMENT => match RoleAssignment::from_values(values) {
                Some(edge) => self.store.save_assignment(&edge).await.map_err(adapter_error)?,
                None => return Ok(false),
            },
            _ => return Ok(false),
        }
        Ok(true)
    }

    async fn remove_row(&self, ptype: &str, values: &[String]) -> casbin::Result<bool> {
        match ptype {
            RULE => match PolicyRule::from_values(values) {
                Some(rule) => self.store.remove_rule(&rule).await.map_err(adapter_error)?,
                None => return Ok(false),
            },
            ASSIGNMENT => match RoleAssignment::from_values(values) {
                Some(edge) => self.store.remove_assignment(&edge).await.map_err(adapter_error)?,
                None => return Ok(false),
            },
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[async_trait]
impl Adapter for StoreAdapter {
    async fn load_policy(&mut self, m: &mut dyn Model) -> casbin::Result<()> {
        let snapshot = self.snapshot().await?;
        for rule in &snapshot.rules {
            m.add_policy(RULE, RULE, rule.to_values());
        }
        for edge in &snapshot.assignments {
            m.add_policy(ASSIGNMENT, ASSIGNMENT, edge.to_values());
        }
        self.filtered = false;
        Ok(())
    }

    async fn load_filtered_policy<'a>(
        &mut self,
        m: &mut dyn Model,
        f: Filter<'a>,
    ) -> casbin::Result<()> {
        let snapshot = self.snapshot().await?;
        for values in snapshot.rules.iter().map(PolicyRule::to_values) {
            if matches(f.p.as_slice(), &values) {
                m.add_policy(RULE, RULE, values);
            }
        }
        for values in snapshot.assignments.iter().map(RoleAssignment::to_values) {
            if matches(f.g.as_slice(), &values) {
                m.add_policy(ASSIGNMENT, ASSIGNMENT, values);
            }
        }
        self.filtered = true;
        Ok(())
    }

    async fn save_policy(&mut self, m: &mut dyn Model) -> casbin::Result<()> {
        for values in m.get_policy(RULE, RULE) {
            self.save_row(RULE, &values).await?;
        }
        for values in m.get_policy(ASSIGNMENT, ASSIGNMENT) {
            self.save_row(ASSIGNMENT, &values).await?;
        }
        Ok(())
    }

    async fn clear_policy(&mut self) -> casbin::Result<()> {
        let snapshot = self.snapshot().await?;
        for rule in &snapshot.rules {
            self.store.remove_rule(rule).await.map_err(adapter_error)?;
        }
        for edge in &snapshot.assignments {
            self.store.remove_assignment(edge).await.map_err(adapter_error)?;
        }
        Ok(())
    }

    fn is_filtered(&self) -> bool {
        self.filtered
    }

    async fn add_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        rule: Vec<String>,
    ) -> casbin::Result<bool> {
        self.save_row(ptype, &rule).await
    }

    async fn add_policies(
        &mut self,
        _sec: &str,
        ptype: &str,
        rules: Vec<Vec<String>>,
    ) -> casbin::Result<bool> {
        let mut added = false;
        for rule in &rules {
            added |= self.save_row(ptype, rule).await?;
        }
        Ok(added)
    }

    async fn remove_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        rule: Vec<String>,
    ) -> casbin::Result<bool> {
        self.remove_row(ptype, &rule).await
    }

    async fn remove_policies(
        &mut self,
        _sec: &str,
        ptype: &str,
        rules: Vec<Vec<String>>,
    ) -> casbin::Result<bool> {
        let mut removed = false;
        for rule in &rules {
            removed |= self.remove_row(ptype, rule).await?;
        }
        Ok(removed)
    }

    async fn remove_filtered_policy(
        &mut self,
        _sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> casbin::Result<bool> {
        let snapshot = self.snapshot().await?;
        let rows: Vec<Vec<String>> = match ptype {
            RULE => snapshot.rules.iter().map(PolicyRule::to_values).collect(),
            ASSIGNMENT => snapshot
                .assignments
                .iter()
                .map(RoleAssignment::to_values)
                .collect(),
            _ => return Ok(false),
        };

        let mut removed = false;
        for values in rows {
            let Some(tail) = values.get(field_index..) else {
                continue;
            };
            if matches(field_values.as_slice(), tail) {
                removed |= self.remove_row(ptype, &values).await?;
            }
        }
        Ok(removed)
    }
}
