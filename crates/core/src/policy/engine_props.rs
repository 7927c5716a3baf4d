//! Property tests for policy evaluation.

use std::sync::Arc;

use proptest::prelude::*;

use crate::policy::engine::PolicyEngine;
use crate::policy::store::PolicyStore;
use crate::policy::types::{PolicyRule, RoleAssignment};
use crate::store::MemoryStore;

const OBJECTS: [&str; 3] = ["wallet", "transaction", "member"];
const ACTIONS: [&str; 4] = ["create", "delete", "approve", "manage"];
const ROLES: [&str; 4] = ["owner", "treasurer", "reviewer", "member"];
const DOMAINS: [&str; 3] = ["org-a", "org-b", "org-c"];

fn rule_strategy() -> impl Strategy<Value = PolicyRule> {
    (0..ROLES.len(), 0..DOMAINS.len(), 0..OBJECTS.len(), 0..ACTIONS.len())
        .prop_map(|(r, d, o, a)| PolicyRule::new(ROLES[r], DOMAINS[d], OBJECTS[o], ACTIONS[a]))
}

fn assignment_strategy() -> impl Strategy<Value = RoleAssignment> {
    (0..4usize, 0..ROLES.len(), 0..DOMAINS.len())
        .prop_map(|(u, r, d)| RoleAssignment::new(&format!("user-{u}"), ROLES[r], DOMAINS[d]))
}

/// Reference evaluation over flat lists, without role inheritance.
fn granted(
    rules: &[PolicyRule],
    assignments: &[RoleAssignment],
    subject: &str,
    domain: &str,
    object: &str,
    action: &str,
) -> bool {
    rules.iter().any(|rule| {
        rule.domain == domain
            && rule.object == object
            && rule.action == action
            && (rule.subject == subject
                || assignments.iter().any(|edge| {
                    edge.subject == subject && edge.role == rule.subject && edge.domain == domain
                }))
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn engine_with(rules: &[PolicyRule], assignments: &[RoleAssignment]) -> PolicyEngine {
    let store = Arc::new(MemoryStore::new());
    for rule in rules {
        store.save_rule(rule).await.unwrap();
    }
    for edge in assignments {
        store.save_assignment(edge).await.unwrap();
    }
    PolicyEngine::load(store).await.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn enforce_matches_reference(
        rules in prop::collection::vec(rule_strategy(), 0..24),
        assignments in prop::collection::vec(assignment_strategy(), 0..12),
        user in 0..5usize,
        domain in 0..DOMAINS.len(),
        object in 0..OBJECTS.len(),
        action in 0..ACTIONS.len(),
    ) {
        let subject = format!("user-{user}");
        let expected = granted(
            &rules,
            &assignments,
            &subject,
            DOMAINS[domain],
            OBJECTS[object],
            ACTIONS[action],
        );

        let allowed = runtime().block_on(async {
            let engine = engine_with(&rules, &assignments).await;
            engine
                .enforce(&subject, DOMAINS[domain], OBJECTS[object], ACTIONS[action])
                .await
        });
        prop_assert_eq!(allowed, expected);
    }

    #[test]
    fn revoked_assignment_never_grants_in_domain(
        rules in prop::collection::vec(rule_strategy(), 0..24),
        edge in assignment_strategy(),
        object in 0..OBJECTS.len(),
        action in 0..ACTIONS.len(),
    ) {
        let allowed = runtime().block_on(async {
            let engine = engine_with(&rules, &[]).await;
            engine
                .add_role_for_user(&edge.subject, &edge.role, &edge.domain)
                .await
                .unwrap();
            engine
                .delete_role_for_user(&edge.subject, &edge.role, &edge.domain)
                .await
                .unwrap();
            engine
                .enforce(&edge.subject, &edge.domain, OBJECTS[object], ACTIONS[action])
                .await
        });
        prop_assert!(!allowed);
    }
}
