//! Process-scoped service context.
//!
//! Built once at start-up and shared by every request handler. Nothing in
//! the core holds global state; tests build a fresh context each time.

use std::sync::Arc;

use coffer_shared::config::WorkflowConfig;

use crate::accounts::AccountService;
use crate::authorization::AuthorizationGate;
use crate::organization::OrganizationService;
use crate::policy::{PolicyEngine, PolicyError, PolicyStore};
use crate::store::{MemoryStore, OrganizationStore, PrincipalStore, WalletStore};
use crate::workflow::TransactionWorkflow;

/// Repositories the services persist through.
#[derive(Clone)]
pub struct Stores {
    /// Principals.
    pub principals: Arc<dyn PrincipalStore>,
    /// Organizations.
    pub organizations: Arc<dyn OrganizationStore>,
    /// Wallets and transactions.
    pub wallets: Arc<dyn WalletStore>,
    /// Policy rules and grouping edges.
    pub policies: Arc<dyn PolicyStore>,
}

impl Stores {
    /// Every repository backed by one shared [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            principals: store.clone(),
            organizations: store.clone(),
            wallets: store.clone(),
            policies: store,
        }
    }
}

/// Every core service, wired together.
#[derive(Debug, Clone)]
pub struct CoreContext {
    /// Shared policy engine.
    pub policy: Arc<PolicyEngine>,
    /// Capability checks.
    pub gate: AuthorizationGate,
    /// Registration and login.
    pub accounts: AccountService,
    /// Organizations and membership.
    pub organizations: OrganizationService,
    /// Wallets and transactions.
    pub workflow: TransactionWorkflow,
}

impl CoreContext {
    /// Loads the policy enforcer and wires the services.
    pub async fn initialize(stores: Stores, config: WorkflowConfig) -> Result<Self, PolicyError> {
        let policy = Arc::new(PolicyEngine::load(stores.policies.clone()).await?);
        let gate = AuthorizationGate::new(policy.clone());
        let accounts = AccountService::new(stores.principals.clone());
        let organizations = OrganizationService::new(
            stores.organizations.clone(),
            stores.principals.clone(),
            gate.clone(),
        );
        let workflow = TransactionWorkflow::new(
            accounts.clone(),
            stores.organizations,
            stores.wallets,
            gate.clone(),
            config,
        );

        Ok(Self {
            policy,
            gate,
            accounts,
            organizations,
            workflow,
        })
    }

    /// A context over a fresh in-memory store.
    pub async fn in_memory(config: WorkflowConfig) -> Result<Self, PolicyError> {
        Self::initialize(Stores::in_memory(), config).await
    }
}
