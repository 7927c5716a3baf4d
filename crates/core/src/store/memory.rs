//! In-process repository.
//!
//! Holds everything behind one mutex, so each call is atomic with respect to
//! every other call. The lock is never held across an await point.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;

use coffer_shared::types::{OrganizationId, PageRequest, TransactionId, UserId, WalletId};

use crate::accounts::{NewPrincipal, Principal};
use crate::organization::Organization;
use crate::policy::{PolicyRule, PolicySnapshot, PolicyStore, RoleAssignment};
use crate::store::{OrganizationStore, PrincipalStore, StoreError, WalletStore};
use crate::workflow::{NewTransaction, NewWallet, TransactionRecord, Wallet};

#[derive(Default)]
struct State {
    principals: HashMap<UserId, Principal>,
    organizations: HashMap<OrganizationId, Organization>,
    wallets: HashMap<WalletId, Wallet>,
    transactions: Vec<TransactionRecord>,
    rules: BTreeSet<PolicyRule>,
    assignments: BTreeSet<RoleAssignment>,
}

/// Repository backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryStore")
            .field("principals", &state.principals.len())
            .field("organizations", &state.organizations.len())
            .field("wallets", &state.wallets.len())
            .field("transactions", &state.transactions.len())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl PrincipalStore for MemoryStore {
    async fn create_principal(&self, principal: NewPrincipal) -> Result<Principal, StoreError> {
        let mut state = self.state.lock();
        let duplicate = state.principals.values().any(|existing| {
            existing.email == principal.email || existing.username == principal.username
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "principal {} already exists",
                principal.email
            )));
        }

        let created = Principal {
            id: UserId::new(),
            username: principal.username,
            email: principal.email,
            first_name: principal.first_name,
            last_name: principal.last_name,
            password_hash: principal.password_hash,
        };
        state.principals.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_principal(&self, id: UserId) -> Result<Option<Principal>, StoreError> {
        Ok(self.state.lock().principals.get(&id).cloned())
    }

    async fn find_principal_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Principal>, StoreError> {
        Ok(self
            .state
            .lock()
            .principals
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError> {
        Ok(self
            .state
            .lock()
            .principals
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn search_principals(
        &self,
        query: &str,
        exclude: UserId,
        limit: u64,
    ) -> Result<Vec<Principal>, StoreError> {
        let needle = query.to_lowercase();
        let state = self.state.lock();

        let mut found: Vec<Principal> = state
            .principals
            .values()
            .filter(|p| p.id != exclude)
            .filter(|p| {
                [&p.username, &p.first_name, &p.last_name, &p.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        found.truncate(to_usize(limit));
        Ok(found)
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError> {
        let organization = Organization {
            id: OrganizationId::new(),
            name: name.to_string(),
        };
        self.state
            .lock()
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, StoreError> {
        Ok(self.state.lock().organizations.get(&id).cloned())
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, StoreError> {
        let mut state = self.state.lock();
        if !state.organizations.contains_key(&wallet.organization_id) {
            return Err(StoreError::NotFound(format!(
                "organization {}",
                wallet.organization_id
            )));
        }

        let created = Wallet {
            id: WalletId::new(),
            name: wallet.name,
            balance: wallet.balance,
            organization_id: wallet.organization_id,
        };
        state.wallets.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_wallet(&self, id: WalletId) -> Result<Option<Wallet>, StoreError> {
        Ok(self.state.lock().wallets.get(&id).cloned())
    }

    async fn delete_wallet(&self, id: WalletId) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        if state.wallets.remove(&id).is_none() {
            return Ok(false);
        }
        state.transactions.retain(|t| t.wallet_id != id);
        Ok(true)
    }

    async fn commit_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, StoreError> {
        let mut state = self.state.lock();
        let wallet = state
            .wallets
            .get_mut(&transaction.wallet_id)
            .ok_or_else(|| StoreError::NotFound(format!("wallet {}", transaction.wallet_id)))?;

        let balance = wallet
            .balance
            .checked_add(transaction.transaction_value)
            .ok_or_else(|| StoreError::Backend("balance overflow".to_string()))?;
        if balance.is_negative() {
            return Err(StoreError::InsufficientFunds);
        }
        wallet.balance = balance;

        let record = TransactionRecord {
            id: TransactionId::new(),
            notes: transaction.notes,
            approved: false,
            entry_date_time: transaction.entry_date_time,
            spend_date_time: transaction.spend_date_time,
            transaction_value: transaction.transaction_value,
            wallet_id: transaction.wallet_id,
            creator_id: transaction.creator_id,
            reviewer_id: transaction.reviewer_id,
        };
        state.transactions.push(record.clone());
        Ok(record)
    }

    async fn list_transactions(
        &self,
        wallet_id: WalletId,
        page: PageRequest,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError> {
        let state = self.state.lock();
        let mut records: Vec<TransactionRecord> = state
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.entry_date_time
                .cmp(&a.entry_date_time)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });

        let total = records.len() as u64;
        let data = records
            .into_iter()
            .skip(to_usize(page.offset()))
            .take(to_usize(page.limit()))
            .collect();
        Ok((data, total))
    }
}

#[async_trait]
impl PolicyStore for MemoryStore {
    async fn load_policies(&self) -> Result<PolicySnapshot, StoreError> {
        let state = self.state.lock();
        Ok(PolicySnapshot {
            rules: state.rules.iter().cloned().collect(),
            assignments: state.assignments.iter().cloned().collect(),
        })
    }

    async fn save_rule(&self, rule: &PolicyRule) -> Result<(), StoreError> {
        self.state.lock().rules.insert(rule.clone());
        Ok(())
    }

    async fn remove_rule(&self, rule: &PolicyRule) -> Result<(), StoreError> {
        self.state.lock().rules.remove(rule);
        Ok(())
    }

    async fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        self.state.lock().assignments.insert(assignment.clone());
        Ok(())
    }

    async fn remove_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        self.state.lock().assignments.remove(assignment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use coffer_shared::types::Money;
    use rust_decimal_macros::dec;

    async fn store_with_wallet(balance: Money) -> (MemoryStore, Wallet) {
        let store = MemoryStore::new();
        let org = store.create_organization("Acme").await.unwrap();
        let wallet = store
            .create_wallet(NewWallet {
                name: "Operating".to_string(),
                balance,
                organization_id: org.id,
            })
            .await
            .unwrap();
        (store, wallet)
    }

    fn row(wallet_id: WalletId, value: Money) -> NewTransaction {
        NewTransaction {
            notes: String::new(),
            entry_date_time: Utc::now(),
            spend_date_time: Utc::now(),
            transaction_value: value,
            wallet_id,
            creator_id: UserId::new(),
            reviewer_id: UserId::new(),
        }
    }

    #[tokio::test]
    async fn test_commit_applies_signed_value() {
        let (store, wallet) = store_with_wallet(Money::new(dec!(100))).await;

        let record = store
            .commit_transaction(row(wallet.id, Money::new(dec!(-40.25))))
            .await
            .unwrap();
        assert!(!record.approved);

        let after = store.find_wallet(wallet.id).await.unwrap().unwrap();
        assert_eq!(after.balance, Money::new(dec!(59.75)));
    }

    #[tokio::test]
    async fn test_commit_refuses_negative_balance() {
        let (store, wallet) = store_with_wallet(Money::new(dec!(10))).await;

        let result = store
            .commit_transaction(row(wallet.id, Money::new(dec!(-10.01))))
            .await;
        assert_eq!(result, Err(StoreError::InsufficientFunds));

        let after = store.find_wallet(wallet.id).await.unwrap().unwrap();
        assert_eq!(after.balance, Money::new(dec!(10)));
        let (records, total) = store
            .list_transactions(wallet.id, PageRequest::default())
            .await
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_commit_to_missing_wallet() {
        let store = MemoryStore::new();
        let result = store
            .commit_transaction(row(WalletId::new(), Money::new(dec!(1))))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_paged() {
        let (store, wallet) = store_with_wallet(Money::new(dec!(0))).await;
        let base = Utc::now();
        for minutes in 0..5 {
            let mut next = row(wallet.id, Money::new(dec!(1)));
            next.entry_date_time = base + Duration::minutes(minutes);
            next.notes = format!("t{minutes}");
            store.commit_transaction(next).await.unwrap();
        }

        let (first, total) = store
            .list_transactions(wallet.id, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(first.iter().map(|t| t.notes.as_str()).collect::<Vec<_>>(), ["t4", "t3"]);

        let (last, _) = store
            .list_transactions(wallet.id, PageRequest::new(3, 2))
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].notes, "t0");
    }

    #[tokio::test]
    async fn test_delete_wallet_cascades() {
        let (store, wallet) = store_with_wallet(Money::new(dec!(5))).await;
        store
            .commit_transaction(row(wallet.id, Money::new(dec!(1))))
            .await
            .unwrap();

        assert!(store.delete_wallet(wallet.id).await.unwrap());
        assert!(!store.delete_wallet(wallet.id).await.unwrap());
        let (records, _) = store
            .list_transactions(wallet.id, PageRequest::default())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_principal_conflicts() {
        let store = MemoryStore::new();
        let new = NewPrincipal {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "k:s".to_string(),
        };
        store.create_principal(new.clone()).await.unwrap();

        let result = store.create_principal(new).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_policy_round_trip() {
        let store = MemoryStore::new();
        let rule = PolicyRule::new("owner", "org", "wallet", "delete");
        let edge = RoleAssignment::new("alice", "owner", "org");
        store.save_rule(&rule).await.unwrap();
        store.save_rule(&rule).await.unwrap();
        store.save_assignment(&edge).await.unwrap();

        let snapshot = store.load_policies().await.unwrap();
        assert_eq!(snapshot.rules, vec![rule.clone()]);
        assert_eq!(snapshot.assignments, vec![edge.clone()]);

        store.remove_rule(&rule).await.unwrap();
        store.remove_assignment(&edge).await.unwrap();
        assert_eq!(store.load_policies().await.unwrap(), PolicySnapshot::default());
    }
}
