//! Repository traits the core services persist through.
//!
//! The relational engine is an external collaborator: `coffer-db` implements
//! these traits on PostgreSQL, and [`MemoryStore`] implements them in process
//! for tests and local development.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use async_trait::async_trait;
use coffer_shared::types::{OrganizationId, PageRequest, UserId, WalletId};

use crate::accounts::{NewPrincipal, Principal};
use crate::organization::Organization;
use crate::workflow::{NewTransaction, NewWallet, TransactionRecord, Wallet};

/// Persistence for principals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Inserts a principal. Fails with `StoreError::Conflict` on a duplicate
    /// email or username.
    async fn create_principal(&self, principal: NewPrincipal) -> Result<Principal, StoreError>;

    /// Finds a principal by ID.
    async fn find_principal(&self, id: UserId) -> Result<Option<Principal>, StoreError>;

    /// Finds a principal by email.
    async fn find_principal_by_email(&self, email: &str)
    -> Result<Option<Principal>, StoreError>;

    /// Finds a principal by username.
    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError>;

    /// Case-insensitive match on username, first name, last name, or email,
    /// never returning `exclude`.
    async fn search_principals(
        &self,
        query: &str,
        exclude: UserId,
        limit: u64,
    ) -> Result<Vec<Principal>, StoreError>;
}

/// Persistence for organizations.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Inserts an organization.
    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError>;

    /// Finds an organization by ID.
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, StoreError>;
}

/// Persistence for wallets and their transactions.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Inserts a wallet.
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, StoreError>;

    /// Finds a wallet by ID.
    async fn find_wallet(&self, id: WalletId) -> Result<Option<Wallet>, StoreError>;

    /// Deletes a wallet and every transaction it holds. Returns false if the
    /// wallet did not exist.
    async fn delete_wallet(&self, id: WalletId) -> Result<bool, StoreError>;

    /// Inserts a transaction and applies its signed value to the wallet
    /// balance atomically.
    ///
    /// Fails with `StoreError::InsufficientFunds` (and writes nothing) when
    /// the balance would go negative.
    async fn commit_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, StoreError>;

    /// Lists a wallet's transactions, newest entry first, with the total count.
    async fn list_transactions(
        &self,
        wallet_id: WalletId,
        page: PageRequest,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError>;
}
