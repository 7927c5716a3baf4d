//! Transaction workflow service.
//!
//! Creating a transaction runs a fixed pipeline:
//!
//! 1. validate the raw input (self-review is rejected here, before any lookup)
//! 2. require `allowCreateTransactions` for the creator
//! 3. load the wallet within the organization
//! 4. [`TransactionWorkflow::authorize_and_price`]: balance check, then
//!    reviewer check, then sign flip
//! 5. [`TransactionWorkflow::commit`]: insert and apply to the balance
//!    atomically
//!
//! The balance check deliberately precedes the reviewer check; callers see
//! the balance error when both would fail.

use std::sync::Arc;

use chrono::Utc;

use coffer_shared::config::WorkflowConfig;
use coffer_shared::error::FieldErrors;
use coffer_shared::types::{OrganizationId, PageRequest, PageResponse, WalletId};

use crate::accounts::{AccountService, Principal, PrincipalSummary};
use crate::authorization::AuthorizationGate;
use crate::store::{OrganizationStore, StoreError, WalletStore};
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{
    NewTransaction, NewWallet, PricedTransaction, TransactionDraft, TransactionKind,
    TransactionRecord, ValidatedTransaction, Wallet, WalletDraft, WalletOverview,
};
use crate::workflow::validation::{
    REVIEWER_IS_SELF, validate_transaction_input, validate_wallet_input,
};

/// Wallet and transaction operations for organization members.
#[derive(Clone)]
pub struct TransactionWorkflow {
    accounts: AccountService,
    organizations: Arc<dyn OrganizationStore>,
    wallets: Arc<dyn WalletStore>,
    gate: AuthorizationGate,
    config: WorkflowConfig,
}

impl std::fmt::Debug for TransactionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionWorkflow")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransactionWorkflow {
    /// Creates the workflow service.
    #[must_use]
    pub fn new(
        accounts: AccountService,
        organizations: Arc<dyn OrganizationStore>,
        wallets: Arc<dyn WalletStore>,
        gate: AuthorizationGate,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            accounts,
            organizations,
            wallets,
            gate,
            config,
        }
    }

    /// Records a transaction against a wallet.
    pub async fn create_transaction(
        &self,
        creator: &Principal,
        organization_id: OrganizationId,
        wallet_id: WalletId,
        draft: &TransactionDraft,
    ) -> Result<TransactionRecord, WorkflowError> {
        let validated = validate_transaction_input(draft, &creator.username, Utc::now())
            .map_err(WorkflowError::Validation)?;

        self.gate
            .require_authorization(creator.id, organization_id, |role| {
                role.allow_create_transactions
            })
            .await?;

        let wallet = self.load_wallet(organization_id, wallet_id).await?;
        let priced = self.authorize_and_price(validated, &wallet, creator).await?;
        self.commit(priced, &wallet, creator).await
    }

    /// Checks the balance for outgoing funds, then the reviewer's right to
    /// approve in the wallet's organization, and applies the sign convention.
    pub async fn authorize_and_price(
        &self,
        validated: ValidatedTransaction,
        wallet: &Wallet,
        creator: &Principal,
    ) -> Result<PricedTransaction, WorkflowError> {
        if validated.kind == TransactionKind::Out && wallet.balance < validated.value {
            tracing::debug!(
                wallet_id = %wallet.id,
                balance = %wallet.balance,
                value = %validated.value,
                "outgoing transaction exceeds balance"
            );
            return Err(WorkflowError::InsufficientBalance);
        }
        if validated.kind == TransactionKind::In
            && wallet
                .balance
                .checked_add(validated.value)
                .is_none_or(|balance| !balance.fits_storage())
        {
            tracing::debug!(
                wallet_id = %wallet.id,
                balance = %wallet.balance,
                value = %validated.value,
                "incoming transaction exceeds balance limit"
            );
            return Err(WorkflowError::BalanceLimit);
        }

        let Some(reviewer) = self.accounts.find_by_username(&validated.reviewer).await? else {
            return Err(WorkflowError::ReviewerNotAuthorized);
        };
        if reviewer.id == creator.id {
            return Err(WorkflowError::Validation(FieldErrors::from([(
                "reviewer".to_string(),
                REVIEWER_IS_SELF.to_string(),
            )])));
        }

        self.gate
            .require_authorization(reviewer.id, wallet.organization_id, |role| {
                role.allow_approve_transactions
            })
            .await
            .map_err(|_| WorkflowError::ReviewerNotAuthorized)?;

        Ok(PricedTransaction::from_validated(validated, reviewer.id))
    }

    /// Persists a priced transaction, unapproved and stamped now.
    ///
    /// The wallet balance moves by the signed value in the same atomic
    /// write; a concurrent commit that drained the wallet first surfaces as
    /// `InsufficientBalance`.
    pub async fn commit(
        &self,
        priced: PricedTransaction,
        wallet: &Wallet,
        creator: &Principal,
    ) -> Result<TransactionRecord, WorkflowError> {
        let row = NewTransaction::from_priced(priced, wallet.id, creator.id, Utc::now());

        let record = self
            .wallets
            .commit_transaction(row)
            .await
            .map_err(|err| match err {
                StoreError::InsufficientFunds => WorkflowError::InsufficientBalance,
                StoreError::NotFound(_) => WorkflowError::WalletNotFound,
                other => WorkflowError::Store(other),
            })?;

        tracing::info!(
            transaction_id = %record.id,
            wallet_id = %record.wallet_id,
            creator_id = %record.creator_id,
            reviewer_id = %record.reviewer_id,
            value = %record.transaction_value,
            "transaction committed"
        );
        Ok(record)
    }

    /// Principals matching `query`, excluding the requester. Members only.
    pub async fn search_reviewers(
        &self,
        requester: &Principal,
        organization_id: OrganizationId,
        query: &str,
    ) -> Result<Vec<PrincipalSummary>, WorkflowError> {
        self.gate
            .require_membership(requester.id, organization_id)
            .await?;

        let found = self
            .accounts
            .search(query, requester.id, self.config.user_search_limit)
            .await?;
        Ok(found.iter().map(Principal::summary).collect())
    }

    /// Creates a wallet. Requires `allowCreateWallets`.
    pub async fn create_wallet(
        &self,
        actor: &Principal,
        organization_id: OrganizationId,
        draft: &WalletDraft,
    ) -> Result<Wallet, WorkflowError> {
        let (name, balance) = validate_wallet_input(draft).map_err(WorkflowError::Validation)?;

        self.gate
            .require_authorization(actor.id, organization_id, |role| role.allow_create_wallets)
            .await?;

        if self
            .organizations
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(WorkflowError::OrganizationNotFound);
        }

        let wallet = self
            .wallets
            .create_wallet(NewWallet {
                name,
                balance,
                organization_id,
            })
            .await?;

        tracing::info!(
            wallet_id = %wallet.id,
            organization_id = %organization_id,
            actor = %actor.id,
            "wallet created"
        );
        Ok(wallet)
    }

    /// Deletes a wallet and, with it, every transaction it holds.
    /// Requires `allowDeleteWallets`. Irreversible.
    pub async fn delete_wallet(
        &self,
        actor: &Principal,
        organization_id: OrganizationId,
        wallet_id: WalletId,
    ) -> Result<(), WorkflowError> {
        self.gate
            .require_authorization(actor.id, organization_id, |role| role.allow_delete_wallets)
            .await?;

        self.load_wallet(organization_id, wallet_id).await?;
        if !self.wallets.delete_wallet(wallet_id).await? {
            return Err(WorkflowError::WalletNotFound);
        }

        tracing::warn!(
            wallet_id = %wallet_id,
            organization_id = %organization_id,
            actor = %actor.id,
            "wallet deleted"
        );
        Ok(())
    }

    /// A wallet with its most recent transactions. Members only.
    pub async fn wallet_overview(
        &self,
        viewer: &Principal,
        organization_id: OrganizationId,
        wallet_id: WalletId,
        page: u32,
    ) -> Result<WalletOverview, WorkflowError> {
        self.gate
            .require_membership(viewer.id, organization_id)
            .await?;

        let wallet = self.load_wallet(organization_id, wallet_id).await?;
        let organization = self
            .organizations
            .find_organization(organization_id)
            .await?
            .ok_or(WorkflowError::OrganizationNotFound)?;

        let request = PageRequest::new(page, self.config.wallet_page_size);
        let (records, total) = self.wallets.list_transactions(wallet.id, request).await?;

        Ok(WalletOverview {
            wallet,
            organization_name: organization.name,
            transactions: PageResponse::new(records, request, total),
        })
    }

    async fn load_wallet(
        &self,
        organization_id: OrganizationId,
        wallet_id: WalletId,
    ) -> Result<Wallet, WorkflowError> {
        self.wallets
            .find_wallet(wallet_id)
            .await?
            .filter(|wallet| wallet.organization_id == organization_id)
            .ok_or(WorkflowError::WalletNotFound)
    }
}
