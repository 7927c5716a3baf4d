//! Wallet repository: wallets, their transactions, and atomic balance moves.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use coffer_core::store::{StoreError, WalletStore};
use coffer_core::workflow::{NewTransaction, NewWallet, TransactionRecord, Wallet};
use coffer_shared::types::{PageRequest, TransactionId, WalletId};

use crate::entities::{transactions, wallets};
use crate::error::store_error;

/// Wallet persistence backed by the `wallets` and `transactions` tables.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WalletStore for WalletRepository {
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, StoreError> {
        let model = wallets::ActiveModel {
            id: Set(WalletId::new().into_inner()),
            name: Set(wallet.name),
            balance: Set(wallet.balance.amount()),
            organization_id: Set(wallet.organization_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = model.insert(&self.db).await.map_err(store_error)?;
        Ok(model.into())
    }

    async fn find_wallet(&self, id: WalletId) -> Result<Option<Wallet>, StoreError> {
        let model = wallets::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn delete_wallet(&self, id: WalletId) -> Result<bool, StoreError> {
        // transactions go with it through ON DELETE CASCADE
        let result = wallets::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn commit_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, StoreError> {
        let value = transaction.transaction_value.amount();
        let wallet_id = transaction.wallet_id.into_inner();

        let txn = self.db.begin().await.map_err(store_error)?;

        // Conditional move: only applies when the result stays non-negative.
        let moved = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(value),
            )
            .filter(wallets::Column::Id.eq(wallet_id))
            .filter(Expr::col(wallets::Column::Balance).gte(-value))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if moved.rows_affected == 0 {
            let exists = wallets::Entity::find_by_id(wallet_id)
                .one(&txn)
                .await
                .map_err(store_error)?
                .is_some();
            txn.rollback().await.map_err(store_error)?;
            return Err(if exists {
                StoreError::InsufficientFunds
            } else {
                StoreError::NotFound(format!("wallet {wallet_id}"))
            });
        }

        let row = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            notes: Set(transaction.notes),
            approved: Set(false),
            entry_date_time: Set(transaction.entry_date_time.into()),
            spend_date_time: Set(transaction.spend_date_time.into()),
            transaction_value: Set(value),
            wallet_id: Set(wallet_id),
            creator_id: Set(transaction.creator_id.into_inner()),
            reviewer_id: Set(transaction.reviewer_id.into_inner()),
        };
        let model = row.insert(&txn).await.map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;
        Ok(model.into())
    }

    async fn list_transactions(
        &self,
        wallet_id: WalletId,
        page: PageRequest,
    ) -> Result<(Vec<TransactionRecord>, u64), StoreError> {
        let query = transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(wallet_id.into_inner()));

        let total = query.clone().count(&self.db).await.map_err(store_error)?;
        let models = query
            .order_by_desc(transactions::Column::EntryDateTime)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
