//! Integration tests for wallet balance moves.

mod common;

use chrono::Utc;
use coffer_core::accounts::Principal;
use coffer_core::store::{StoreError, WalletStore};
use coffer_core::workflow::NewTransaction;
use coffer_db::WalletRepository;
use coffer_shared::types::{Money, PageRequest, WalletId};
use rust_decimal_macros::dec;

fn spend(
    wallet_id: WalletId,
    value: Money,
    creator: &Principal,
    reviewer: &Principal,
) -> NewTransaction {
    NewTransaction {
        notes: String::new(),
        entry_date_time: Utc::now(),
        spend_date_time: Utc::now(),
        transaction_value: value,
        wallet_id,
        creator_id: creator.id,
        reviewer_id: reviewer.id,
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn test_commit_moves_balance_and_lists_newest_first() {
    let db = common::setup().await;
    let repo = WalletRepository::new(db.clone());
    let creator = common::create_user(&db, "creator").await;
    let reviewer = common::create_user(&db, "reviewer").await;
    let wallet = common::create_wallet(&db, dec!(100.00)).await;

    let first = repo
        .commit_transaction(spend(wallet.id, Money::new(dec!(-50.00)), &creator, &reviewer))
        .await
        .expect("Failed to commit");
    let second = repo
        .commit_transaction(spend(wallet.id, Money::new(dec!(25.00)), &creator, &reviewer))
        .await
        .expect("Failed to commit");

    assert!(!first.approved);
    let stored = repo.find_wallet(wallet.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, Money::new(dec!(75.00)));

    let (page, total) = repo
        .list_transactions(wallet.id, PageRequest::new(1, 10))
        .await
        .expect("Failed to list");
    assert_eq!(total, 2);
    assert_eq!(page[0].id, second.id);
    assert_eq!(page[1].transaction_value, Money::new(dec!(-50.00)));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn test_overdraw_is_rejected_without_writing() {
    let db = common::setup().await;
    let repo = WalletRepository::new(db.clone());
    let creator = common::create_user(&db, "creator").await;
    let reviewer = common::create_user(&db, "reviewer").await;
    let wallet = common::create_wallet(&db, dec!(10.00)).await;

    let result = repo
        .commit_transaction(spend(wallet.id, Money::new(dec!(-10.01)), &creator, &reviewer))
        .await;
    assert_eq!(result.unwrap_err(), StoreError::InsufficientFunds);

    let stored = repo.find_wallet(wallet.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, Money::new(dec!(10.00)));
    let (_, total) = repo
        .list_transactions(wallet.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn test_concurrent_spends_never_overdraw() {
    let db = common::setup().await;
    let repo = WalletRepository::new(db.clone());
    let creator = common::create_user(&db, "creator").await;
    let reviewer = common::create_user(&db, "reviewer").await;
    let wallet = common::create_wallet(&db, dec!(100.00)).await;

    let attempts = (0..5).map(|_| {
        let repo = repo.clone();
        let row = spend(wallet.id, Money::new(dec!(-30.00)), &creator, &reviewer);
        async move { repo.commit_transaction(row).await }
    });
    let results = futures::future::join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 3);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == StoreError::InsufficientFunds));

    let stored = repo.find_wallet(wallet.id).await.unwrap().unwrap();
    assert_eq!(stored.balance, Money::new(dec!(10.00)));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn test_delete_wallet_cascades_transactions() {
    let db = common::setup().await;
    let repo = WalletRepository::new(db.clone());
    let creator = common::create_user(&db, "creator").await;
    let reviewer = common::create_user(&db, "reviewer").await;
    let wallet = common::create_wallet(&db, dec!(5.00)).await;

    repo.commit_transaction(spend(wallet.id, Money::new(dec!(1.00)), &creator, &reviewer))
        .await
        .unwrap();

    assert!(repo.delete_wallet(wallet.id).await.unwrap());
    assert!(!repo.delete_wallet(wallet.id).await.unwrap());

    let (_, total) = repo
        .list_transactions(wallet.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn test_commit_to_missing_wallet_is_not_found() {
    let db = common::setup().await;
    let repo = WalletRepository::new(db.clone());
    let creator = common::create_user(&db, "creator").await;
    let reviewer = common::create_user(&db, "reviewer").await;

    let result = repo
        .commit_transaction(spend(WalletId::new(), Money::new(dec!(1.00)), &creator, &reviewer))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}
