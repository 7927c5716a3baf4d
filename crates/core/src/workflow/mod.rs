//! Wallets and the transaction creation workflow.
//!
//! # Modules
//!
//! - `types` - Drafts, validated and priced transactions, wallets, records
//! - `validation` - Field-level input checks
//! - `error` - Workflow-specific error types
//! - `service` - The creation pipeline and wallet operations

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::WorkflowError;
pub use service::TransactionWorkflow;
pub use types::{
    NewTransaction, NewWallet, PricedTransaction, TransactionDraft, TransactionKind,
    TransactionRecord, ValidatedTransaction, Wallet, WalletDraft, WalletOverview,
};
pub use validation::{validate_transaction_input, validate_wallet_input};
