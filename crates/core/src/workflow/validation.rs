//! Input validation for transactions and wallets.
//!
//! Every failing field is reported at once, keyed by its wire name.

use chrono::{DateTime, Utc};

use coffer_shared::error::FieldErrors;
use coffer_shared::types::Money;

use crate::workflow::types::{TransactionDraft, TransactionKind, ValidatedTransaction, WalletDraft};

/// Reviewer equal to the creator.
pub const REVIEWER_IS_SELF: &str = "Reviewer cannot be yourself";
/// Missing reviewer.
pub const REVIEWER_REQUIRED: &str = "Reviewer is required";

fn is_unsigned_decimal(s: &str) -> bool {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

/// Parses a non-negative amount with at most two fractional digits.
///
/// `field_label` names the amount in messages.
fn parse_amount(raw: &str, field_label: &str) -> Result<Money, String> {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return Err(format!("{field_label} must be greater than 0"));
    }
    if !is_unsigned_decimal(raw) {
        return Err(format!("{field_label} must be a number"));
    }
    let amount: Money = raw
        .parse()
        .map_err(|_| format!("{field_label} is out of range"))?;
    if !amount.fits_cents() {
        return Err(format!(
            "{field_label} cannot have more than 2 decimal points"
        ));
    }
    if !amount.fits_storage() {
        return Err(format!("{field_label} cannot exceed {}", Money::MAX));
    }
    Ok(amount)
}

fn parse_spend_date_time(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Spend date must be a valid timestamp");
    }
    let millis: i64 = raw
        .parse()
        .map_err(|_| "Spend date must be a valid timestamp")?;
    let spent_at =
        DateTime::from_timestamp_millis(millis).ok_or("Spend date must be a valid timestamp")?;
    if spent_at > now {
        return Err("Spend date cannot be in the future");
    }
    Ok(spent_at)
}

/// Validates raw transaction input submitted by `creator_username`.
///
/// Checks run before any lookup or authorization, so a self-review is
/// rejected without touching storage.
pub fn validate_transaction_input(
    draft: &TransactionDraft,
    creator_username: &str,
    now: DateTime<Utc>,
) -> Result<ValidatedTransaction, FieldErrors> {
    let mut errors = FieldErrors::new();

    let kind = draft.kind.as_deref().and_then(TransactionKind::parse);
    if kind.is_none() {
        errors.insert(
            "type".to_string(),
            "Type must be either in or out".to_string(),
        );
    }

    let spend_date_time = match draft.spend_date_time.as_deref() {
        Some(raw) => parse_spend_date_time(raw, now)
            .map_err(|message| errors.insert("spendDateTime".to_string(), message.to_string()))
            .ok(),
        None => {
            errors.insert(
                "spendDateTime".to_string(),
                "Spend date is required".to_string(),
            );
            None
        }
    };

    let value = match draft.transaction_value.as_deref() {
        Some(raw) => parse_amount(raw, "Transaction value")
            .map_err(|message| errors.insert("transactionValue".to_string(), message))
            .ok(),
        None => {
            errors.insert(
                "transactionValue".to_string(),
                "Transaction value is required".to_string(),
            );
            None
        }
    };

    let reviewer = draft.reviewer.as_deref().map(str::trim).unwrap_or_default();
    if reviewer.is_empty() {
        errors.insert("reviewer".to_string(), REVIEWER_REQUIRED.to_string());
    } else if reviewer == creator_username {
        errors.insert("reviewer".to_string(), REVIEWER_IS_SELF.to_string());
    }

    match (kind, spend_date_time, value) {
        (Some(kind), Some(spend_date_time), Some(value)) if errors.is_empty() => {
            Ok(ValidatedTransaction {
                kind,
                spend_date_time,
                value,
                reviewer: reviewer.to_string(),
                notes: draft.notes.clone().unwrap_or_default(),
            })
        }
        _ => Err(errors),
    }
}

/// Validates wallet creation input, returning the name and opening balance.
pub fn validate_wallet_input(draft: &WalletDraft) -> Result<(String, Money), FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = draft.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    }

    let balance = match draft.balance.as_deref().map(str::trim) {
        None | Some("") => Some(Money::zero()),
        Some(raw) => parse_amount(raw, "Balance")
            .map_err(|message| errors.insert("balance".to_string(), message))
            .ok(),
    };

    match balance {
        Some(balance) if errors.is_empty() => Ok((name.to_string(), balance)),
        _ => Err(errors),
    }
}
