//! Property-based tests for transaction validation and pricing.

use chrono::DateTime;
use proptest::prelude::*;
use rust_decimal::Decimal;

use coffer_shared::types::{Money, UserId};

use crate::workflow::types::{PricedTransaction, TransactionDraft, TransactionKind};
use crate::workflow::validation::validate_transaction_input;

const NOW_MS: i64 = 1_700_000_000_000;

fn arb_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::In), Just(TransactionKind::Out)]
}

fn draft(kind: TransactionKind, value: String, spend_ms: i64) -> TransactionDraft {
    TransactionDraft {
        kind: Some(kind.as_str().to_string()),
        spend_date_time: Some(spend_ms.to_string()),
        transaction_value: Some(value),
        reviewer: Some("reviewer".to_string()),
        notes: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any whole-cent amount is accepted and parsed exactly.
    #[test]
    fn prop_cent_amounts_accepted(cents in 0u64..1_000_000_000_000, kind in arb_kind()) {
        let raw = format!("{}.{:02}", cents / 100, cents % 100);
        let now = DateTime::from_timestamp_millis(NOW_MS).unwrap();

        let validated = validate_transaction_input(&draft(kind, raw, 0), "creator", now).unwrap();
        prop_assert_eq!(validated.value, Money::new(Decimal::new(i64::try_from(cents).unwrap(), 2)));
        prop_assert_eq!(validated.kind, kind);
    }

    /// A third significant decimal place is always rejected.
    #[test]
    fn prop_sub_cent_amounts_rejected(whole in 0u32..100_000, mills in 1u32..10) {
        let raw = format!("{whole}.{:03}", mills);
        let now = DateTime::from_timestamp_millis(NOW_MS).unwrap();

        let errors = validate_transaction_input(&draft(TransactionKind::Out, raw, 0), "creator", now)
            .unwrap_err();
        prop_assert!(errors.contains_key("transactionValue"));
    }

    /// Spend dates after `now` are rejected, up to and including `now` accepted.
    #[test]
    fn prop_spend_date_bound(offset in -1_000_000i64..1_000_000) {
        let now = DateTime::from_timestamp_millis(NOW_MS).unwrap();
        let result = validate_transaction_input(
            &draft(TransactionKind::In, "1".to_string(), NOW_MS + offset),
            "creator",
            now,
        );
        prop_assert_eq!(result.is_ok(), offset <= 0);
    }

    /// Pricing negates outgoing values and leaves incoming ones alone.
    #[test]
    fn prop_pricing_sign(cents in 0i64..1_000_000_000, kind in arb_kind()) {
        let now = DateTime::from_timestamp_millis(NOW_MS).unwrap();
        let raw = Money::new(Decimal::new(cents, 2)).to_string();
        let validated = validate_transaction_input(&draft(kind, raw, 0), "creator", now).unwrap();
        let value = validated.value;

        let priced = PricedTransaction::from_validated(validated, UserId::new());
        match kind {
            TransactionKind::In => prop_assert_eq!(priced.value, value),
            TransactionKind::Out => prop_assert_eq!(priced.value, -value),
        }
        prop_assert!(!(priced.value.is_negative() && kind == TransactionKind::In));
    }
}
