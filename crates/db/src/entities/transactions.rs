//! `SeaORM` Entity for wallet transactions.
//!
//! `transaction_value` is signed: negative for outgoing funds.

use chrono::Utc;
use sea_orm::entity::prelude::*;

use coffer_core::workflow::TransactionRecord;
use coffer_shared::types::{Money, TransactionId, UserId, WalletId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub notes: String,
    pub approved: bool,
    pub entry_date_time: DateTimeWithTimeZone,
    pub spend_date_time: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub transaction_value: Decimal,
    pub wallet_id: Uuid,
    pub creator_id: Uuid,
    pub reviewer_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_delete = "Cascade"
    )]
    Wallets,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewerId",
        to = "super::users::Column::Id"
    )]
    Reviewer,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TransactionRecord {
    fn from(model: Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            notes: model.notes,
            approved: model.approved,
            entry_date_time: model.entry_date_time.with_timezone(&Utc),
            spend_date_time: model.spend_date_time.with_timezone(&Utc),
            transaction_value: Money::new(model.transaction_value),
            wallet_id: WalletId::from_uuid(model.wallet_id),
            creator_id: UserId::from_uuid(model.creator_id),
            reviewer_id: UserId::from_uuid(model.reviewer_id),
        }
    }
}
