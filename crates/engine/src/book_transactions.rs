//! Ledger entries as rows keyed by `(book_id, position)`.
//!
//! `position` is the index of the entry in [`Ledger::transactions`], so
//! ordering by it restores the original sequence.
//!
//! [`Ledger::transactions`]: crate::Ledger::transactions

use sea_orm::{ActiveValue, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i64,
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Books,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn entry(book_id: &str, position: i64, amount: i64) -> Self {
        Self {
            book_id: ActiveValue::Set(book_id.to_string()),
            position: ActiveValue::Set(position),
            amount: ActiveValue::Set(amount),
        }
    }
}
