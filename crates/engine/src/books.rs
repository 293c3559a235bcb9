//! Root records: one row per ledger identifier.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_transactions::Entity")]
    BookTransactions,
}

impl Related<super::book_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
