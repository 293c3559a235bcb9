use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .col(ColumnDef::new(Books::Id).string().not_null().primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookTransactions::Table)
                    .col(ColumnDef::new(BookTransactions::BookId).string().not_null())
                    .col(
                        ColumnDef::new(BookTransactions::Position)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BookTransactions::BookId)
                            .col(BookTransactions::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-book_transactions-book_id")
                            .from(BookTransactions::Table, BookTransactions::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
}

#[derive(Iden)]
pub enum BookTransactions {
    Table,
    BookId,
    Position,
    Amount,
}
