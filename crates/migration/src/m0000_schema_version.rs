use sea_orm_migration::prelude::*;

/// Sentinel stored by step 0: the version table exists but no step has been
/// recorded yet.
pub const UNINITIALIZED: i64 = -1;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DbVer::Table)
                    .col(ColumnDef::new(DbVer::V).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        let insert = Query::insert()
            .into_table(DbVer::Table)
            .columns([DbVer::V])
            .values_panic([UNINITIALIZED.into()])
            .to_owned();
        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&insert)).await?;

        Ok(())
    }
}

/// The single-row version record.
#[derive(Iden)]
pub enum DbVer {
    #[iden = "dbver"]
    Table,
    V,
}
