//! Create relation table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Relation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Relation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Relation::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Relation::ObjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Relation::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Relation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one edge per (subject, object, kind). The toggle
        // path relies on this for ON CONFLICT DO NOTHING.
        manager
            .create_index(
                Index::create()
                    .name("idx_relation_subject_object_kind")
                    .table(Relation::Table)
                    .col(Relation::SubjectId)
                    .col(Relation::ObjectId)
                    .col(Relation::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: reverse lookup by object (counts, listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_relation_object_kind")
                    .table(Relation::Table)
                    .col(Relation::ObjectId)
                    .col(Relation::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Relation {
    Table,
    Id,
    SubjectId,
    ObjectId,
    Kind,
    CreatedAt,
}
