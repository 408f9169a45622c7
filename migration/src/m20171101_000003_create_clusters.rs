use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clusters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clusters::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clusters::UserId).integer().null())
                    .col(ColumnDef::new(Clusters::Name).string().not_null())
                    .col(
                        ColumnDef::new(Clusters::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    // 0 = user, 1 = gcp
                    .col(ColumnDef::new(Clusters::ProviderType).integer().not_null())
                    // 1 = kubernetes
                    .col(ColumnDef::new(Clusters::PlatformType).integer().not_null())
                    .col(
                        ColumnDef::new(Clusters::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Clusters::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clusters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clusters {
    Table,
    Id,
    UserId,
    Name,
    Enabled,
    ProviderType,
    PlatformType,
    CreatedAt,
    UpdatedAt,
}
