use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClusterPlatformsKubernetes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::ClusterId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::ApiUrl)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClusterPlatformsKubernetes::CaCert).text().null())
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::Namespace)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::Username)
                            .string()
                            .null(),
                    )
                    // AES-256-GCM base64, bound to the owning cluster id
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::EncryptedPassword)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::EncryptedToken)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ClusterPlatformsKubernetes::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cpk_cluster")
                            .from(
                                ClusterPlatformsKubernetes::Table,
                                ClusterPlatformsKubernetes::ClusterId,
                            )
                            .to(Clusters::Table, Clusters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ClusterPlatformsKubernetes::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum ClusterPlatformsKubernetes {
    Table,
    Id,
    ClusterId,
    ApiUrl,
    CaCert,
    Namespace,
    Username,
    EncryptedPassword,
    EncryptedToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Clusters {
    Table,
    Id,
}
