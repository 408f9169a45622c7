use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClusterProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClusterProjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClusterProjects::ClusterId).uuid().not_null())
                    .col(
                        ColumnDef::new(ClusterProjects::ProjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClusterProjects::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cluster_projects_cluster")
                            .from(ClusterProjects::Table, ClusterProjects::ClusterId)
                            .to(Clusters::Table, Clusters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cluster_projects_project")
                            .from(ClusterProjects::Table, ClusterProjects::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cluster_projects_unique")
                    .table(ClusterProjects::Table)
                    .col(ClusterProjects::ClusterId)
                    .col(ClusterProjects::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cluster_projects_project_id")
                    .table(ClusterProjects::Table)
                    .col(ClusterProjects::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClusterProjects::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClusterProjects {
    Table,
    Id,
    ClusterId,
    ProjectId,
    CreatedAt,
}

#[derive(Iden)]
enum Clusters {
    Table,
    Id,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
}
