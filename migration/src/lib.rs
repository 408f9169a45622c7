pub use sea_orm_migration::prelude::*;

mod m20171101_000001_create_projects;
mod m20171101_000002_create_services;
mod m20171101_000003_create_clusters;
mod m20171101_000004_create_cluster_platforms_kubernetes;
mod m20171101_000005_create_cluster_projects;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20171101_000001_create_projects::Migration),
            Box::new(m20171101_000002_create_services::Migration),
            Box::new(m20171101_000003_create_clusters::Migration),
            Box::new(m20171101_000004_create_cluster_platforms_kubernetes::Migration),
            Box::new(m20171101_000005_create_cluster_projects::Migration),
        ]
    }
}
