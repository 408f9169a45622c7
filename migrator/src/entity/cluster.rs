use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum ProviderType {
    #[sea_orm(num_value = 0)]
    User,
    #[sea_orm(num_value = 1)]
    Gcp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum PlatformType {
    #[sea_orm(num_value = 1)]
    Kubernetes,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owner; None for clusters created from legacy services
    pub user_id: Option<i32>,
    pub name: String,
    pub enabled: bool,
    pub provider_type: ProviderType,
    pub platform_type: PlatformType,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::platform_kubernetes::Entity")]
    PlatformKubernetes,
    #[sea_orm(has_many = "super::cluster_project::Entity")]
    ClusterProject,
}

impl Related<super::platform_kubernetes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformKubernetes.def()
    }
}

impl Related<super::cluster_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClusterProject.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        super::cluster_project::Relation::Project.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::cluster_project::Relation::Cluster.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
