use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service::Entity")]
    Service,
    #[sea_orm(has_many = "super::cluster_project::Entity")]
    ClusterProject,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::cluster_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClusterProject.def()
    }
}

impl Related<super::cluster::Entity> for Entity {
    fn to() -> RelationDef {
        super::cluster_project::Relation::Cluster.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::cluster_project::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
