//! Store setup and seed helpers for the scenario tests.

#![allow(dead_code)]

use chrono::Utc;
use cluster_migrator::config::TokenKeys;
use cluster_migrator::crypto::encrypt_token;
use cluster_migrator::entity::cluster::{PlatformType, ProviderType};
use cluster_migrator::entity::{cluster, cluster_project, platform_kubernetes, project, service};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

pub fn keys() -> TokenKeys {
    TokenKeys::new([0x5a; 32], [0xa5; 32])
}

pub async fn connect(url: &str) -> DatabaseConnection {
    let db = Database::connect(url).await.expect("Failed to connect");
    Migrator::up(&db, None).await.expect("Failed to apply schema");
    db
}

pub async fn project(db: &DatabaseConnection, name: &str) -> project::Model {
    project::ActiveModel {
        name: Set(name.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Insert a legacy service; `token` is encrypted under the row's own context.
pub async fn legacy_service(
    db: &DatabaseConnection,
    project_id: i32,
    api_url: &str,
    template: bool,
    token: Option<&str>,
) -> service::Model {
    let now = Utc::now().naive_utc();
    let model = service::ActiveModel {
        project_id: Set(project_id),
        kind: Set("KubernetesService".to_owned()),
        category: Set("deployment".to_owned()),
        template: Set(template),
        active: Set(true),
        properties: Set(serde_json::json!({
            "api_url": api_url,
            "namespace": "default",
        })
        .to_string()),
        encrypted_token: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let Some(token) = token else {
        return model;
    };
    let ciphertext = encrypt_token(token.as_bytes(), &keys().legacy_context(model.id)).unwrap();
    let mut active: service::ActiveModel = model.into();
    active.encrypted_token = Set(Some(ciphertext));
    active.update(db).await.unwrap()
}

/// A cluster some user already set up for `project_id`.
pub async fn existing_cluster(db: &DatabaseConnection, project_id: i32, api_url: &str) {
    let now = Utc::now().naive_utc();
    let cluster_id = Uuid::now_v7();
    cluster::ActiveModel {
        id: Set(cluster_id),
        user_id: Set(Some(42)),
        name: Set("prod".to_owned()),
        enabled: Set(true),
        provider_type: Set(ProviderType::User),
        platform_type: Set(PlatformType::Kubernetes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    cluster_project::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster_id),
        project_id: Set(project_id),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    platform_kubernetes::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster_id),
        api_url: Set(api_url.to_owned()),
        ca_cert: Set(None),
        namespace: Set(None),
        username: Set(None),
        encrypted_password: Set(None),
        encrypted_token: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
}

/// (clusters, platforms, cluster_projects)
pub async fn entity_counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        cluster::Entity::find().count(db).await.unwrap(),
        platform_kubernetes::Entity::find().count(db).await.unwrap(),
        cluster_project::Entity::find().count(db).await.unwrap(),
    )
}
