//! Fixtures shared by the unit tests: an in-memory store with the schema
//! applied, plus helpers to seed legacy and already-managed rows.

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::config::TokenKeys;
use crate::crypto::encrypt_token;
use crate::entity::cluster::{PlatformType, ProviderType};
use crate::entity::{cluster, cluster_project, platform_kubernetes, project, service};
use crate::selector::{DEPLOYMENT_CATEGORY, KUBERNETES_SERVICE_TYPE};

pub const LEGACY_KEY: [u8; 32] = [0x11; 32];
pub const PLATFORM_KEY: [u8; 32] = [0x22; 32];

pub fn keys() -> TokenKeys {
    TokenKeys::new(LEGACY_KEY, PLATFORM_KEY)
}

pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn insert_project(db: &DatabaseConnection, name: &str) -> project::Model {
    project::ActiveModel {
        name: Set(name.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub struct ServiceFixture {
    pub project_id: i32,
    pub category: &'static str,
    pub kind: &'static str,
    pub template: bool,
    pub active: bool,
    pub properties: serde_json::Value,
    pub token: Option<&'static str>,
}

impl ServiceFixture {
    pub fn kubernetes(project_id: i32, api_url: &str) -> Self {
        Self {
            project_id,
            category: DEPLOYMENT_CATEGORY,
            kind: KUBERNETES_SERVICE_TYPE,
            template: false,
            active: true,
            properties: serde_json::json!({
                "api_url": api_url,
                "ca_pem": "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----",
                "namespace": "production",
            }),
            token: Some("t1"),
        }
    }

    /// Insert the row, then encrypt the token under the row's own context.
    pub async fn insert(self, db: &DatabaseConnection) -> service::Model {
        let now = Utc::now().naive_utc();
        let model = service::ActiveModel {
            project_id: Set(self.project_id),
            kind: Set(self.kind.to_owned()),
            category: Set(self.category.to_owned()),
            template: Set(self.template),
            active: Set(self.active),
            properties: Set(self.properties.to_string()),
            encrypted_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let Some(token) = self.token else {
            return model;
        };
        let ciphertext =
            encrypt_token(token.as_bytes(), &keys().legacy_context(model.id)).unwrap();
        let mut active: service::ActiveModel = model.into();
        active.encrypted_token = Set(Some(ciphertext));
        active.update(db).await.unwrap()
    }
}

/// Seed a cluster that already manages `project_id` through `api_url`.
pub async fn insert_managed_cluster(
    db: &DatabaseConnection,
    project_id: i32,
    api_url: &str,
) -> cluster::Model {
    let now = Utc::now().naive_utc();
    let cluster = cluster::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(Some(1)),
        name: Set("production".to_owned()),
        enabled: Set(true),
        provider_type: Set(ProviderType::Gcp),
        platform_type: Set(PlatformType::Kubernetes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    cluster_project::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster.id),
        project_id: Set(project_id),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    platform_kubernetes::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster.id),
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

    cluster
}
