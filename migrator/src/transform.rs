use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbErr, Set, TransactionTrait};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::config::TokenKeys;
use crate::crypto::{self, CryptoError};
use crate::entity::cluster::{PlatformType, ProviderType};
use crate::entity::{cluster, cluster_project, platform_kubernetes, service};

/// Name given to every cluster created from a legacy service.
pub const DEFAULT_CLUSTER_NAME: &str = "KubernetesService";

#[derive(Debug)]
pub enum TransformError {
    InvalidProperties(String),
    MissingApiUrl,
    InvalidApiUrl(String),
    Token(CryptoError),
    Db(DbErr),
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::InvalidProperties(e) => write!(f, "Invalid properties: {e}"),
            TransformError::MissingApiUrl => write!(f, "api_url is missing"),
            TransformError::InvalidApiUrl(e) => write!(f, "Invalid api_url: {e}"),
            TransformError::Token(e) => write!(f, "Token transfer failed: {e}"),
            TransformError::Db(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for TransformError {}

/// The subset of `services.properties` a KubernetesService carries.
#[derive(Debug, Default, Deserialize)]
struct KubernetesProperties {
    api_url: Option<String>,
    ca_pem: Option<String>,
    namespace: Option<String>,
}

impl KubernetesProperties {
    fn from_service(service: &service::Model) -> Result<Self, TransformError> {
        let map = service
            .properties_map()
            .map_err(TransformError::InvalidProperties)?;
        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| TransformError::InvalidProperties(e.to_string()))
    }
}

/// Rows created for one legacy service.
#[derive(Debug, Clone)]
pub struct MigratedCluster {
    pub cluster: cluster::Model,
    pub platform: platform_kubernetes::Model,
    pub link: cluster_project::Model,
}

/// Require an absolute http(s) URL with a host.
pub fn validate_api_url(raw: Option<&str>) -> Result<String, TransformError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(TransformError::MissingApiUrl)?;

    let url = Url::parse(raw).map_err(|e| TransformError::InvalidApiUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransformError::InvalidApiUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(TransformError::InvalidApiUrl("missing host".to_string()));
    }

    // Stored as written: the selector matches it against the legacy text.
    Ok(raw.to_string())
}

/// The selector only treats a service as managed when the platform's
/// `api_url` occurs verbatim in `properties`. A URL that JSON escapes
/// (quotes, backslashes, control characters) would never match, before or
/// after the marker rewrites `properties`, and would be migrated again on
/// every run.
fn ensure_stored_literally(service: &service::Model, api_url: &str) -> Result<(), TransformError> {
    let escaped = serde_json::Value::String(api_url.to_string()).to_string();
    let escapes_in_json = escaped.get(1..escaped.len() - 1) != Some(api_url);

    if escapes_in_json || !service.properties.contains(api_url) {
        return Err(TransformError::InvalidApiUrl(
            "api_url is not stored literally in properties".to_string(),
        ));
    }
    Ok(())
}

/// Create the cluster, its project link and its Kubernetes platform for
/// `service` in one transaction.
///
/// Either all three rows commit or none do. The token is moved from the
/// service's key context into the new platform's context, which is bound to
/// the cluster id, so it is re-encrypted after the cluster row exists.
pub async fn migrate_service<C>(
    db: &C,
    keys: &TokenKeys,
    service: &service::Model,
) -> Result<MigratedCluster, TransformError>
where
    C: TransactionTrait,
{
    let props = KubernetesProperties::from_service(service)?;
    let api_url = validate_api_url(props.api_url.as_deref())?;
    ensure_stored_literally(service, &api_url)?;

    let now = Utc::now().naive_utc();
    let txn = db.begin().await.map_err(TransformError::Db)?;

    let cluster = cluster::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(None),
        name: Set(DEFAULT_CLUSTER_NAME.to_string()),
        enabled: Set(service.active),
        provider_type: Set(ProviderType::User),
        platform_type: Set(PlatformType::Kubernetes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(TransformError::Db)?;

    let link = cluster_project::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster.id),
        project_id: Set(service.project_id),
        created_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(TransformError::Db)?;

    let encrypted_token = match service.encrypted_token.as_deref() {
        Some(ciphertext) if !ciphertext.is_empty() => Some(
            crypto::reencrypt_token(
                ciphertext,
                &keys.legacy_context(service.id),
                &keys.platform_context(cluster.id),
            )
            .map_err(TransformError::Token)?,
        ),
        _ => None,
    };

    let platform = platform_kubernetes::ActiveModel {
        id: Set(Uuid::now_v7()),
        cluster_id: Set(cluster.id),
        api_url: Set(api_url),
        ca_cert: Set(props.ca_pem),
        namespace: Set(props.namespace),
        username: Set(None),
        encrypted_password: Set(None),
        encrypted_token: Set(encrypted_token),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(TransformError::Db)?;

    txn.commit().await.map_err(TransformError::Db)?;

    tracing::debug!(
        service_id = service.id,
        project_id = service.project_id,
        cluster_id = %cluster.id,
        "Created cluster for legacy service"
    );

    Ok(MigratedCluster {
        cluster,
        platform,
        link,
    })
}
