use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

use crate::entity::service;

/// Key merged into `services.properties` once a service has been migrated.
pub const MIGRATED_KEY: &str = "migrated";

#[derive(Debug)]
pub enum MarkerError {
    InvalidProperties(String),
    Db(DbErr),
}

impl std::fmt::Display for MarkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerError::InvalidProperties(e) => write!(f, "Invalid properties: {e}"),
            MarkerError::Db(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for MarkerError {}

/// Deactivate a migrated service and record `"migrated": true` in its
/// properties, keeping every other key.
///
/// This is audit state only. Re-selection is already prevented by the
/// platform row the transformation created.
pub async fn mark_migrated<C>(db: &C, service: service::Model) -> Result<service::Model, MarkerError>
where
    C: ConnectionTrait,
{
    let mut properties = service
        .properties_map()
        .map_err(MarkerError::InvalidProperties)?;
    properties.insert(MIGRATED_KEY.to_string(), serde_json::Value::Bool(true));
    let properties = serde_json::Value::Object(properties).to_string();

    let mut active: service::ActiveModel = service.into();
    active.active = Set(false);
    active.properties = Set(properties);
    active.updated_at = Set(Utc::now().naive_utc());

    active.update(db).await.map_err(MarkerError::Db)
}
