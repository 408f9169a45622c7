use sea_orm::entity::prelude::*;

/// Legacy per-project integration record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    /// Integration type tag, e.g. "KubernetesService"
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub category: String,
    pub template: bool,
    pub active: bool,
    /// JSON text: integration settings (api_url, ca_pem, namespace, ...)
    pub properties: String,
    /// AES-256-GCM encrypted base64, bound to this row's id
    pub encrypted_token: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse `properties`, which must hold a JSON object.
    pub fn properties_map(&self) -> Result<serde_json::Map<String, serde_json::Value>, String> {
        match serde_json::from_str(&self.properties) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
