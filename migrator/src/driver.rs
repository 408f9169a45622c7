//! Sequential migration of legacy Kubernetes services into clusters.
//!
//! Each candidate goes Selected → Transforming → Transformed | TransformFailed,
//! and a transformed one then ends Marked | MarkFailed. One record is finished
//! before the next one is fetched. Failures are collected in the report and
//! never retried within the run.

use futures::{StreamExt, pin_mut};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use uuid::Uuid;

use crate::batch;
use crate::config::TokenKeys;
use crate::entity::service;
use crate::marker;
use crate::transform;

#[derive(Debug)]
pub enum MigrationError {
    /// The candidate query failed; nothing further was processed.
    Selection(DbErr),
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::Selection(e) => write!(f, "Selecting unmanaged services failed: {e}"),
        }
    }
}

impl std::error::Error for MigrationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Transform,
    Mark,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    pub service_id: i32,
    pub project_id: i32,
    pub stage: FailureStage,
    pub cause: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    /// Services the selector handed out during this run.
    pub candidates: u64,
    /// Services whose cluster was committed, marked or not.
    pub migrated: u64,
    pub failures: Vec<RecordFailure>,
}

impl MigrationReport {
    /// True unless some service could not be transformed. Marker failures
    /// are warnings only.
    pub fn is_success(&self) -> bool {
        self.first_failure().is_none()
    }

    /// The first service that could not be transformed.
    pub fn first_failure(&self) -> Option<&RecordFailure> {
        self.failures
            .iter()
            .find(|f| f.stage == FailureStage::Transform)
    }

    pub fn mark_failures(&self) -> impl Iterator<Item = &RecordFailure> {
        self.failures
            .iter()
            .filter(|f| f.stage == FailureStage::Mark)
    }
}

/// Terminal state of one candidate.
enum Outcome {
    Marked { cluster_id: Uuid },
    MarkFailed { cluster_id: Uuid, cause: String },
    TransformFailed { cause: String },
}

pub struct KubernetesServiceMigration {
    db: DatabaseConnection,
    keys: TokenKeys,
}

impl KubernetesServiceMigration {
    pub fn new(db: DatabaseConnection, keys: TokenKeys) -> Self {
        Self { db, keys }
    }

    /// Migrate every unmanaged service until the selector comes back empty.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        let mut report = MigrationReport::default();

        let records = batch::unmanaged_records(&self.db);
        pin_mut!(records);

        while let Some(record) = records.next().await {
            let record = record.map_err(MigrationError::Selection)?;
            report.candidates += 1;

            let service_id = record.id;
            let project_id = record.project_id;

            match self.migrate_one(record).await {
                Outcome::Marked { cluster_id } => {
                    report.migrated += 1;
                    tracing::info!(service_id, project_id, cluster_id = %cluster_id, "Migrated KubernetesService");
                }
                Outcome::MarkFailed { cluster_id, cause } => {
                    report.migrated += 1;
                    tracing::warn!(
                        service_id,
                        project_id,
                        cluster_id = %cluster_id,
                        error = %cause,
                        "Migrated KubernetesService but could not mark it"
                    );
                    report.failures.push(RecordFailure {
                        service_id,
                        project_id,
                        stage: FailureStage::Mark,
                        cause,
                    });
                }
                Outcome::TransformFailed { cause } => {
                    tracing::error!(service_id, project_id, error = %cause, "Failed to migrate KubernetesService");
                    report.failures.push(RecordFailure {
                        service_id,
                        project_id,
                        stage: FailureStage::Transform,
                        cause,
                    });
                }
            }
        }

        tracing::info!(
            candidates = report.candidates,
            migrated = report.migrated,
            failed = report.failures.len(),
            "KubernetesService migration finished"
        );

        Ok(report)
    }

    /// Migrated clusters are never removed automatically.
    pub async fn reverse(&self) -> Result<(), MigrationError> {
        tracing::info!("KubernetesService migration has no reversal; nothing to do");
        Ok(())
    }

    async fn migrate_one(&self, record: service::Model) -> Outcome {
        let created = match transform::migrate_service(&self.db, &self.keys, &record).await {
            Ok(created) => created,
            Err(e) => {
                return Outcome::TransformFailed {
                    cause: e.to_string(),
                };
            }
        };
        let cluster_id = created.cluster.id;

        match marker::mark_migrated(&self.db, record).await {
            Ok(_) => Outcome::Marked { cluster_id },
            Err(e) => Outcome::MarkFailed {
                cluster_id,
                cause: e.to_string(),
            },
        }
    }
}
