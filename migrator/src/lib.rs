//! cluster-migrator - moves legacy KubernetesService integrations onto clusters
//!
//! Each unmanaged `services` row becomes a cluster, its Kubernetes platform
//! and a project link, created in one transaction. The source row is then
//! deactivated and flagged as migrated.

pub mod batch;
pub mod config;
pub mod crypto;
pub mod driver;
pub mod entity;
pub mod marker;
pub mod selector;
pub mod transform;

#[cfg(test)]
mod testing;

pub use driver::{FailureStage, KubernetesServiceMigration, MigrationError, MigrationReport};
