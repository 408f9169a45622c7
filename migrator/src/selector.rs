//! Detection of legacy Kubernetes services that no cluster manages yet.
//!
//! A service is *unmanaged* when it is a non-template deployment
//! `KubernetesService` and no `cluster_platforms_kubernetes` row, linked to the
//! service's project through `cluster_projects`, has an `api_url` that occurs
//! inside the service's `properties` text. The check runs in the store as a
//! correlated `NOT EXISTS`; nothing is filtered in memory.

use sea_orm::{
    sea_query::{Expr, Query, SelectStatement},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::entity::{cluster_project, platform_kubernetes, service};

pub const DEPLOYMENT_CATEGORY: &str = "deployment";
pub const KUBERNETES_SERVICE_TYPE: &str = "KubernetesService";

/// `properties` is free-form JSON text, so the URL can only be matched by
/// containment. `||` concatenation works on both SQLite and PostgreSQL.
const API_URL_CONTAINED: &str =
    "services.properties LIKE '%' || cluster_platforms_kubernetes.api_url || '%'";

/// Sort key of a service in the candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub project_id: i32,
    pub id: i32,
}

impl From<&service::Model> for Position {
    fn from(model: &service::Model) -> Self {
        Self {
            project_id: model.project_id,
            id: model.id,
        }
    }
}

/// All unmanaged Kubernetes services, unordered and unbounded.
pub fn unmanaged_kubernetes_services() -> Select<service::Entity> {
    service::Entity::find()
        .filter(service::Column::Category.eq(DEPLOYMENT_CATEGORY))
        .filter(service::Column::Kind.eq(KUBERNETES_SERVICE_TYPE))
        .filter(service::Column::Template.eq(false))
        .filter(Condition::all().add(Expr::exists(managed_by_platform())).not())
}

/// `SELECT 1` from platforms whose cluster is linked to the outer service's
/// project and whose URL appears in the outer service's properties.
fn managed_by_platform() -> SelectStatement {
    Query::select()
        .expr(Expr::val(1))
        .from(platform_kubernetes::Entity)
        .inner_join(
            cluster_project::Entity,
            Expr::col((cluster_project::Entity, cluster_project::Column::ClusterId)).equals((
                platform_kubernetes::Entity,
                platform_kubernetes::Column::ClusterId,
            )),
        )
        .and_where(
            Expr::col((cluster_project::Entity, cluster_project::Column::ProjectId))
                .equals((service::Entity, service::Column::ProjectId)),
        )
        .and_where(Expr::cust(API_URL_CONTAINED))
        .to_owned()
}

/// Fetch the next `limit` unmanaged services strictly after `after`, ordered
/// by `(project_id, id)`.
pub async fn next_unmanaged<C>(
    db: &C,
    after: Option<Position>,
    limit: u64,
) -> Result<Vec<service::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = unmanaged_kubernetes_services();

    if let Some(pos) = after {
        query = query.filter(
            Condition::any()
                .add(service::Column::ProjectId.gt(pos.project_id))
                .add(
                    Condition::all()
                        .add(service::Column::ProjectId.eq(pos.project_id))
                        .add(service::Column::Id.gt(pos.id)),
                ),
        );
    }

    query
        .order_by_asc(service::Column::ProjectId)
        .order_by_asc(service::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

/// Number of services the next run would consider.
pub async fn count_unmanaged<C>(db: &C) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    unmanaged_kubernetes_services().count(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ServiceFixture, insert_managed_cluster, insert_project, setup};

    async fn all_unmanaged(db: &sea_orm::DatabaseConnection) -> Vec<i32> {
        next_unmanaged(db, None, 100)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    #[tokio::test]
    async fn test_selects_plain_kubernetes_service() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        let svc = ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;

        assert_eq!(all_unmanaged(&db).await, vec![svc.id]);
        assert_eq!(count_unmanaged(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_skips_other_category() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        ServiceFixture {
            category: "monitoring",
            ..ServiceFixture::kubernetes(p1.id, "https://h1")
        }
        .insert(&db)
        .await;

        assert!(all_unmanaged(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_skips_other_type() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        ServiceFixture {
            kind: "PrometheusService",
            ..ServiceFixture::kubernetes(p1.id, "https://h1")
        }
        .insert(&db)
        .await;

        assert!(all_unmanaged(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_skips_templates_even_without_clusters() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        ServiceFixture {
            template: true,
            ..ServiceFixture::kubernetes(p1.id, "https://h1")
        }
        .insert(&db)
        .await;

        assert!(all_unmanaged(&db).await.is_empty());
        assert_eq!(count_unmanaged(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_skips_service_whose_project_has_matching_platform() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;
        insert_managed_cluster(&db, p1.id, "https://h1").await;

        assert!(all_unmanaged(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_matching_is_substring_of_properties() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        ServiceFixture::kubernetes(p1.id, "https://h1.example.com:6443")
            .insert(&db)
            .await;
        // Platform URL is a prefix of the legacy URL: treated as managed.
        insert_managed_cluster(&db, p1.id, "https://h1.example.com").await;

        assert!(all_unmanaged(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_platform_with_other_url_does_not_count() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        let svc = ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;
        insert_managed_cluster(&db, p1.id, "https://other").await;

        assert_eq!(all_unmanaged(&db).await, vec![svc.id]);
    }

    #[tokio::test]
    async fn test_platform_on_other_project_does_not_count() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        let p2 = insert_project(&db, "p2").await;
        let svc = ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;
        insert_managed_cluster(&db, p2.id, "https://h1").await;

        assert_eq!(all_unmanaged(&db).await, vec![svc.id]);
    }

    #[tokio::test]
    async fn test_ordered_by_project_then_id() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        let p2 = insert_project(&db, "p2").await;
        let on_p2 = ServiceFixture::kubernetes(p2.id, "https://h2").insert(&db).await;
        let on_p1_a = ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;
        let on_p1_b = ServiceFixture::kubernetes(p1.id, "https://h3").insert(&db).await;

        assert_eq!(
            all_unmanaged(&db).await,
            vec![on_p1_a.id, on_p1_b.id, on_p2.id]
        );
    }

    #[tokio::test]
    async fn test_limit_and_position() {
        let db = setup().await;
        let p1 = insert_project(&db, "p1").await;
        let p2 = insert_project(&db, "p2").await;
        let first = ServiceFixture::kubernetes(p1.id, "https://h1").insert(&db).await;
        let second = ServiceFixture::kubernetes(p2.id, "https://h2").insert(&db).await;

        let page = next_unmanaged(&db, None, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, first.id);

        let page = next_unmanaged(&db, Some(Position::from(&page[0])), 1)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, second.id);

        let page = next_unmanaged(&db, Some(Position::from(&second)), 1)
            .await
            .unwrap();
        assert!(page.is_empty());
    }
}
