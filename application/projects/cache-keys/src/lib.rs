use dao_utils::Pagination;
use project_queries::ProjectFilters;
use project_responses::{ProjectListResponse, ProjectResponse};
use redis_connection::{ListFilters, ListQueryKey, cache_key};
use uuid::Uuid;

cache_key!(ProjectCacheKey::<ProjectResponse> => "projects:{}"[id: Uuid]);
cache_key!(ProjectListCacheKey::<ProjectListResponse> => "projects:list:{}"[query: ListQueryKey]);

/// Every cached project list page, whatever its filters.
pub const PROJECT_LISTS_PATTERN: &str = "projects:list:*";

pub fn project_list_query(
    pagination: &Pagination, filters: &ProjectFilters,
) -> ListQueryKey {
    let filters = ListFilters::new()
        .with("status", filters.status)
        .with("name", filters.name.as_deref());
    ListQueryKey::new(pagination.page(), pagination.limit(), filters)
}

#[cfg(test)]
mod tests {
    use project_models::ProjectStatus;
    use redis_connection::KeyScheme;

    use super::*;

    #[test]
    fn test_entity_key() {
        let id = Uuid::nil();
        let key = KeyScheme::new("app").key(&ProjectCacheKey, (&id,));
        assert_eq!(key, format!("app:projects:{id}"));
    }

    #[test]
    fn test_list_key_is_canonical() {
        let scheme = KeyScheme::new("app");
        let query = project_list_query(
            &Pagination::new(Some(2), Some(10)),
            &ProjectFilters {
                status: Some(ProjectStatus::Active),
                name: Some("web site".into()),
            },
        );

        assert_eq!(
            scheme.key(&ProjectListCacheKey, (&query,)),
            "app:projects:list:page=2:limit=10:name=web%20site&status=active"
        );
    }

    #[test]
    fn test_unfiltered_list_key() {
        let query =
            project_list_query(&Pagination::default(), &ProjectFilters::default());
        assert_eq!(query.to_string(), "page=1:limit=20:none");
    }

    #[test]
    fn test_list_keys_fall_under_pattern() {
        let scheme = KeyScheme::new("app");
        let query =
            project_list_query(&Pagination::default(), &ProjectFilters::default());
        let key = scheme.key(&ProjectListCacheKey, (&query,));
        let pattern = scheme.pattern(PROJECT_LISTS_PATTERN);

        assert!(key.starts_with(pattern.trim_end_matches('*')));
        assert!(
            !scheme
                .key(&ProjectCacheKey, (&Uuid::nil(),))
                .starts_with(pattern.trim_end_matches('*'))
        );
    }
}
