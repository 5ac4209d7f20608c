use std::time::Duration;

use redis_connection::{
    CacheProvider, Invalidation, ListFilters, ListQueryKey, cache_key,
    config::{CacheBackendKind, CacheConfig},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    id: u32,
    tags: Vec<String>,
    owner: Option<String>,
}

cache_key!(WidgetKey::<Widget> => "widgets:{}"[id: u32]);
cache_key!(WidgetListKey::<Vec<Widget>> => "widgets:list:{}"[query: ListQueryKey]);

fn provider() -> CacheProvider {
    CacheProvider::memory(&CacheConfig {
        backend: CacheBackendKind::Memory,
        ..CacheConfig::default()
    })
}

fn widget(id: u32) -> Widget {
    Widget {
        id,
        tags: vec!["a".into(), "b".into()],
        owner: None,
    }
}

#[tokio::test]
async fn test_typed_entries_through_public_api() {
    let cache = provider();
    let entry = cache.entry(&WidgetKey, (&7,));
    assert_eq!(entry.key(), "app:widgets:7");
    assert_eq!(entry.get().await, None);

    entry.set(&widget(7)).await;

    assert_eq!(entry.get().await, Some(widget(7)));
    let ttl = cache.get_ttl(entry.key()).await;
    assert!(ttl > 590 && ttl <= 600, "ttl was {ttl}");
}

#[tokio::test]
async fn test_list_keys_ignore_filter_insertion_order() {
    let cache = provider();
    let first = ListFilters::new().with("owner", Some("kim")).with("tag", Some("a"));
    let second = ListFilters::new().with("tag", Some("a")).with("owner", Some("kim"));

    let left = cache.key(&WidgetListKey, (&ListQueryKey::new(1, 20, first),));
    let right = cache.key(&WidgetListKey, (&ListQueryKey::new(1, 20, second),));

    assert_eq!(left, right);
    assert_eq!(left, "app:widgets:list:page=1:limit=20:owner=kim&tag=a");
}

#[tokio::test]
async fn test_invalidation_plan_spares_foreign_keys() {
    let cache = provider();
    for id in 1..=3 {
        cache.entry(&WidgetKey, (&id,)).set(&widget(id)).await;
    }
    let list_key = cache.key(
        &WidgetListKey,
        (&ListQueryKey::new(1, 20, ListFilters::new()),),
    );
    cache.set(&list_key, &vec![widget(1)], None).await;
    cache.set("other:data", &"kept", None).await;

    let plan = Invalidation::new()
        .key(cache.key(&WidgetKey, (&1,)))
        .pattern(cache.pattern("widgets:list:*"));
    cache.invalidate(&plan).await;

    assert!(!cache.exists("app:widgets:1").await);
    assert!(cache.exists("app:widgets:2").await);
    assert!(!cache.exists(&list_key).await);
    assert!(cache.exists("other:data").await);

    cache.delete_by_pattern(&cache.pattern("widgets:*")).await;
    assert!(!cache.exists("app:widgets:3").await);
    assert!(cache.exists("other:data").await);
}

#[tokio::test]
async fn test_wildcard_namespace_sweeps_only_itself() {
    let cache = CacheProvider::memory(&CacheConfig {
        backend: CacheBackendKind::Memory,
        namespace: "team*".into(),
        ..CacheConfig::default()
    });
    let own = cache.key(&WidgetKey, (&1,));
    cache.set(&own, &widget(1), None).await;
    cache.set("teamx:widgets:1", &widget(1), None).await;

    cache.delete_by_pattern(&cache.pattern("widgets:*")).await;

    assert!(!cache.exists(&own).await);
    assert!(cache.exists("teamx:widgets:1").await);
}

#[tokio::test]
async fn test_short_ttl_expires() {
    let cache = provider();
    cache
        .set("app:flash", &widget(1), Some(Duration::from_secs(1)))
        .await;
    assert!(cache.exists("app:flash").await);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(cache.get::<Widget>("app:flash").await, None);
    assert_eq!(cache.get_ttl("app:flash").await, -1);
}
