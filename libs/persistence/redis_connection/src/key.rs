use std::{borrow::Cow, collections::BTreeMap, fmt, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

/// A key template bound to the value type stored under it.
///
/// Implementations are generated with [`cache_key!`](crate::cache_key); the
/// rendered key is relative to the application namespace, which
/// [`KeyScheme`] prepends.
pub trait CacheKey {
    type Value: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Args<'r>;

    fn get_key_with_args(&self, args: Self::Args<'_>) -> Cow<'static, str>;
}

/// Applies the application namespace to keys and glob patterns.
///
/// Every key family of an entity kind renders as
/// `<namespace>:<kind>:...`, so `<namespace>:<kind>:*` sweeps them all.
#[derive(Debug, Clone)]
pub struct KeyScheme {
    namespace: Arc<str>,
}

impl KeyScheme {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Arc::from(namespace.into()),
        }
    }

    pub fn namespace(&self) -> &str { &self.namespace }

    pub fn key<K: CacheKey>(&self, key: &K, args: K::Args<'_>) -> String {
        self.qualify(&key.get_key_with_args(args))
    }

    /// Prefix a relative key with the namespace.
    pub fn qualify(&self, relative: &str) -> String {
        format!("{}:{}", self.namespace, relative)
    }

    /// Prefix a relative glob with the namespace. Glob metacharacters in
    /// the namespace are escaped so it only ever matches itself.
    pub fn pattern(&self, relative: &str) -> String {
        let mut out = String::with_capacity(self.namespace.len() + relative.len() + 1);
        for c in self.namespace.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(':');
        out.push_str(relative);
        out
    }
}

impl Default for KeyScheme {
    fn default() -> Self { Self::new("app") }
}

/// Sentinel rendered when a list query carries no filter at all.
pub const NO_FILTERS: &str = "none";

/// Canonical filter set of a list query.
///
/// Field order is irrelevant (fields are kept sorted) and a filter set to
/// `None` is indistinguishable from one never mentioned, so logically equal
/// queries always render the same qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListFilters {
    fields: BTreeMap<String, String>,
}

impl ListFilters {
    pub fn new() -> Self { Self::default() }

    pub fn with<V: fmt::Display>(
        mut self, field: &str, value: Option<V>,
    ) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert<V: fmt::Display>(&mut self, field: &str, value: Option<V>) {
        match value {
            Some(value) => {
                self.fields.insert(field.to_string(), value.to_string());
            }
            None => {
                self.fields.remove(field);
            }
        }
    }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// `field=value` pairs sorted by field and joined with `&`. Both sides
    /// are percent-encoded so user input can never inject `:`, `&` or glob
    /// metacharacters into the key.
    pub fn canonical(&self) -> String {
        if self.fields.is_empty() {
            return NO_FILTERS.to_string();
        }
        self.fields
            .iter()
            .map(|(field, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(field),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Qualifier of a list key: page, limit and canonical filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQueryKey {
    pub page: u64,
    pub limit: u64,
    pub filters: ListFilters,
}

impl ListQueryKey {
    pub fn new(page: u64, limit: u64, filters: ListFilters) -> Self {
        Self {
            page,
            limit,
            filters,
        }
    }
}

impl fmt::Display for ListQueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page={}:limit={}:{}",
            self.page,
            self.limit,
            self.filters.canonical()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_order_does_not_matter() {
        let a = ListFilters::new()
            .with("status", Some("todo"))
            .with("priority", Some("high"));
        let b = ListFilters::new()
            .with("priority", Some("high"))
            .with("status", Some("todo"));

        assert_eq!(a, b);
        assert_eq!(a.canonical(), "priority=high&status=todo");
    }

    #[test]
    fn test_explicit_none_equals_omitted() {
        let explicit = ListFilters::new()
            .with("status", Some("todo"))
            .with("assignee", None::<&str>);
        let omitted = ListFilters::new().with("status", Some("todo"));

        assert_eq!(explicit.canonical(), omitted.canonical());
    }

    #[test]
    fn test_none_clears_previous_value() {
        let filters = ListFilters::new()
            .with("status", Some("todo"))
            .with("status", None::<&str>);

        assert!(filters.is_empty());
        assert_eq!(filters.canonical(), NO_FILTERS);
    }

    #[test]
    fn test_values_are_escaped() {
        let filters = ListFilters::new().with("name", Some("a:b*&c=d"));
        let canonical = filters.canonical();

        assert!(!canonical.contains(':'));
        assert!(!canonical.contains('*'));
        assert_eq!(canonical.matches('=').count(), 1);
    }

    #[test]
    fn test_list_query_key_rendering() {
        let key = ListQueryKey::new(
            2,
            50,
            ListFilters::new().with("status", Some("done")),
        );
        assert_eq!(key.to_string(), "page=2:limit=50:status=done");

        let unfiltered = ListQueryKey::new(1, 20, ListFilters::new());
        assert_eq!(unfiltered.to_string(), "page=1:limit=20:none");
    }

    #[test]
    fn test_scheme_qualifies() {
        let scheme = KeyScheme::new("app");
        assert_eq!(scheme.qualify("tasks:1"), "app:tasks:1");
        assert_eq!(scheme.pattern("tasks:list:*"), "app:tasks:list:*");
        assert_eq!(scheme.namespace(), "app");
    }

    #[test]
    fn test_pattern_escapes_namespace_metacharacters() {
        use crate::cache::glob::glob_match;

        let scheme = KeyScheme::new("team*[1]?");
        let pattern = scheme.pattern("tasks:list:*");

        assert_eq!(pattern, r"team\*\[1\]\?:tasks:list:*");
        assert!(glob_match(&pattern, &scheme.qualify("tasks:list:none")));
        assert!(!glob_match(&pattern, "teamX1Y:tasks:list:none"));
        assert!(!glob_match(&pattern, "team-other1z:tasks:list:none"));
    }
}
