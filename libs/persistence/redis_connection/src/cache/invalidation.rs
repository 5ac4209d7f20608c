/// Set of cache entries a committed mutation makes stale.
///
/// Direct keys name entries whose identity is known; patterns sweep key
/// families (lists, relationships) whose members cannot be enumerated.
/// Run it with [`CacheProvider::invalidate`](crate::cache_provider::CacheProvider::invalidate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    keys: Vec<String>,
    patterns: Vec<String>,
}

impl Invalidation {
    pub fn new() -> Self { Self::default() }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        push_unique(&mut self.keys, key.into());
        self
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            push_unique(&mut self.keys, key.into());
        }
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        push_unique(&mut self.patterns, pattern.into());
        self
    }

    pub fn direct_keys(&self) -> &[String] { &self.keys }

    pub fn patterns(&self) -> &[String] { &self.patterns }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.patterns.is_empty()
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}
