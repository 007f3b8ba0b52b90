use std::collections::HashMap;
use std::sync::Arc;

use schema::SpeciesDetail;

/// Session-lifetime memo of species details, keyed by species name.
///
/// Append-only: entries are never replaced or evicted.
#[derive(Debug, Default, Clone)]
pub struct DetailCache {
    entries: HashMap<String, Arc<SpeciesDetail>>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, species: &str) -> Option<Arc<SpeciesDetail>> {
        self.entries.get(species).cloned()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.entries.contains_key(species)
    }

    /// Store a detail record. The first record stored for a name wins; the
    /// one actually held is returned.
    pub fn insert(&mut self, species: &str, detail: Arc<SpeciesDetail>) -> Arc<SpeciesDetail> {
        self.entries
            .entry(species.to_string())
            .or_insert(detail)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::species_detail;

    #[test]
    fn test_first_insert_wins() {
        let mut cache = DetailCache::new();
        let first = Arc::new(species_detail("eevee", 133, &["normal"]));
        let second = Arc::new(species_detail("eevee", 133, &["fairy"]));

        cache.insert("eevee", first.clone());
        let held = cache.insert("eevee", second);

        assert!(Arc::ptr_eq(&held, &first));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("eevee").unwrap().types, vec!["normal"]);
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = DetailCache::new();
        assert!(cache.get("ditto").is_none());
        assert!(!cache.contains("ditto"));
        assert!(cache.is_empty());
    }
}
