// 🌎 Country Entity - identity = normalized name
//
// "Name is the deduplication key, UUID is the foreign key"
// The UUID is fresh every run; the database keeps the first row per name.

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// COUNTRY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Generated identity, stable only within one run
    pub id: Uuid,

    /// Normalized (trimmed, uppercased) name
    pub name: String,
}

impl Country {
    pub fn new(name: String) -> Self {
        Country {
            id: Uuid::new_v4(),
            name,
        }
    }
}

// ============================================================================
// COUNTRY REGISTRY
// ============================================================================

/// Identity map: normalized name → country, in first-seen order
#[derive(Debug, Default)]
pub struct CountryRegistry {
    by_name: IndexMap<String, Country>,
}

impl CountryRegistry {
    pub fn new() -> Self {
        CountryRegistry::default()
    }

    /// Get-or-create: the first occurrence of a name mints its id
    pub fn resolve(&mut self, name: &str) -> Uuid {
        if let Some(existing) = self.by_name.get(name) {
            return existing.id;
        }

        let country = Country::new(name.to_string());
        let id = country.id;
        self.by_name.insert(name.to_string(), country);
        id
    }

    pub fn get(&self, name: &str) -> Option<&Country> {
        self.by_name.get(name)
    }

    pub fn contains_id(&self, id: Uuid) -> bool {
        self.by_name.values().any(|c| c.id == id)
    }

    /// Countries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reuses_id() {
        let mut registry = CountryRegistry::new();

        let first = registry.resolve("BRASIL");
        let again = registry.resolve("BRASIL");

        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("BRASIL").unwrap().id, first);
    }

    #[test]
    fn test_first_seen_order() {
        let mut registry = CountryRegistry::new();
        registry.resolve("PARAGUAI");
        registry.resolve("BRASIL");
        registry.resolve("PARAGUAI");
        registry.resolve("ARGENTINA");

        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["PARAGUAI", "BRASIL", "ARGENTINA"]);
    }

    #[test]
    fn test_distinct_names_get_distinct_ids() {
        let mut registry = CountryRegistry::new();
        let a = registry.resolve("BRASIL");
        let b = registry.resolve("URUGUAI");

        assert_ne!(a, b);
        assert!(registry.contains_id(a));
        assert!(registry.contains_id(b));
        assert!(!registry.contains_id(Uuid::new_v4()));
    }
}
