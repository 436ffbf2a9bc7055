// 🗺️ State Entity - identity = (country id, normalized name)

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub id: Uuid,
    pub name: String,
    pub country_id: Uuid,
}

impl State {
    pub fn new(name: String, country_id: Uuid) -> Self {
        State {
            id: Uuid::new_v4(),
            name,
            country_id,
        }
    }
}

/// States are scoped to their country: "GOIÁS" in two countries is two states
pub type StateKey = (Uuid, String);

#[derive(Debug, Default)]
pub struct StateRegistry {
    by_key: IndexMap<StateKey, State>,
}

impl StateRegistry {
    pub fn new() -> Self {
        StateRegistry::default()
    }

    /// Get-or-create within `country_id`
    pub fn resolve(&mut self, country_id: Uuid, name: &str) -> Uuid {
        let key = (country_id, name.to_string());
        if let Some(existing) = self.by_key.get(&key) {
            return existing.id;
        }

        let state = State::new(name.to_string(), country_id);
        let id = state.id;
        self.by_key.insert(key, state);
        id
    }

    pub fn get(&self, country_id: Uuid, name: &str) -> Option<&State> {
        self.by_key.get(&(country_id, name.to_string()))
    }

    pub fn contains_id(&self, id: Uuid) -> bool {
        self.by_key.values().any(|s| s.id == id)
    }

    /// States in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_country_reuses_id() {
        let mut registry = StateRegistry::new();
        let brasil = Uuid::new_v4();

        let a = registry.resolve(brasil, "ACRE");
        let b = registry.resolve(brasil, "ACRE");

        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(brasil, "ACRE").unwrap().country_id, brasil);
    }

    #[test]
    fn test_same_name_other_country_is_new_state() {
        let mut registry = StateRegistry::new();
        let brasil = Uuid::new_v4();
        let mexico = Uuid::new_v4();

        let a = registry.resolve(brasil, "SANTA CRUZ");
        let b = registry.resolve(mexico, "SANTA CRUZ");

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        let owners: Vec<Uuid> = registry.iter().map(|s| s.country_id).collect();
        assert_eq!(owners, vec![brasil, mexico]);
    }
}
