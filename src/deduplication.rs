// 🔍 Deduplication Engine - collapse repeated countries/states into identities
// Countries by name, states by (country, name); every accepted row is one city.

use crate::entities::{City, CountryRegistry, StateRegistry};
use crate::normalizer::{normalize_row, LocationRow, RawRow};

// ============================================================================
// LOCATION SET (run-scoped accumulator)
// ============================================================================

/// Everything one generation run knows about.
///
/// Invariants:
/// - every state's `country_id` is a country in `countries`
/// - every city's `state_id` is a state in `states`
/// - iteration order is first-seen order, so the emitted SQL is deterministic
///   for a given input order (identifiers aside)
#[derive(Debug, Default)]
pub struct LocationSet {
    pub countries: CountryRegistry,
    pub states: StateRegistry,
    pub cities: Vec<City>,
}

impl LocationSet {
    pub fn new() -> Self {
        LocationSet::default()
    }

    /// Fold one normalized row into the set
    pub fn ingest(&mut self, row: LocationRow) {
        let country_id = self.countries.resolve(&row.country);
        let state_id = self.states.resolve(country_id, &row.state);

        self.cities.push(City {
            name: row.city,
            state_id,
            code: row.code,
            latitude: row.latitude,
            longitude: row.longitude,
        });
    }

    /// Normalize raw rows and ingest the ones that survive; skipped rows leave no trace
    pub fn from_raw_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        Self::from_rows(rows.into_iter().filter_map(normalize_row))
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = LocationRow>,
    {
        let mut set = LocationSet::new();
        for row in rows {
            set.ingest(row);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
