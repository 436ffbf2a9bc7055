// 🧾 SQL Emitter - idempotent migration script
// Schema DDL, then countries, states and batched city upserts.
//
// Re-running the script against a seeded database is safe:
// - DDL is create-if-absent, policies are drop-then-create
// - countries/states: ON CONFLICT DO NOTHING (ids are per-run, names are identity)
// - cities: ON CONFLICT DO UPDATE latitude/longitude

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::{DEFAULT_CITY_BATCH_SIZE, DEFAULT_SCHEMA};
use crate::deduplication::LocationSet;
use crate::entities::City;
use uuid::Uuid;

// ============================================================================
// LITERALS
// ============================================================================

/// Single-quoted text literal with embedded quotes doubled
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quoted text or NULL
pub fn optional_text_literal(value: Option<&str>) -> String {
    match value {
        Some(v) => quote_literal(v),
        None => "NULL".to_string(),
    }
}

/// Bare numeric text or NULL; the text is not validated
pub fn numeric_literal(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "NULL".to_string(),
    }
}

// ============================================================================
// SCRIPT HEADER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScriptHeader {
    pub generated_at: DateTime<Utc>,
    pub source_sha256: Option<String>,
}

impl ScriptHeader {
    pub fn now(source_sha256: Option<String>) -> Self {
        ScriptHeader {
            generated_at: Utc::now(),
            source_sha256,
        }
    }
}

// ============================================================================
// SQL EMITTER
// ============================================================================

#[derive(Debug, Clone)]
pub struct SqlEmitter {
    /// Target schema, already validated as a plain identifier
    pub schema: String,

    /// Max tuples per city INSERT
    pub city_batch_size: usize,
}

impl Default for SqlEmitter {
    fn default() -> Self {
        SqlEmitter::new(DEFAULT_SCHEMA, DEFAULT_CITY_BATCH_SIZE)
    }
}

impl SqlEmitter {
    pub fn new(schema: &str, city_batch_size: usize) -> Self {
        SqlEmitter {
            schema: schema.to_string(),
            city_batch_size: city_batch_size.max(1),
        }
    }

    fn table(&self, name: &str) -> String {
        format!("{}.{}", self.schema, name)
    }

    /// Whole script: header, DDL, then data
    pub fn render(&self, set: &LocationSet, header: &ScriptHeader) -> String {
        let mut out = String::new();

        out.push_str("-- Seed locations from Google Sheet\n");
        let _ = writeln!(out, "-- Generated at {}", header.generated_at.to_rfc3339());
        if let Some(sha) = &header.source_sha256 {
            let _ = writeln!(out, "-- Source sha256 {}", sha);
        }
        out.push('\n');

        out.push_str(&self.schema_ddl());
        out.push_str(&self.data_statements(set));
        out
    }

    /// Tables, constraints, indexes and read-only RLS policies
    pub fn schema_ddl(&self) -> String {
        let countries = self.table("countries");
        let states = self.table("states");
        let cities = self.table("cities");

        let mut ddl = format!(
            "CREATE TABLE IF NOT EXISTS {countries} (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {states} (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL,
    country_id uuid REFERENCES {countries}(id) ON DELETE CASCADE,
    UNIQUE(name, country_id)
);

CREATE TABLE IF NOT EXISTS {cities} (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL,
    state_id uuid REFERENCES {states}(id) ON DELETE CASCADE,
    ibge_code text,
    latitude numeric,
    longitude numeric,
    UNIQUE(name, state_id)
);

-- Indexes for foreign keys
CREATE INDEX IF NOT EXISTS idx_states_country ON {states}(country_id);
CREATE INDEX IF NOT EXISTS idx_cities_state ON {cities}(state_id);

-- RLS
ALTER TABLE {countries} ENABLE ROW LEVEL SECURITY;
ALTER TABLE {states} ENABLE ROW LEVEL SECURITY;
ALTER TABLE {cities} ENABLE ROW LEVEL SECURITY;

-- Allow read access to everyone
"
        );

        for (table, qualified) in [("countries", &countries), ("states", &states), ("cities", &cities)] {
            let policy = format!("\"Public read {}\"", table);
            let _ = writeln!(ddl, "DROP POLICY IF EXISTS {} ON {};", policy, qualified);
            let _ = writeln!(
                ddl,
                "CREATE POLICY {} ON {} FOR SELECT USING (true);\n",
                policy, qualified
            );
        }

        ddl
    }

    /// Country, state and city inserts; empty collections emit nothing
    pub fn data_statements(&self, set: &LocationSet) -> String {
        let mut out = String::new();

        if let Some(stmt) = self.country_insert(set) {
            out.push_str("\n-- Insert Countries\n");
            out.push_str(&stmt);
        }

        if let Some(stmt) = self.state_insert(set) {
            out.push_str("\n-- Insert States\n");
            out.push_str(&stmt);
        }

        let batches = self.city_inserts(set);
        if !batches.is_empty() {
            out.push_str("\n-- Insert Cities (batched to stay under the parser's statement limits)\n");
            for stmt in batches {
                out.push_str(&stmt);
                out.push('\n');
            }
        }

        out
    }

    pub fn country_insert(&self, set: &LocationSet) -> Option<String> {
        if set.countries.is_empty() {
            return None;
        }

        let values: Vec<String> = set
            .countries
            .iter()
            .map(|c| format!("({}, {})", quote_literal(&c.id.to_string()), quote_literal(&c.name)))
            .collect();

        Some(format!(
            "INSERT INTO {} (id, name) VALUES\n{}\nON CONFLICT (name) DO NOTHING;\n",
            self.table("countries"),
            values.join(",\n")
        ))
    }

    pub fn state_insert(&self, set: &LocationSet) -> Option<String> {
        if set.states.is_empty() {
            return None;
        }

        let country_names = country_names(set);
        let values: Vec<String> = set
            .states
            .iter()
            .map(|s| {
                format!(
                    "({}, {}, {})",
                    quote_literal(&s.id.to_string()),
                    quote_literal(&s.name),
                    self.country_ref(country_names.get(&s.country_id).copied().unwrap_or_default())
                )
            })
            .collect();

        Some(format!(
            "INSERT INTO {} (id, name, country_id) VALUES\n{}\nON CONFLICT (name, country_id) DO NOTHING;\n",
            self.table("states"),
            values.join(",\n")
        ))
    }

    /// One complete INSERT per chunk of `city_batch_size` cities
    pub fn city_inserts(&self, set: &LocationSet) -> Vec<String> {
        let country_names = country_names(set);
        let state_keys: HashMap<Uuid, (&str, &str)> = set
            .states
            .iter()
            .map(|s| {
                let country = country_names.get(&s.country_id).copied().unwrap_or_default();
                (s.id, (s.name.as_str(), country))
            })
            .collect();

        set.cities
            .chunks(self.city_batch_size)
            .map(|batch| {
                let values: Vec<String> = batch
                    .iter()
                    .map(|city| {
                        let (state, country) = state_keys.get(&city.state_id).copied().unwrap_or_default();
                        self.city_tuple(city, state, country)
                    })
                    .collect();
                format!(
                    "INSERT INTO {} (name, state_id, ibge_code, latitude, longitude) VALUES\n{}\n\
                     ON CONFLICT (name, state_id) DO UPDATE SET latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude;\n",
                    self.table("cities"),
                    values.join(",\n")
                )
            })
            .collect()
    }

    // Foreign keys are looked up by natural key. On an empty store this yields the
    // id minted in this run; on a seeded store it yields the row that won earlier.

    fn country_ref(&self, country: &str) -> String {
        format!(
            "(SELECT id FROM {} WHERE name = {})",
            self.table("countries"),
            quote_literal(country)
        )
    }

    fn state_ref(&self, state: &str, country: &str) -> String {
        format!(
            "(SELECT s.id FROM {} s JOIN {} c ON c.id = s.country_id WHERE s.name = {} AND c.name = {})",
            self.table("states"),
            self.table("countries"),
            quote_literal(state),
            quote_literal(country)
        )
    }

    fn city_tuple(&self, city: &City, state: &str, country: &str) -> String {
        format!(
            "({}, {}, {}, {}, {})",
            quote_literal(&city.name),
            self.state_ref(state, country),
            optional_text_literal(city.code.as_deref()),
            numeric_literal(city.latitude.as_deref()),
            numeric_literal(city.longitude.as_deref())
        )
    }
}

fn country_names(set: &LocationSet) -> HashMap<Uuid, &str> {
    set.countries
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect()
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Write the finished script, creating parent directories as needed
pub fn write_script(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    fs::write(path, contents)
        .with_context(|| format!("Failed to write migration file {}", path.display()))
}
