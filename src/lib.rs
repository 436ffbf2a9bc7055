// Seed Locations - Core Library
// Turns the city/state/country sheet into an idempotent SQL migration.
// The transform is network-free so it can be tested in isolation.

pub mod config;
pub mod deduplication;
pub mod entities;
pub mod fetcher;
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod sql;

// Re-export commonly used types
pub use config::SeedConfig;
pub use deduplication::LocationSet;
pub use entities::{City, Country, CountryRegistry, State, StateKey, StateRegistry};
pub use fetcher::{fetch, Payload, Source};
pub use normalizer::{
    normalize_code, normalize_decimal, normalize_row, normalize_text, parse_rows, LocationRow,
    RawRow,
};
pub use pipeline::{generate, run, GenerationSummary, Generated, Outcome};
pub use sql::{quote_literal, write_script, ScriptHeader, SqlEmitter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
