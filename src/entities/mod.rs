// Entity Models - Country, State, City
//
// Countries and states carry a generated identity (UUID) and live in
// insertion-ordered registries keyed by normalized name. Cities are plain
// records pointing at their state; the target database reconciles duplicates.

pub mod city;
pub mod country;
pub mod state;

pub use city::City;
pub use country::{Country, CountryRegistry};
pub use state::{State, StateKey, StateRegistry};
