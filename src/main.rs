use anyhow::Result;

use seed_locations::{logging, run, Outcome, SeedConfig};

fn main() -> Result<()> {
    logging::init_tracing("info")?;

    println!("🌎 Seed Locations v{} - Sheet → SQL migration", seed_locations::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = SeedConfig::from_env()?;

    match run(&config)? {
        Outcome::Written(summary) => {
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!(
                "✅ {} rows → {} countries, {} states, {} cities ({} city statements)",
                summary.rows_read,
                summary.countries,
                summary.states,
                summary.cities,
                summary.city_statements
            );
        }
        // Already reported; no file, nothing more to do
        Outcome::FetchFailed(_) => {}
    }

    Ok(())
}
