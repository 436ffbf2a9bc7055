// 🚚 Pipeline - Fetcher → Normalizer → Deduplicator → Emitter
// Nothing is written until the whole dataset is parsed and rendered in memory.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::deduplication::LocationSet;
use crate::fetcher::{self, Payload};
use crate::normalizer::parse_rows;
use crate::sql::{write_script, ScriptHeader, SqlEmitter};

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub rows_read: usize,
    pub countries: usize,
    pub states: usize,
    pub cities: usize,
    pub city_statements: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(GenerationSummary),
    /// The fetch failed; no file was produced
    FetchFailed(String),
}

/// Everything after the fetch, without touching the filesystem
#[derive(Debug)]
pub struct Generated {
    pub set: LocationSet,
    pub rows_read: usize,
    pub script: String,
}

// ============================================================================
// STAGES
// ============================================================================

/// Parse, normalize, deduplicate and render one payload
pub fn generate(csv_text: &str, emitter: &SqlEmitter, header: &ScriptHeader) -> Result<Generated> {
    println!("Processing data...");
    let rows = parse_rows(csv_text)?;
    let set = LocationSet::from_raw_rows(&rows);
    info!(
        rows = rows.len(),
        countries = set.countries.len(),
        states = set.states.len(),
        cities = set.cities.len(),
        "deduplicated locations"
    );

    println!(
        "Generating SQL for {} countries, {} states, {} cities...",
        set.countries.len(),
        set.states.len(),
        set.cities.len()
    );
    let script = emitter.render(&set, header);

    Ok(Generated {
        set,
        rows_read: rows.len(),
        script,
    })
}

/// Full run. A failed fetch is reported and contained; later failures propagate.
pub fn run(config: &SeedConfig) -> Result<Outcome> {
    config.validate()?;

    println!("Downloading CSV from {}...", config.source);
    let payload: Payload = match fetcher::fetch(&config.source) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "fetch failed, nothing written");
            println!("❌ Failed to download CSV: {:#}", e);
            return Ok(Outcome::FetchFailed(format!("{:#}", e)));
        }
    };

    let emitter = SqlEmitter::new(&config.schema, config.city_batch_size);
    let header = ScriptHeader::now(Some(payload.sha256.clone()));
    let generated = generate(&payload.text, &emitter, &header)?;

    write_script(&config.output_path, &generated.script)?;
    println!("Migration file created at {}", config.output_path.display());

    Ok(Outcome::Written(GenerationSummary {
        rows_read: generated.rows_read,
        countries: generated.set.countries.len(),
        states: generated.set.states.len(),
        cities: generated.set.cities.len(),
        city_statements: generated.set.cities.len().div_ceil(emitter.city_batch_size),
        output_path: config.output_path.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::Source;
    use std::fs;
    use std::io::Write;

    const SAMPLE: &str = "Código,Nome,Estado,País,Latitude,Longitude\n\
                          1200401,rio branco,acre,brasil,\"-9,97\",\"-67,8\"\n\
                          1200302,Feijó,Acre,Brasil,\"-8,16\",\"-70,35\"\n\
                          ,,Acre,Brasil,,\n\
                          2927408,salvador, bahia ,BRASIL,\"-12,97\",\"-38,5\"\n\
                          ,O'Fallon,Missouri,Estados Unidos,\"38,81\",\"-90,69\"\n";

    fn config_for(source: Source, output: PathBuf) -> SeedConfig {
        SeedConfig {
            source,
            output_path: output,
            ..SeedConfig::default()
        }
    }

    #[test]
    fn test_generate_sample() {
        let generated = generate(SAMPLE, &SqlEmitter::default(), &ScriptHeader::now(None)).unwrap();

        assert_eq!(generated.rows_read, 5);
        assert_eq!(generated.set.countries.len(), 2);
        assert_eq!(generated.set.states.len(), 3);
        assert_eq!(generated.set.cities.len(), 4);

        assert!(generated.script.contains("'O''FALLON'"));
        assert!(generated.script.contains("'1200401', -9.97, -67.8)"));
        assert!(generated.script.contains("'BAHIA'"));
        assert!(!generated.script.contains("-- Source sha256"));

        println!("✅ Generate sample test PASSED");
    }

    #[test]
    fn test_run_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("locations.csv");
        let output = dir.path().join("migrations").join("seed.sql");
        fs::File::create(&input).unwrap().write_all(SAMPLE.as_bytes()).unwrap();

        let outcome = run(&config_for(Source::File(input), output.clone())).unwrap();

        match outcome {
            Outcome::Written(summary) => {
                assert_eq!(summary.countries, 2);
                assert_eq!(summary.states, 3);
                assert_eq!(summary.cities, 4);
                assert_eq!(summary.city_statements, 1);
                assert_eq!(summary.output_path, output);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let script = fs::read_to_string(&output).unwrap();
        assert!(script.contains("-- Source sha256 "));
        assert!(script.contains("INSERT INTO public.cities"));
    }

    #[test]
    fn test_fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("seed.sql");

        let outcome = run(&config_for(
            Source::File(dir.path().join("missing.csv")),
            output.clone(),
        ))
        .unwrap();

        assert!(matches!(outcome, Outcome::FetchFailed(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(Source::File(dir.path().join("x.csv")), dir.path().join("o.sql"));
        config.city_batch_size = 0;

        assert!(run(&config).is_err());
    }
}
