//! forecast-runner: headless tournament forecast runner.
//!
//! Usage:
//!   forecast-runner --data-dir ./data
//!   forecast-runner --snapshot today.json --trials 50000 --seed 12345
//!   forecast-runner --db forecast.db --json predictions.json
//!   forecast-runner --db forecast.db --cached

use anyhow::{Context, Result};
use std::env;
use tourney_core::{
    engine::{Forecast, ForecastEngine},
    prediction::PredictionRow,
    snapshot::TournamentSnapshot,
    store::SimStore,
    ForecastConfig,
};

#[derive(serde::Serialize)]
struct ForecastExport<'a> {
    predictions:      &'a [PredictionRow],
    master_seed:      u64,
    trials_completed: u64,
    trials_discarded: u64,
    updated_at:       String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let db = flag_value(&args, "--db");
    let json_out = flag_value(&args, "--json");
    let cached = args.iter().any(|a| a == "--cached");

    let mut config = ForecastConfig::load(data_dir)?;
    if let Some(trials) = parse_arg::<u64>(&args, "--trials") {
        config.simulation.trials = trials;
    }
    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        config.seed = Some(seed);
    }

    let mut store = match db {
        Some(path) => {
            let store = SimStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    if cached {
        let Some(store) = store.as_ref() else {
            anyhow::bail!("--cached requires --db");
        };
        if let Some(cache) = store.cached_predictions()? {
            println!("Cached predictions (updated {})", cache.updated_at);
            print_table(&cache.predictions);
            return Ok(());
        }
        log::info!("no cached predictions, running a fresh forecast");
    }

    let default_snapshot = format!("{data_dir}/snapshot.json");
    let (snapshot, from_store) = match (flag_value(&args, "--snapshot"), store.as_mut()) {
        (Some(path), _) => (load_json_snapshot(path)?, false),
        (None, Some(store)) => {
            let stored = store.load_snapshot()?;
            if stored.teams.is_empty() {
                let seeded = load_json_snapshot(&default_snapshot)?;
                store.import_snapshot(&seeded)?;
                log::info!("empty database seeded from {default_snapshot}");
                (seeded, true)
            } else {
                (stored, true)
            }
        }
        (None, None) => (load_json_snapshot(&default_snapshot)?, false),
    };

    println!("forecast-runner");
    println!("  data_dir:  {data_dir}");
    println!("  trials:    {}", config.simulation.trials);
    println!("  teams:     {}", snapshot.teams.len());
    println!("  fixtures:  {}", snapshot.fixtures.len());

    let engine = ForecastEngine::build(&snapshot, config)?;
    println!("  seed:      {}", engine.master_seed());
    println!();

    let forecast = engine.run();
    print_summary(&forecast);

    match store.as_mut() {
        Some(store) if from_store => {
            store.save_predictions(&forecast.predictions)?;
            store.record_run(&forecast, env!("CARGO_PKG_VERSION"))?;
            log::info!("predictions persisted");
        }
        Some(_) => log::warn!("snapshot did not come from --db, predictions not persisted"),
        None => {}
    }

    if let Some(path) = json_out {
        let export = ForecastExport {
            predictions:      &forecast.predictions,
            master_seed:      forecast.master_seed,
            trials_completed: forecast.trials_completed,
            trials_discarded: forecast.trials_discarded,
            updated_at:       chrono::Utc::now().to_rfc3339(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&export)?)
            .with_context(|| format!("Cannot write {path}"))?;
        println!("Wrote {path}");
    }

    Ok(())
}

fn print_summary(forecast: &Forecast) {
    println!("=== RUN SUMMARY ===");
    println!("  master seed:     {}", forecast.master_seed);
    println!("  trials:          {}/{}", forecast.trials_completed, forecast.trials_requested);
    println!("  discarded:       {}", forecast.trials_discarded);
    println!();
    print_table(&forecast.predictions);
}

fn print_table(rows: &[PredictionRow]) {
    println!(
        "  {:<6} {:<5} {:>8} {:>8} {:>8} {:>8}",
        "TEAM", "GRP", "2ND PH", "SEMI", "FINAL", "WIN"
    );
    for r in rows {
        println!(
            "  {:<6} {:<5} {:>7.1}% {:>7.1}% {:>7.1}% {:>7.1}%",
            r.short_code, r.group, r.second_phase_pct, r.semifinal_pct, r.final_pct, r.champion_pct
        );
    }
}

fn load_json_snapshot(path: &str) -> Result<TournamentSnapshot> {
    TournamentSnapshot::load(path).with_context(|| format!("Cannot read snapshot {path}"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    flag_value(args, flag).and_then(|v| v.parse().ok())
}
