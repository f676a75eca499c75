//! Headless runner: loads every sample scenario, runs it twice, prints a
//! summary, and verifies determinism.
//!
//! Run with: `cargo run -p surfer-data --example headless_runner`

use std::path::Path;

use surfer_core::driver::run_with;
use surfer_core::rng::SimRng;
use surfer_data::load_scenario_dir;

const STAGES: [&str; 6] = ["solar", "battery", "sea", "drag", "thrust", "movement"];

fn main() {
    let scenarios_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios"));

    let scenarios = load_scenario_dir(scenarios_dir).expect("failed to load scenarios");
    println!("Scenarios: {}\n", scenarios.len());

    for scenario in &scenarios {
        let name = &scenario.name;
        let config = &scenario.config;
        println!("--- {name} ---");
        println!(
            "    {} -> {}, {} -> {}",
            config.loc_start,
            config.loc_end,
            config.date_start.to_rfc3339(),
            config.date_max.to_rfc3339(),
        );
        for (stage, model) in STAGES.iter().zip(scenario.pipeline.stage_names()) {
            println!("      {stage:>8}: {model}");
        }

        // Run 1
        let mut print_sink = |message: &str| println!("    | {message}");
        let run1 = run_with(
            config,
            &scenario.pipeline,
            &mut SimRng::new(scenario.seed),
            &mut print_sink,
        )
        .unwrap_or_else(|e| panic!("scenario '{name}' failed: {e}"));

        let hash1 = run1.state_hash();
        if let Some(last) = run1.last() {
            println!(
                "    After {} steps: at {}, {:.1} from start, {} storms, state hash = {hash1:#018x}",
                run1.len(),
                last.location,
                last.distance_from_start,
                run1.storm_count(),
            );
        }

        // Run 2 -- determinism check
        let run2 = run_with(
            config,
            &scenario.pipeline,
            &mut SimRng::new(scenario.seed),
            &mut |_: &str| {},
        )
        .unwrap_or_else(|e| panic!("scenario '{name}' failed (run 2): {e}"));
        let hash2 = run2.state_hash();

        if hash1 == hash2 {
            println!("    Determinism: PASS (hashes match)");
        } else {
            println!("    Determinism: FAIL! hash1={hash1:#018x} != hash2={hash2:#018x}");
            std::process::exit(1);
        }

        println!();
    }

    println!("All {} scenarios passed.", scenarios.len());
}
