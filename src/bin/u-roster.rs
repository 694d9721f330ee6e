// Command-line rostering run.
//
// Usage:
//   u-roster [config.json] [crew_id flight_id]
//
// Loads the flight, crew and rules tables, runs the search, prints the
// roster metrics and compliance summary as JSON and writes the roster CSV.
// With a crew and flight ID, that crew member is then pulled from the
// flight and the recovered roster is written as well.

use serde_json::json;
use std::process::ExitCode;
use tracing::{error, info};
use u_roster::config::EngineConfig;
use u_roster::{logging, RosterSession};

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let mut session = RosterSession::from_config(&config)?;
    info!(stats = ?session.stats(), "data loaded");

    let summary = session.generate_roster();
    session.export_roster(&config.data.base_roster)?;

    let mut report = json!({
        "fitness": summary.fitness,
        "generations_run": summary.generations_run,
        "stopped": summary.stopped,
        "kpi": summary.kpi,
        "compliance": summary.compliance,
        "output": config.data.base_roster.display().to_string(),
    });

    if let [_, crew_id, flight_id, ..] = args.as_slice() {
        let recovered = session.handle_disruption(crew_id, flight_id)?;
        report["disruption"] = json!({
            "removed_crew": crew_id,
            "affected_flight": flight_id,
            "recovery_score": recovered.fitness,
            "kpi": recovered.kpi,
            "compliance": recovered.compliance,
            "output": config.data.recovered_roster.display().to_string(),
        });
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("rostering run failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
