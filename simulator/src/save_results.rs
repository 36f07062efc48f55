use std::fs;
use std::path::Path;

use hashplan::statements::StatementSet;
use hashplan::summary::ProfitabilitySummary;
use hashplan::utils::logging;

use crate::simulation::SimulationOutput;

/// Saves the simulation results to files: one JSON table per statement and
/// frequency, plus the profitability summary.
///
/// # Arguments
///
/// * `output` - The simulation output (base and derived statement sets)
/// * `results_dir` - Directory the data files are written under
pub fn save_results(output: &SimulationOutput, results_dir: &str) -> Result<(), String> {
    let data_dir = Path::new(results_dir).join("data");
    fs::create_dir_all(&data_dir).map_err(|e| e.to_string())?;

    save_statement_set(&data_dir, &output.base)?;
    for set in &output.derived {
        save_statement_set(&data_dir, set)?;
    }
    save_summary(&data_dir, &output.base.summary)?;

    // Final roll-up for the terminal.
    logging::log("SIMULATOR", "\n=== Profitability Summary ===");
    for (metric, value) in output.base.summary.iter() {
        logging::log("SIMULATOR", &format!("{}: {:.4}", metric, value));
    }
    logging::log("SIMULATOR", "=============================");

    Ok(())
}

fn save_statement_set(data_dir: &Path, set: &StatementSet) -> Result<(), String> {
    for (label, statement) in [("env", &set.env), ("income", &set.income), ("roi", &set.roi)] {
        let file = data_dir.join(format!("statement_{}_{}.json", set.frequency, label));
        let json = serde_json::to_string_pretty(statement).map_err(|e| e.to_string())?;
        fs::write(&file, json).map_err(|e| e.to_string())?;
        logging::log(
            "SIMULATOR",
            &format!("Saved {} statement at {} to {}", label, set.frequency, file.display()),
        );
    }
    Ok(())
}

fn save_summary(data_dir: &Path, summary: &ProfitabilitySummary) -> Result<(), String> {
    let file = data_dir.join("summary.json");
    let json = serde_json::to_string_pretty(summary).map_err(|e| e.to_string())?;
    fs::write(&file, json).map_err(|e| e.to_string())?;
    logging::log("SIMULATOR", &format!("Saved summary to {}", file.display()));
    Ok(())
}
