use std::env;
use std::fs;

use hashplan::utils::logging;
use simulator::{
    config::Config,
    run_simulation, save_results,
};

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

/// Main function that loads a scenario, runs it and saves the statements
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    logging::init_logging();

    let scenario_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "simulator/src/scenarios/config_simple.toml".to_string());
    log::info!("Loading scenario from {}", scenario_path);

    let config = Config::load(&scenario_path)?;

    // Create results directory if it doesn't exist
    fs::create_dir_all(&config.output.results_dir)?;

    let output = run_simulation(&config).await?;
    save_results(&output, &config.output.results_dir)?;

    log::info!(
        "Scenario '{}' complete: {} statement sets saved under {}",
        config.project.name,
        1 + output.derived.len(),
        config.output.results_dir
    );

    Ok(())
}
