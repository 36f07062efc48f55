pub mod config;
pub mod save_results;
pub mod simulation;

pub use config::Config;
pub use save_results::save_results;
pub use simulation::{run_simulation, SimulationOutput};
