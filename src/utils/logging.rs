use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLE_LOGGING: AtomicBool = AtomicBool::new(false);

/// Initializes logging based on the HASHPLAN_LOGGING environment variable.
/// - If HASHPLAN_LOGGING=true, logging is enabled.
/// - If HASHPLAN_LOGGING=false or not set, logging is disabled.
/// - To enable logging in tests, run: HASHPLAN_LOGGING=true cargo test -- --nocapture
pub fn init_logging() {
    match env::var("HASHPLAN_LOGGING") {
        Ok(value) => match value.as_str() {
            "true" => ENABLE_LOGGING.store(true, Ordering::SeqCst),
            "false" => ENABLE_LOGGING.store(false, Ordering::SeqCst),
            _ => panic!("\nError: HASHPLAN_LOGGING environment variable must be 'true' or 'false'\n\nTo run the program, use one of:\n  HASHPLAN_LOGGING=true cargo run\n  HASHPLAN_LOGGING=false cargo run\n"),
        },
        Err(_) => ENABLE_LOGGING.store(false, Ordering::SeqCst),
    }
}

pub fn log(prefix: &str, message: &str) {
    if ENABLE_LOGGING.load(Ordering::SeqCst) {
        println!("  [{}]   {}", prefix, message);
    }
}
