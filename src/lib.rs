//! Tru State
//!
//! Validates a stream of order-state updates against a declarative state
//! machine and reports order counts and value per state.
//!
//! This library provides functionality for:
//! - Loading a state machine specification (adjacency lists, case-insensitive)
//! - Decoding order update records
//! - Validating each update against the order's previous record and the
//!   allowed transitions, flagging orders with an inconsistent history
//! - Aggregating the final ledger into a per-state report

pub mod cli;
pub mod config;
pub mod error;
pub mod orders;
pub mod parser;
pub mod state_machine;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr, the report owns stdout
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
