//! Ambient plumbing shared by the pl-bench binaries: logger setup and
//! environment-driven configuration.

pub mod config;
pub mod logging;

pub use logging::initialize_logger;
