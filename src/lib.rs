pub mod capability;
pub mod config;
pub mod environment;
pub mod error;
pub mod exec;
pub mod files;
pub mod log;
pub mod pipeline;
pub mod render;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{RunReport, Scaffolder};

/// Scaffold a project with the real shell, `PATH` and terminal.
pub fn scaffold(config: Config) -> Result<RunReport> {
    Scaffolder::new(config).run()
}
