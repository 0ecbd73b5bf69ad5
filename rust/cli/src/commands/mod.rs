//! Command handlers for the trivium CLI.
//!
//! Each command lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Dependency injection: output streams (`&mut dyn Write`) passed as parameters
//! - Error propagation: all errors propagated via `CliError`
//!
//! Commands that talk to the question bank drive a current-thread tokio
//! runtime built by [`runtime`].

mod categories;
mod cfg;
pub mod play;

pub use categories::handle_categories_command;
pub use cfg::handle_cfg_command;
pub use play::{handle_play_command, play_session, PlayOptions, SessionEnd};

use crate::error::CliError;

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub(crate) fn load_config() -> Result<crate::config::Config, CliError> {
    crate::config::load().map_err(|e| CliError::Config(e.to_string()))
}
