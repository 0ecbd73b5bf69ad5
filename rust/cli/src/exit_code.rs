//! Process exit codes.
//!
//! `run` maps every outcome to one of these; see [`crate::CliError::exit_code`].

/// Command finished normally, including a quiz the user quit.
pub const SUCCESS: i32 = 0;

/// Bad arguments, bad configuration, or the question bank could not be used.
pub const ERROR: i32 = 2;

/// Stopped by Ctrl+C.
pub const INTERRUPTED: i32 = 130;
