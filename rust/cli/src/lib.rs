//! # Trivium CLI Library
//!
//! Command-line front end for the trivium quiz: timed multiple-choice
//! questions pulled from an Open Trivia Database compatible question bank.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["trivium", "play", "--amount", "5", "--difficulty", "easy"];
//! let code = trivium_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play a quiz, 30 seconds per question
//! - `categories`: List category ids for `play --category`
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

#[macro_use]
mod macros;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod ui;
pub mod validation;

use cli::{Commands, TriviumCli};
use commands::{handle_categories_command, handle_cfg_command, handle_play_command};

pub use commands::{play_session, PlayOptions, SessionEnd};
pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// # Example
///
/// ```
/// use std::io;
/// let code = trivium_cli::run(["trivium", "--version"], &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match TriviumCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and succeed
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Usage: trivium <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for name in Commands::NAMES {
                write_or_exit!(err, "  {}", name);
            }
            write_or_exit!(err, "\nFor full help, run: trivium --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            amount,
            difficulty,
            category,
            seed,
        } => handle_play_command(
            PlayOptions {
                amount,
                difficulty,
                category,
                seed,
            },
            out,
            err,
        ),
        Commands::Categories => handle_categories_command(out, err),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            if ui::write_error(err, &e.to_string()).is_err() {
                return exit_code::ERROR;
            }
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_goes_to_stdout_with_success() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["trivium", "--help"], &mut out, &mut err);
        assert_eq!(code, 0);
        let help = String::from_utf8(out).unwrap();
        assert!(help.contains("play"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_lists_the_real_ones() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["trivium", "deal"], &mut out, &mut err);
        assert_eq!(code, 2);
        let stderr = String::from_utf8(err).unwrap();
        for name in Commands::NAMES {
            assert!(stderr.contains(name), "missing {name} in {stderr}");
        }
    }

    #[test]
    fn malformed_flag_value_is_a_usage_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["trivium", "play", "--amount", "lots"], &mut out, &mut err);
        assert_eq!(code, 2);
        assert!(out.is_empty());
    }
}
