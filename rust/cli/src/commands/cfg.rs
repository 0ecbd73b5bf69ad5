//! `cfg`: print the resolved configuration with the source of each value.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "amount": {
//!     "value": 10,
//!     "source": "default"
//!   },
//!   "difficulty": {
//!     "value": "hard",
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()
        .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))?;

    let display = serde_json::json!({
        "amount": {
            "value": config.amount,
            "source": sources.amount,
        },
        "difficulty": {
            "value": config.difficulty,
            "source": sources.difficulty,
        },
        "category": {
            "value": config.category,
            "source": sources.category,
        },
        "api_url": {
            "value": config.api_url,
            "source": sources.api_url,
        },
        "timeout_secs": {
            "value": config.timeout_secs,
            "source": sources.timeout_secs,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
