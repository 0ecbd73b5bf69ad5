//! `categories`: list the ids accepted by `play --category`.

use super::{load_config, runtime};
use crate::error::CliError;
use crate::formatters::render_categories;
use crate::ui;
use std::io::Write;
use trivium_bank::{create_source, DEFAULT_SOURCE};

pub fn handle_categories_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let config = load_config()?;
    let runtime = runtime()?;
    let categories = runtime.block_on(async {
        let source = create_source(DEFAULT_SOURCE, config.client_settings())?;
        Ok::<_, CliError>(source.categories().await?)
    })?;

    if categories.is_empty() {
        ui::display_warning(err, "the question bank listed no categories")?;
    }
    render_categories(out, &categories)?;
    Ok(())
}
