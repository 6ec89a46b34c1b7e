mod bootstrap;

use std::io::{self, Write};

use anyhow::Result;
use bikeshare_core::settings::{OutputFormat, Settings};
use bikeshare_runtime::prompt::{FilterPresets, Prompter};
use bikeshare_runtime::session::Session;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("bikeshare v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, format: {:?}, max attempts: {:?}",
        settings.data_dir.display(),
        settings.format,
        settings.max_attempts()
    );

    let catalog = settings.catalog();
    bootstrap::missing_sources(&catalog);

    let presets = FilterPresets {
        city: settings.city.clone(),
        month: settings.month.clone(),
        day: settings.day.clone(),
    };

    // JSON documents own stdout; the dialogue moves to stderr.
    let dialogue: Box<dyn Write> = match settings.format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };
    let prompter =
        Prompter::new(io::stdin().lock(), dialogue).with_max_attempts(settings.max_attempts());

    let rounds = Session::new(&catalog, prompter, io::stdout(), settings.format)
        .with_presets(presets)
        .run()?;

    tracing::info!("Session finished after {} round(s)", rounds);
    Ok(())
}
