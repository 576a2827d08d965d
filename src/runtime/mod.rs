use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::library::scan;
use crate::meta::LoftyReader;
use crate::relocate::{Engine, executor_for};
use crate::template::Builtins;

mod report;
mod settings;

pub use report::Summary;

pub fn run(cli: &Cli) -> Result<Summary> {
    let mut settings = settings::load_settings();
    cli.apply(&mut settings);
    if let Err(msg) = settings.validate() {
        bail!("invalid settings: {msg}");
    }

    if cli.print_config {
        print!(
            "{}",
            toml::to_string_pretty(&settings).context("failed to serialize settings")?
        );
        return Ok(Summary::default());
    }

    let Some(path) = cli.path.as_deref() else {
        bail!("no path given");
    };
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let working_dir = env::current_dir().context("cannot determine the working directory")?;
    let engine = Engine::new(&settings, &LoftyReader, &Builtins, working_dir)
        .context("invalid format string")?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            warn!("cannot install interrupt handler: {e}");
        }
    }

    let files = scan(path, &settings.library);
    info!("{} file(s) to process under {}", files.len(), path.display());

    let executor = executor_for(&settings.rename);
    let records = engine.run(&files, executor.as_ref(), &stop)?;

    let mut stdout = io::stdout().lock();
    for record in &records {
        writeln!(stdout, "{}", report::format_record(record))?;
    }
    stdout.flush()?;

    let summary = Summary::from_records(&records, files.len());
    info!(
        "done: {} relocated, {} previewed, {} skipped, {} failed, {} untouched",
        summary.relocated, summary.previewed, summary.skipped, summary.failed, summary.untouched
    );
    Ok(summary)
}
