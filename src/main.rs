use anyhow::{Context, Result};
use clap::Parser;
use igtag::igtag_core::dates::now_local;
use igtag::igtag_core::{
    Cli, Exporter, IgtagError, LOG_FILE_NAME, RunLog, SystemRunner, Tools, collect_media,
    create_run_dir,
};
use log::Log;

fn main() {
    let cli = Cli::parse();
    let started_at = now_local();

    let run_log = match RunLog::open(LOG_FILE_NAME) {
        Ok(run_log) => run_log,
        Err(e) => {
            eprintln!("Error: cannot open {LOG_FILE_NAME}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, started_at, &run_log) {
        log::error!(logger: run_log, "{e:#}");
        run_log.flush();
        let code = e
            .downcast_ref::<IgtagError>()
            .map_or(1, IgtagError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: &Cli, started_at: time::OffsetDateTime, run_log: &RunLog) -> Result<()> {
    log::info!(logger: run_log, "source = {}", cli.source.display());
    log::info!(logger: run_log, "output = {}", cli.output.display());

    let media = collect_media(&cli.source, run_log)
        .with_context(|| format!("Failed to read archive at {}", cli.source.display()))?;
    log::info!(logger: run_log, "Collected {} item{}", media.len(), plural(media.len()));

    let run_dir = create_run_dir(&cli.output, &started_at)
        .with_context(|| format!("Failed to create run directory in {}", cli.output.display()))?;
    log::info!(logger: run_log, "Writing items to {}", run_dir.display());

    let mut exporter = Exporter::new(SystemRunner, Tools::from_env(), run_dir, run_log);
    let exported = exporter.export_all(&media)?;

    let summary = format!(
        "Exported {} item{} to {}",
        exported.len(),
        plural(exported.len()),
        exporter.run_dir().display()
    );
    log::info!(logger: run_log, "{summary}");
    println!("{summary}");

    Ok(())
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
