use crate::igtag_core::dates::{
    capture_time, format_exif_timestamp, format_setfile_timestamp, run_dir_name,
};
use crate::igtag_core::error::{IgtagError, Result};
use crate::igtag_core::logging::RunLog;
use crate::igtag_core::media::{GpsCoordinates, MediaRecord};
use crate::igtag_core::tools::{CommandRunner, ToolCommand, Tools};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use uuid::Uuid;

/// Everything derived from one record before any tool runs.
#[derive(Debug, Clone)]
pub struct TagPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub captured_at: OffsetDateTime,
    pub description: String,
    pub gps: Option<GpsCoordinates>,
}

impl TagPlan {
    /// Plan the export of `record` into `run_dir` under a fresh UUID filename.
    pub fn new(record: &MediaRecord, run_dir: &Path) -> Result<Self> {
        let file_name = format!("{}{}", Uuid::new_v4(), record.extension());

        Ok(TagPlan {
            source: record.uri.clone(),
            destination: run_dir.join(file_name),
            captured_at: capture_time(record.creation_timestamp)?,
            description: record.description().to_string(),
            gps: record.gps(),
        })
    }

    /// `exiftool` invocation that writes the tags while copying to the destination.
    pub fn exiftool_command(&self, program: &OsStr) -> Result<ToolCommand> {
        let taken = format_exif_timestamp(&self.captured_at)?;

        let mut cmd = ToolCommand::new(program)
            .arg(format!("-DateTimeOriginal={taken}"))
            .arg(format!("-DateTimeDigitized={taken}"));

        if !self.description.is_empty() {
            cmd = cmd.arg(format!("-ImageDescription={}", self.description));
        }

        // Hemisphere is always recorded as West.
        if let Some(gps) = self.gps {
            cmd = cmd
                .arg(format!("-GPSLatitude={}", gps.latitude))
                .arg("-GPSLongitudeRef=W")
                .arg(format!("-GPSLongitude={}", gps.longitude));
        }

        Ok(cmd.arg("-o").arg(&self.destination).arg(&self.source))
    }

    /// `SetFile` invocation stamping creation and modification dates on the copy.
    pub fn setfile_command(&self, program: &OsStr) -> Result<ToolCommand> {
        let stamp = format_setfile_timestamp(&self.captured_at)?;

        Ok(ToolCommand::new(program)
            .arg("-d")
            .arg(&stamp)
            .arg("-m")
            .arg(&stamp)
            .arg(&self.destination))
    }
}

/// Create this run's output directory under `output_root`.
///
/// Named after `started_at`; if that name is taken, `_2`, `_3`, ... is appended.
pub fn create_run_dir(output_root: &Path, started_at: &OffsetDateTime) -> Result<PathBuf> {
    let stamp = run_dir_name(started_at)?;
    let mut candidate = output_root.join(&stamp);
    let mut attempt = 1;

    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                attempt += 1;
                candidate = output_root.join(format!("{stamp}_{attempt}"));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Tags and copies media records into a run directory, one at a time.
pub struct Exporter<'a, R: CommandRunner> {
    runner: R,
    tools: Tools,
    run_dir: PathBuf,
    run_log: &'a RunLog,
}

impl<'a, R: CommandRunner> Exporter<'a, R> {
    pub fn new(runner: R, tools: Tools, run_dir: PathBuf, run_log: &'a RunLog) -> Self {
        Exporter {
            runner,
            tools,
            run_dir,
            run_log,
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Export every record in order, stopping at the first failure.
    ///
    /// Files written before a failure are left in place.
    pub fn export_all(&mut self, records: &[MediaRecord]) -> Result<Vec<PathBuf>> {
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(records.len() as u64).with_style(bar_style);
        bar.set_message("Tagging items");

        let mut exported = Vec::with_capacity(records.len());
        for record in records {
            match self.export_item(record) {
                Ok(destination) => {
                    exported.push(destination);
                    bar.inc(1);
                }
                Err(e) => {
                    bar.abandon_with_message("Export failed");
                    return Err(e);
                }
            }
        }

        bar.finish_with_message("Export complete");
        Ok(exported)
    }

    /// Copy one record to the run directory with its metadata rewritten.
    pub fn export_item(&mut self, record: &MediaRecord) -> Result<PathBuf> {
        let plan = TagPlan::new(record, &self.run_dir)?;

        let exiftool = plan.exiftool_command(&self.tools.exiftool)?;
        self.invoke(&exiftool)?;

        let setfile = plan.setfile_command(&self.tools.setfile)?;
        self.invoke(&setfile)?;

        Ok(plan.destination)
    }

    fn invoke(&mut self, command: &ToolCommand) -> Result<()> {
        log::info!(logger: self.run_log, "{command}");

        let output = self.runner.run(command)?;
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            log::info!(logger: self.run_log, "STDERR = {stderr}");
        }

        if !output.success {
            return Err(IgtagError::CommandFailed {
                program: command.program_name(),
                code: output.code,
                stderr: stderr.to_string(),
            });
        }

        Ok(())
    }
}
