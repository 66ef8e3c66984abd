use crate::igtag_core::error::{IgtagError, Result};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Environment variable overriding the `exiftool` program.
pub const EXIFTOOL_ENV: &str = "IGTAG_EXIFTOOL";

/// Environment variable overriding the `SetFile` program.
pub const SETFILE_ENV: &str = "IGTAG_SETFILE";

/// Locations of the external programs used while exporting.
#[derive(Debug, Clone)]
pub struct Tools {
    pub exiftool: OsString,
    pub setfile: OsString,
}

impl Tools {
    /// Default program names, overridden by `IGTAG_EXIFTOOL` / `IGTAG_SETFILE`.
    pub fn from_env() -> Self {
        let defaults = Tools::default();
        Tools {
            exiftool: env::var_os(EXIFTOOL_ENV).unwrap_or(defaults.exiftool),
            setfile: env::var_os(SETFILE_ENV).unwrap_or(defaults.setfile),
        }
    }
}

impl Default for Tools {
    fn default() -> Self {
        Tools {
            exiftool: "exiftool".into(),
            setfile: "SetFile".into(),
        }
    }
}

/// A program plus its discrete arguments. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Short program name for messages, e.g. `exiftool` for `/usr/bin/exiftool`.
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

/// Renders the command as a line that can be pasted into a POSIX shell.
impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in std::iter::once(&self.program).chain(&self.args).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let text = word.to_string_lossy();
            // Fails only on a nul byte.
            match shlex::try_quote(&text) {
                Ok(quoted) => f.write_str(&quoted)?,
                Err(_) => f.write_str(&text)?,
            }
        }
        Ok(())
    }
}

/// What a finished external command reported.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

/// Runs external commands to completion.
pub trait CommandRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput> {
        (**self).run(command)
    }
}

/// Spawns real processes, blocking until each exits. Stdout is discarded.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput> {
        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| IgtagError::Spawn {
                program: command.program_name(),
                source,
            })?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
