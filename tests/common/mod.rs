use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Stand-in for exiftool: records its arguments, copies `-o <dest> <src>`.
/// Exits with `$FAKE_EXIFTOOL_EXIT` instead when that is set.
const FAKE_EXIFTOOL: &str = r#"#!/bin/sh
{ echo "exiftool"; for arg in "$@"; do printf '  %s\n' "$arg"; done; } >> '@CALLS@'
if [ -n "$FAKE_EXIFTOOL_EXIT" ]; then
  echo "Error: simulated failure" >&2
  exit "$FAKE_EXIFTOOL_EXIT"
fi
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then cp "$3" "$2" || exit 1; break; fi
  shift
done
echo "Warning: [minor] fake exiftool" >&2
exit 0
"#;

/// Stand-in for SetFile: records its arguments, fails if the target is missing.
const FAKE_SETFILE: &str = r#"#!/bin/sh
{ echo "SetFile"; for arg in "$@"; do printf '  %s\n' "$arg"; done; } >> '@CALLS@'
for last; do :; done
[ -f "$last" ] || { echo "ERROR: file not found: $last" >&2; exit 9; }
exit 0
"#;

/// One recorded run of a fake tool.
#[derive(Debug)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Value following `flag`, e.g. the destination after `-o`.
    pub fn value_after(&self, flag: &str) -> Option<&str> {
        let index = self.args.iter().position(|a| a == flag)?;
        self.args.get(index + 1).map(String::as_str)
    }
}

/// A temporary archive root, export root, and fake tools.
pub struct Fixture {
    pub temp: TempDir,
    pub source: ChildPath,
    pub output: ChildPath,
    calls: PathBuf,
    exiftool: PathBuf,
    setfile: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.child("instagram-archive");
        let output = temp.child("export");
        source.create_dir_all().unwrap();
        output.create_dir_all().unwrap();

        let calls = temp.path().join("calls.txt");
        let exiftool = write_script(&temp, "fake-exiftool", FAKE_EXIFTOOL, &calls);
        let setfile = write_script(&temp, "fake-setfile", FAKE_SETFILE, &calls);

        Fixture {
            temp,
            source,
            output,
            calls,
            exiftool,
            setfile,
        }
    }

    /// Write a file under the archive root.
    pub fn archive_file(&self, relative: &str, contents: &str) {
        self.source.child(relative).write_str(contents).unwrap();
    }

    /// The igtag binary pointed at this fixture, run from the temp root.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("igtag").unwrap();
        cmd.current_dir(self.temp.path())
            .env("IGTAG_EXIFTOOL", &self.exiftool)
            .env("IGTAG_SETFILE", &self.setfile)
            .env_remove("FAKE_EXIFTOOL_EXIT")
            .arg("--source")
            .arg(self.source.path())
            .arg("--output")
            .arg(self.output.path());
        cmd
    }

    /// Every fake tool run so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        let Ok(contents) = fs::read_to_string(&self.calls) else {
            return Vec::new();
        };

        let mut invocations: Vec<Invocation> = Vec::new();
        for line in contents.lines() {
            match line.strip_prefix("  ") {
                Some(arg) => invocations
                    .last_mut()
                    .expect("argument before program")
                    .args
                    .push(arg.to_string()),
                None => invocations.push(Invocation {
                    program: line.to_string(),
                    args: Vec::new(),
                }),
            }
        }
        invocations
    }

    /// Run directories created under the export root, sorted by name.
    pub fn run_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(self.output.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    pub fn log_contents(&self) -> String {
        fs::read_to_string(self.temp.path().join("igtag.log")).unwrap_or_default()
    }
}

/// Every file directly inside `dir`.
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

pub fn media_json(uri: &str, timestamp: i64, title: &str) -> String {
    format!(r#"{{"uri": "{uri}", "creation_timestamp": {timestamp}, "title": "{title}"}}"#)
}

fn write_script(temp: &TempDir, name: &str, template: &str, calls: &Path) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, template.replace("@CALLS@", &calls.to_string_lossy())).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
