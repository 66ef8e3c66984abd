use crate::igtag_core::error::IgtagError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tag an Instagram archive with metadata and export the media")]
pub struct Cli {
    /// Instagram archive root
    #[arg(short, long, value_parser = existing_dir)]
    pub source: PathBuf,

    /// Export directory
    #[arg(short, long, value_parser = existing_dir)]
    pub output: PathBuf,
}

/// Accept only paths that already exist and are directories.
pub fn existing_dir(value: &str) -> Result<PathBuf, IgtagError> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(IgtagError::PathNotFound(path));
    }
    if !path.is_dir() {
        return Err(IgtagError::NotADirectory(path));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_and_long_options() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("archive");
        let output = temp.child("export");
        source.create_dir_all().unwrap();
        output.create_dir_all().unwrap();

        let cli = Cli::try_parse_from([
            "igtag",
            "-s",
            source.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(cli.source, source.path());
        assert_eq!(cli.output, output.path());
    }

    #[test]
    fn test_both_options_required() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Cli::try_parse_from(["igtag", "-s", temp.path().to_str().unwrap()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_existing_dir_rejects_missing_path() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.child("nope");
        let err = existing_dir(missing.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, IgtagError::PathNotFound(_)));
    }

    #[test]
    fn test_existing_dir_rejects_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("posts.json");
        file.write_str("[]").unwrap();
        let err = existing_dir(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, IgtagError::NotADirectory(_)));
    }
}
