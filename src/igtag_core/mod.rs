pub mod archive;
pub mod cli;
pub mod dates;
pub mod error;
pub mod export;
pub mod logging;
pub mod media;
pub mod tools;

pub use archive::collect_media;
pub use cli::Cli;
pub use error::{IgtagError, Result};
pub use export::{Exporter, TagPlan, create_run_dir};
pub use logging::{LOG_FILE_NAME, RunLog};
pub use media::{GpsCoordinates, MediaRecord};
pub use tools::{CommandRunner, SystemRunner, ToolCommand, ToolOutput, Tools};
