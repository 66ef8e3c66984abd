use crate::igtag_core::error::{IgtagError, Result};
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use time_tz::timezones::db::america::NEW_YORK;
use time_tz::{OffsetDateTimeExt, Tz};

/// Value format for the EXIF date tags, e.g. `2023-11-14T17:13:20-0500`.
pub const EXIF_TIMESTAMP_FORMAT: &[FormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

/// Date format accepted by `SetFile -d/-m`, e.g. `11/14/23 05:13:20 PM`.
pub const SETFILE_TIMESTAMP_FORMAT: &[FormatItem] = format_description!(
    "[month]/[day]/[year repr:last_two] [hour repr:12]:[minute]:[second] [period]"
);

/// Name of the per-run output directory, e.g. `20231114_171320`.
pub const RUN_DIR_FORMAT: &[FormatItem] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Capture times are always re-expressed in this zone, wherever the photo was taken.
pub fn capture_timezone() -> &'static Tz {
    NEW_YORK
}

/// Convert an archive `creation_timestamp` to a zoned capture time.
pub fn capture_time(epoch_seconds: i64) -> Result<OffsetDateTime> {
    let utc = OffsetDateTime::from_unix_timestamp(epoch_seconds).map_err(|source| {
        IgtagError::InvalidTimestamp {
            value: epoch_seconds,
            source,
        }
    })?;
    Ok(utc.to_timezone(capture_timezone()))
}

pub fn format_exif_timestamp(timestamp: &OffsetDateTime) -> Result<String> {
    Ok(timestamp.format(EXIF_TIMESTAMP_FORMAT)?)
}

pub fn format_setfile_timestamp(timestamp: &OffsetDateTime) -> Result<String> {
    Ok(timestamp.format(SETFILE_TIMESTAMP_FORMAT)?)
}

pub fn run_dir_name(started_at: &OffsetDateTime) -> Result<String> {
    Ok(started_at.format(RUN_DIR_FORMAT)?)
}

/// Current local time, falling back to UTC if the local offset is unavailable.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
