use crate::igtag_core::error::{IgtagError, Result};
use crate::igtag_core::logging::RunLog;
use crate::igtag_core::media::MediaRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Subdirectory of the archive root holding the JSON metadata.
const CONTENT_DIR: &str = "content";

const POSTS_FILE: &str = "posts_1.json";
const PROFILE_PHOTOS_FILE: &str = "profile_photos.json";
const STORIES_FILE: &str = "stories.json";

#[derive(Deserialize)]
struct Post {
    media: Vec<MediaRecord>,
}

#[derive(Deserialize)]
struct ProfilePhotos {
    ig_profile_picture: Vec<MediaRecord>,
}

#[derive(Deserialize)]
struct Stories {
    ig_stories: Vec<MediaRecord>,
}

/// Collect every media record from the archive at `source`.
///
/// Records come from posts, then profile photos, then stories. Missing files
/// contribute nothing; a file that is present but malformed is an error.
/// Each `uri` is rewritten to be prefixed with `source`.
pub fn collect_media(source: &Path, run_log: &RunLog) -> Result<Vec<MediaRecord>> {
    let content = source.join(CONTENT_DIR);
    let mut media = Vec::new();

    if let Some(posts) = read_archive_file::<Vec<Post>>(&content.join(POSTS_FILE), run_log)? {
        let records: Vec<MediaRecord> = posts.into_iter().flat_map(|post| post.media).collect();
        log::info!(logger: run_log, "{}: {} item(s)", POSTS_FILE, records.len());
        media.extend(records);
    }

    if let Some(photos) =
        read_archive_file::<ProfilePhotos>(&content.join(PROFILE_PHOTOS_FILE), run_log)?
    {
        log::info!(
            logger: run_log,
            "{}: {} item(s)",
            PROFILE_PHOTOS_FILE,
            photos.ig_profile_picture.len()
        );
        media.extend(photos.ig_profile_picture);
    }

    if let Some(stories) = read_archive_file::<Stories>(&content.join(STORIES_FILE), run_log)? {
        log::info!(logger: run_log, "{}: {} item(s)", STORIES_FILE, stories.ig_stories.len());
        media.extend(stories.ig_stories);
    }

    for record in &mut media {
        record.uri = source.join(&record.uri);
    }

    Ok(media)
}

fn read_archive_file<T: DeserializeOwned>(path: &Path, run_log: &RunLog) -> Result<Option<T>> {
    if !path.exists() {
        log::debug!(logger: run_log, "Skipping missing {}", path.display());
        return Ok(None);
    }

    let bytes = fs::read(path)?;
    let parsed = serde_json::from_slice(&bytes).map_err(|source| IgtagError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(parsed))
}
