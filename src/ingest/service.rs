use std::backtrace::Backtrace;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::events::PROJECT_DATA_CHANGED;
use crate::ingest::colors;
use crate::ingest::models::BatchResult;
use crate::model::error::ingest_errors::IngestError;
use crate::model::repository::{FileRecord, ItemStatus, Rgb};
use crate::repository::{file_record_repository, open_connection};
use crate::util::lock_or_recover;
use crate::CatalogContext;

/// extensions picked up by a recursive folder walk
const IMAGE_EXTENSIONS: [&str; 14] = [
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "raw", "heif", "heic", "ico",
    "psd",
];
const VIDEO_EXTENSIONS: [&str; 13] = [
    "mp4", "avi", "mov", "wmv", "flv", "webm", "mkv", "m4v", "3gp", "mpg", "mpeg", "ts", "mts",
];

/// Allocates the next operation id: max over the parseable live item ids plus
/// one, zero-padded to 4 digits. Unparseable stored values are ignored rather
/// than treated as errors. Values past 9999 simply widen instead of wrapping,
/// since a wraparound could collide with a live id.
pub fn next_item_id(con: &Connection) -> Result<String, rusqlite::Error> {
    let ids = file_record_repository::get_live_item_ids(con)?;
    let max = ids
        .iter()
        .filter_map(|id| id.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    Ok(format!("{:04}", max + 1))
}

/// ingests one file as its own batch
pub fn ingest_file(context: &CatalogContext, path: &Path) -> Result<BatchResult, IngestError> {
    ingest_files(context, &[path.to_path_buf()])
}

/// Ingests the passed files as one batch: a single operation id and a single
/// color triple set shared by every record, one change event for the whole
/// batch. A file that can't be read or stored is reported in the result and
/// never stops its siblings.
pub fn ingest_files(context: &CatalogContext, paths: &[PathBuf]) -> Result<BatchResult, IngestError> {
    // held across read-max and the inserts so racing batches can't allocate the same id
    let allocation = lock_or_recover(&context.allocation_lock);
    let con = open_connection();
    let item_id = match next_item_id(&con) {
        Ok(id) => id,
        Err(e) => {
            log::error!(
                "Failed to allocate an operation id! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(IngestError::DbError);
        }
    };
    let year_color = colors::allocate();
    let month_color = colors::allocate();
    let day_color = colors::allocate();
    // one timestamp for the whole batch, so a batch can never span date buckets
    let now = chrono::offset::Local::now().naive_local();

    let mut result = BatchResult {
        item_id: item_id.clone(),
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    let mut records: Vec<FileRecord> = Vec::new();
    let mut record_paths: Vec<&PathBuf> = Vec::new();
    for path in paths {
        match build_record(path, &item_id, year_color, month_color, day_color, now) {
            Some(record) => {
                records.push(record);
                record_paths.push(path);
            }
            None => result.failed.push(path.display().to_string()),
        }
    }
    for (outcome, path) in file_record_repository::insert_many(&records, &con)
        .into_iter()
        .zip(record_paths)
    {
        match outcome {
            Ok(id) => result.succeeded.push(id),
            Err(e) => {
                log::error!(
                    "Failed to store record for {}! Error is {e:?}\n{}",
                    path.display(),
                    Backtrace::force_capture()
                );
                result.failed.push(path.display().to_string());
            }
        }
    }
    con.close().unwrap();
    drop(allocation);

    if !result.succeeded.is_empty() {
        context.index.invalidate();
        context.bus.publish(PROJECT_DATA_CHANGED);
        log::info!(
            "Ingested {} files as item {item_id} ({} skipped)",
            result.succeeded.len(),
            result.failed.len()
        );
    }
    Ok(result)
}

/// recursively ingests every supported media file under the folder as one batch
pub fn ingest_folder(context: &CatalogContext, dir: &Path) -> Result<BatchResult, IngestError> {
    ingest_folders(context, &[dir.to_path_buf()])
}

/// Recursively ingests every supported media file under all the passed
/// folders. The whole call is one batch: a single operation id across every
/// folder, not one per folder.
pub fn ingest_folders(context: &CatalogContext, dirs: &[PathBuf]) -> Result<BatchResult, IngestError> {
    let mut matched: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                matched.push(entry.into_path());
            }
        }
    }
    ingest_files(context, &matched)
}

fn has_supported_extension(path: &Path) -> bool {
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return false,
    };
    IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Builds a draft record for the file. Placement comes from the batch
/// timestamp, never from filesystem dates. `None` means the file is not
/// readable and should be counted as failed.
fn build_record(
    path: &Path,
    item_id: &str,
    year_color: Rgb,
    month_color: Rgb,
    day_color: Rgb,
    now: NaiveDateTime,
) -> Option<FileRecord> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!("Could not read {}: {e:?}", path.display());
            return None;
        }
    };
    if !metadata.is_file() {
        log::warn!("Skipping {}, not a regular file", path.display());
        return None;
    }
    let filename = path.file_stem()?.to_string_lossy().to_string();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    Some(FileRecord {
        id: None,
        item_id: item_id.to_string(),
        year: now.format("%Y").to_string(),
        month: now.format("%B").to_string(),
        day: now.format("%d").to_string(),
        filename,
        extension,
        filepath: path.display().to_string(),
        filesize: metadata.len(),
        title: None,
        description: None,
        tags: None,
        title_length: None,
        tags_count: None,
        status: ItemStatus::Draft,
        created_at: now,
        updated_at: now,
        deleted_at: None,
        year_color,
        month_color,
        day_color,
    })
}
