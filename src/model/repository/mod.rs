use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// an rgb triple used to paint hierarchy levels in the project explorer.
/// Persisted as a `[r, g, b]` string, matching what the explorer consumes
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// the muted gray applied to records from previous calendar years
    pub const STALE_YEAR: Rgb = Rgb(96, 96, 96);

    /// parses a `[r, g, b]` database string. `None` means the stored value was mangled
    pub fn parse(value: &str) -> Option<Rgb> {
        let trimmed = value.trim().strip_prefix('[')?.strip_suffix(']')?;
        let mut channels = trimmed.split(',').map(|c| c.trim().parse::<u8>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        if channels.next().is_some() {
            return None;
        }
        Some(Rgb(r, g, b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0, self.1, self.2)
    }
}

/// the per-file lifecycle state. `Finished` and `Failed` are terminal; a retry
/// is a fresh transition back through `Generating`
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ItemStatus {
    Draft,
    Generating,
    Finished,
    Failed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Draft => "draft",
            ItemStatus::Generating => "generating",
            ItemStatus::Finished => "finished",
            ItemStatus::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for ItemStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(ItemStatus::Draft),
            "generating" => Ok(ItemStatus::Generating),
            "finished" => Ok(ItemStatus::Finished),
            "failed" => Ok(ItemStatus::Failed),
            _ => Err(()),
        }
    }
}

/// one physical media file under management
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FileRecord {
    /// the id, will only be populated when pulled from the database
    pub id: Option<u32>,
    /// 4-digit operation id shared by every file ingested in the same user action
    pub item_id: String,
    /// 4-digit year string, taken from the import time rather than file metadata
    pub year: String,
    /// full month name, e.g. "March"
    pub month: String,
    /// zero-padded day of month
    pub day: String,
    /// the file name without its extension
    pub filename: String,
    /// lowercased extension without the dot
    pub extension: String,
    pub filepath: String,
    pub filesize: u64,
    /// populated by the generation pipeline, never at ingestion
    pub title: Option<String>,
    pub description: Option<String>,
    /// comma-joined tag list
    pub tags: Option<String>,
    pub title_length: Option<u32>,
    pub tags_count: Option<u32>,
    pub status: ItemStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// `Some` means the record is soft-deleted and hidden from every listing
    pub deleted_at: Option<NaiveDateTime>,
    /// shared by every record in the same year bucket of this batch
    pub year_color: Rgb,
    pub month_color: Rgb,
    pub day_color: Rgb,
}
