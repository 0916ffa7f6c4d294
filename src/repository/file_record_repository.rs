use chrono::NaiveDateTime;
use rusqlite::{Connection, Row};

use crate::model::repository::{FileRecord, ItemStatus, Rgb};

/// colors used when a stored color string cannot be parsed back into a triple
pub(crate) const FALLBACK_YEAR_COLOR: Rgb = Rgb(60, 120, 216);
const FALLBACK_MONTH_COLOR: Rgb = Rgb(100, 100, 100);
const FALLBACK_DAY_COLOR: Rgb = Rgb(80, 80, 80);

/// inserts the passed record and returns its database id. The record's `id`
/// field is ignored
pub fn create_file_record(record: &FileRecord, con: &Connection) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/create_file_record.sql"
    ))?;
    let id = pst.insert(rusqlite::params![
        record.item_id,
        record.year,
        record.month,
        record.day,
        record.filename,
        record.extension,
        record.filepath,
        record.filesize,
        record.title,
        record.description,
        record.tags,
        record.title_length,
        record.tags_count,
        record.status.as_str(),
        record.created_at,
        record.updated_at,
        record.deleted_at,
        record.year_color.to_string(),
        record.month_color.to_string(),
        record.day_color.to_string(),
    ])? as u32;
    Ok(id)
}

/// Inserts every passed record, best-effort: one outcome per record, in
/// order, and a failed row never stops its siblings. Logging the failures is
/// the caller's job
pub fn insert_many(
    records: &[FileRecord],
    con: &Connection,
) -> Vec<Result<u32, rusqlite::Error>> {
    records
        .iter()
        .map(|record| create_file_record(record, con))
        .collect()
}

/// retrieves a record by database id, soft-deleted rows included so the audit
/// trail stays reachable
pub fn get_file_record(id: u32, con: &Connection) -> Result<FileRecord, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/project_files/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], file_record_mapper)
}

/// every live record in the batch with the passed operation id, ordered by filename
pub fn get_by_item_id(item_id: &str, con: &Connection) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/get_by_item_id.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![item_id], file_record_mapper)?;
    collect_records(rows)
}

/// every live record, optionally narrowed to one status
pub fn get_all_records(
    status: Option<ItemStatus>,
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    match status {
        Some(status) => {
            let mut pst = con.prepare(include_str!(
                "../assets/queries/project_files/get_all_by_status.sql"
            ))?;
            let rows = pst.query_map(rusqlite::params![status.as_str()], file_record_mapper)?;
            collect_records(rows)
        }
        None => {
            let mut pst =
                con.prepare(include_str!("../assets/queries/project_files/get_all.sql"))?;
            let rows = pst.query_map([], file_record_mapper)?;
            collect_records(rows)
        }
    }
}

/// the raw item_id column of every live record. Parsing and max-picking is the
/// allocator's job, since stored values are not guaranteed to be numeric
pub fn get_live_item_ids(con: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/get_live_item_ids.sql"
    ))?;
    let rows = pst.query_map([], |row| row.get::<_, String>(0))?;
    let mut ids: Vec<String> = Vec::new();
    for id in rows {
        ids.push(id?);
    }
    Ok(ids)
}

/// sets the record's status, stamping `updated_at`. Returns false if no row matched
pub fn update_status(
    id: u32,
    status: ItemStatus,
    updated_at: NaiveDateTime,
    con: &Connection,
) -> Result<bool, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/update_status.sql"
    ))?;
    let count = pst.execute(rusqlite::params![status.as_str(), updated_at, id])?;
    Ok(count > 0)
}

/// writes the AI-derived content fields. `None` fields are left untouched in
/// the row rather than overwritten with empty values
#[allow(clippy::too_many_arguments)]
pub fn update_metadata(
    id: u32,
    title: Option<&str>,
    description: Option<&str>,
    tags: Option<&str>,
    title_length: Option<u32>,
    tags_count: Option<u32>,
    updated_at: NaiveDateTime,
    con: &Connection,
) -> Result<bool, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/update_metadata.sql"
    ))?;
    let count = pst.execute(rusqlite::params![
        title,
        description,
        tags,
        title_length,
        tags_count,
        updated_at,
        id
    ])?;
    Ok(count > 0)
}

/// marks the record deleted without removing the row. Returns false if the
/// record does not exist or was already soft-deleted
pub fn soft_delete_record(
    id: u32,
    deleted_at: NaiveDateTime,
    con: &Connection,
) -> Result<bool, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/soft_delete.sql"
    ))?;
    let count = pst.execute(rusqlite::params![deleted_at, id])?;
    Ok(count > 0)
}

/// repaints every live record outside the passed calendar year with the passed
/// color. Returns how many rows changed
pub fn recolor_stale_years(
    current_year: &str,
    color: &Rgb,
    updated_at: NaiveDateTime,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/project_files/recolor_stale_years.sql"
    ))?;
    pst.execute(rusqlite::params![color.to_string(), updated_at, current_year])
}

fn collect_records(
    rows: impl Iterator<Item = Result<FileRecord, rusqlite::Error>>,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut records: Vec<FileRecord> = Vec::new();
    for record in rows {
        records.push(record?);
    }
    Ok(records)
}

fn file_record_mapper(row: &Row) -> Result<FileRecord, rusqlite::Error> {
    let status: String = row.get(14)?;
    Ok(FileRecord {
        id: row.get(0)?,
        item_id: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        day: row.get(4)?,
        filename: row.get(5)?,
        extension: row.get(6)?,
        filepath: row.get(7)?,
        filesize: row.get(8)?,
        title: row.get(9)?,
        description: row.get(10)?,
        tags: row.get(11)?,
        title_length: row.get(12)?,
        tags_count: row.get(13)?,
        status: ItemStatus::try_from(status.as_str()).unwrap_or(ItemStatus::Draft),
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
        deleted_at: row.get(17)?,
        year_color: color_column(row, 18, FALLBACK_YEAR_COLOR)?,
        month_color: color_column(row, 19, FALLBACK_MONTH_COLOR)?,
        day_color: color_column(row, 20, FALLBACK_DAY_COLOR)?,
    })
}

fn color_column(row: &Row, index: usize, fallback: Rgb) -> Result<Rgb, rusqlite::Error> {
    let raw: String = row.get(index)?;
    Ok(Rgb::parse(&raw).unwrap_or_else(|| {
        log::warn!("Failed to parse stored color {raw:?}, using default");
        fallback
    }))
}
