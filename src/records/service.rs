use std::backtrace::Backtrace;

use crate::events::PROJECT_DATA_CHANGED;
use crate::model::error::record_errors::{DeleteRecordError, GetRecordError, UpdateRecordError};
use crate::model::repository::{FileRecord, ItemStatus};
use crate::pipeline::parser::ParsedMetadata;
use crate::repository::{file_record_repository, open_connection};
use crate::CatalogContext;

/// retrieves one record by database id. Soft-deleted records are still
/// returned here, since the row is kept for audit
pub fn get_record(id: u32) -> Result<FileRecord, GetRecordError> {
    let con = open_connection();
    let record = match file_record_repository::get_file_record(id, &con) {
        Ok(record) => record,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            log::error!(
                "No record with id {id} exists!\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(GetRecordError::NotFound);
        }
        Err(e) => {
            log::error!(
                "Could not retrieve record with id {id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(GetRecordError::DbError);
        }
    };
    con.close().unwrap();
    Ok(record)
}

/// every live record in the batch, ordered by filename
pub fn get_batch(item_id: &str) -> Result<Vec<FileRecord>, GetRecordError> {
    let con = open_connection();
    let records = match file_record_repository::get_by_item_id(item_id, &con) {
        Ok(records) => records,
        Err(e) => {
            log::error!(
                "Could not retrieve records for item {item_id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(GetRecordError::DbError);
        }
    };
    con.close().unwrap();
    Ok(records)
}

/// every live record, optionally narrowed to one status
pub fn get_all(status: Option<ItemStatus>) -> Result<Vec<FileRecord>, GetRecordError> {
    let con = open_connection();
    let records = match file_record_repository::get_all_records(status, &con) {
        Ok(records) => records,
        Err(e) => {
            log::error!(
                "Could not retrieve records! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(GetRecordError::DbError);
        }
    };
    con.close().unwrap();
    Ok(records)
}

/// Moves the record to the passed lifecycle state, then invalidates the
/// explorer cache and publishes the change. Terminal states are sticky only by
/// convention; a retry is simply a fresh `Generating` transition.
pub fn set_status(
    context: &CatalogContext,
    id: u32,
    status: ItemStatus,
) -> Result<(), UpdateRecordError> {
    let con = open_connection();
    let now = chrono::offset::Local::now().naive_local();
    match file_record_repository::update_status(id, status, now, &con) {
        Ok(true) => {}
        Ok(false) => {
            log::error!(
                "Could not set status on record {id}, because it does not exist!\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(UpdateRecordError::NotFound);
        }
        Err(e) => {
            log::error!(
                "Could not set status on record {id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(UpdateRecordError::DbError);
        }
    };
    con.close().unwrap();
    log::debug!("Record {id} moved to status {}", status.as_str());
    context.index.invalidate();
    context.bus.publish(PROJECT_DATA_CHANGED);
    Ok(())
}

/// Writes parsed AI metadata onto the record. Fields absent from the parse are
/// left untouched, never blanked. A parse with nothing recognized is a no-op.
pub fn apply_ai_metadata(
    context: &CatalogContext,
    id: u32,
    parsed: &ParsedMetadata,
) -> Result<(), UpdateRecordError> {
    if parsed.is_empty() {
        log::debug!("No recognized metadata for record {id}, nothing to update");
        return Ok(());
    }
    let con = open_connection();
    let now = chrono::offset::Local::now().naive_local();
    match file_record_repository::update_metadata(
        id,
        parsed.title.as_deref(),
        parsed.description.as_deref(),
        parsed.tags.as_deref(),
        parsed.title_length(),
        parsed.tags_count(),
        now,
        &con,
    ) {
        Ok(true) => {}
        Ok(false) => {
            log::error!(
                "Could not update metadata on record {id}, because it does not exist!\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(UpdateRecordError::NotFound);
        }
        Err(e) => {
            log::error!(
                "Could not update metadata on record {id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(UpdateRecordError::DbError);
        }
    };
    con.close().unwrap();
    context.index.invalidate();
    context.bus.publish(PROJECT_DATA_CHANGED);
    Ok(())
}

/// Soft-deletes the record: the row is stamped `deleted_at` and disappears
/// from every listing, but is never physically removed.
pub fn soft_delete(context: &CatalogContext, id: u32) -> Result<(), DeleteRecordError> {
    let con = open_connection();
    let now = chrono::offset::Local::now().naive_local();
    match file_record_repository::soft_delete_record(id, now, &con) {
        Ok(true) => {}
        Ok(false) => {
            log::error!(
                "Could not delete record {id}, because it does not exist or is already deleted!\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(DeleteRecordError::NotFound);
        }
        Err(e) => {
            log::error!(
                "Could not delete record {id}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            con.close().unwrap();
            return Err(DeleteRecordError::DbError);
        }
    };
    con.close().unwrap();
    context.index.invalidate();
    context.bus.publish(PROJECT_DATA_CHANGED);
    Ok(())
}
