use std::fs;
use std::fs::{remove_dir_all, remove_file};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::model::repository::{FileRecord, ItemStatus, Rgb};
use crate::repository::{file_record_repository, initialize_db, open_connection};

#[cfg(test)]
pub fn refresh_db() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    initialize_db().unwrap();
}

#[cfg(test)]
pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

/// per-thread scratch directory for tests that need real files on disk
#[cfg(test)]
pub fn test_dir() -> String {
    format!("{}_files", current_thread_name())
}

#[cfg(test)]
pub fn create_file_disk(file_name: &str, contents: &str) -> String {
    fs::create_dir_all(Path::new(test_dir().as_str())).unwrap_or(());
    let path = format!("{}/{file_name}", test_dir());
    fs::write(Path::new(path.as_str()), contents).unwrap();
    path
}

#[cfg(test)]
pub fn create_folder_disk(folder_name: &str) -> String {
    let path = format!("{}/{folder_name}", test_dir());
    fs::create_dir_all(Path::new(path.as_str())).unwrap();
    path
}

#[cfg(test)]
pub fn test_datetime() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// a draft record for `item_id` placed under 2024 / March / 05
#[cfg(test)]
pub fn test_record(item_id: &str, filename: &str) -> FileRecord {
    FileRecord {
        id: None,
        item_id: String::from(item_id),
        year: String::from("2024"),
        month: String::from("March"),
        day: String::from("05"),
        filename: String::from(filename),
        extension: String::from("jpg"),
        filepath: format!("{}/{filename}.jpg", test_dir()),
        filesize: 128,
        title: None,
        description: None,
        tags: None,
        title_length: None,
        tags_count: None,
        status: ItemStatus::Draft,
        created_at: test_datetime(),
        updated_at: test_datetime(),
        deleted_at: None,
        year_color: Rgb(170, 60, 0),
        month_color: Rgb(0, 170, 60),
        day_color: Rgb(120, 0, 170),
    }
}

/// inserts a draft record and returns its row id
#[cfg(test)]
pub fn create_record_db_entry(item_id: &str, filename: &str) -> u32 {
    let record = test_record(item_id, filename);
    let con = open_connection();
    let id = file_record_repository::create_file_record(&record, &con).unwrap();
    con.close().unwrap();
    id
}

#[cfg(test)]
pub fn cleanup() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    remove_dir_all(Path::new(test_dir().as_str())).unwrap_or(());
}
