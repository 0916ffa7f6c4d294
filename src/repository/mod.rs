use std::path::Path;

#[cfg(not(test))]
use rusqlite::OpenFlags;
use rusqlite::{Connection, Result};

pub mod file_record_repository;
pub mod metadata_repository;

#[cfg(test)]
mod tests;

/// creates a new connection and returns it, but panics if the connection could not be created
#[cfg(not(test))]
pub fn open_connection() -> Connection {
    use crate::config::MEDIA_CATALOG_CONFIG;

    match Connection::open_with_flags(
        Path::new(MEDIA_CATALOG_CONFIG.clone().database.location.as_str()),
        OpenFlags::default(),
    ) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

#[cfg(test)]
pub fn open_connection() -> Connection {
    let db_name = format!("{}.sqlite", crate::test::current_thread_name());
    match Connection::open_with_flags(Path::new(db_name.as_str()), rusqlite::OpenFlags::default()) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

/// runs init.sql on the database
fn create_db(con: &mut Connection) {
    let sql = include_str!("../assets/init.sql");
    con.execute_batch(sql).unwrap();
}

/// pragmas every connection's database relies on. WAL keeps the explorer
/// readable while the generation worker writes
fn apply_pragmas(con: &Connection) -> Result<()> {
    con.pragma_update(None, "journal_mode", "WAL")?;
    con.pragma_update(None, "synchronous", "NORMAL")?;
    con.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// handles checking if the database exists and is up to the correct version.
/// If not, it creates the schema accordingly
pub fn initialize_db() -> Result<()> {
    let mut con = open_connection();
    apply_pragmas(&con)?;
    // version will be used once there is more than one version of the schema
    if metadata_repository::get_version(&con).is_err() {
        // tables haven't been created yet
        create_db(&mut con);
    }
    con.close().unwrap();
    Ok(())
}
