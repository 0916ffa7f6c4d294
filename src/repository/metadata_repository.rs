use rusqlite::Connection;

/// the schema version the database was created with
pub fn get_version(con: &Connection) -> Result<String, rusqlite::Error> {
    get_value("version", con)
}

pub fn get_value(name: &str, con: &Connection) -> Result<String, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/metadata/get_value.sql"))?;
    pst.query_row(rusqlite::params![name], |row| row.get(0))
}

pub fn set_value(name: &str, value: &str, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/metadata/set_value.sql"))?;
    pst.execute(rusqlite::params![name, value])?;
    Ok(())
}
