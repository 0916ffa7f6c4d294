#[derive(PartialEq, Debug)]
pub enum IngestError {
    /// the operation id could not be allocated; nothing was written
    DbError,
}
