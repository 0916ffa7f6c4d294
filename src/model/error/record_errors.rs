#[derive(PartialEq, Debug)]
pub enum GetRecordError {
    NotFound,
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum UpdateRecordError {
    /// record not found in the db
    NotFound,
    /// Generic database error
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum DeleteRecordError {
    // record reference not found, or already soft-deleted
    NotFound,
    DbError,
}
