#[derive(PartialEq, Debug)]
pub enum GetTreeError {
    DbError,
}

#[derive(PartialEq, Debug)]
pub enum RecolorError {
    DbError,
}
