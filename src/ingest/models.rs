/// outcome of one ingestion batch. Every stored record shares `item_id`;
/// `failed` holds the paths that could not be read or written, which never
/// stop sibling files from landing
#[derive(Debug, PartialEq, Clone)]
pub struct BatchResult {
    pub item_id: String,
    /// database ids of the records that were stored
    pub succeeded: Vec<u32>,
    /// display paths of the files that were skipped
    pub failed: Vec<String>,
}
