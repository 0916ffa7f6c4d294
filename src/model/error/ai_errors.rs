#[derive(PartialEq, Debug)]
pub enum AiClientError {
    /// no credentials configured; a generation run cannot start at all
    MissingApiKey,
}

/// a failed call to the external model boundary. The message is surfaced to the
/// user as the file's result text
#[derive(PartialEq, Debug, Clone)]
pub enum AiError {
    RequestFailed(String),
}
