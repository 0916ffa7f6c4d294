pub mod ai_errors;
pub mod explorer_errors;
pub mod ingest_errors;
pub mod pipeline_errors;
pub mod record_errors;
