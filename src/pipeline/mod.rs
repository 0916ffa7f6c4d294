pub mod parser;
pub mod service;


pub use service::{PipelineEvent, PipelineHandle};
