pub mod models;
pub mod service;


// make it easier to just use the tree types
pub use models::*;
pub use service::ProjectIndex;
