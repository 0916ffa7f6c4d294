use std::sync::{Arc, Mutex};

pub mod ai;
pub mod config;
pub mod events;
pub mod explorer;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod records;
pub mod repository;
pub mod util;

#[cfg(test)]
pub mod test;

use events::EventBus;
use explorer::ProjectIndex;

/// Shared collaborators handed to every write path in place of process-wide
/// globals, so concurrent batches and tests stay deterministic.
pub struct CatalogContext {
    pub bus: Arc<EventBus>,
    pub index: Arc<ProjectIndex>,
    /// serializes operation id allocation so two racing batches can't both
    /// read the same max and hand out duplicate ids
    pub(crate) allocation_lock: Mutex<()>,
}

impl CatalogContext {
    pub fn new() -> Self {
        CatalogContext {
            bus: Arc::new(EventBus::new()),
            index: Arc::new(ProjectIndex::new()),
            allocation_lock: Mutex::new(()),
        }
    }
}

impl Default for CatalogContext {
    fn default() -> Self {
        Self::new()
    }
}

/// one-time process setup: schema, logging, and the once-per-year repaint of
/// records left over from previous calendar years
pub fn startup(context: &CatalogContext) -> Result<(), rusqlite::Error> {
    util::init_logging();
    repository::initialize_db()?;
    if explorer::service::recolor_stale_years(context).is_err() {
        log::warn!("Stale year recolor did not complete; explorer colors may be outdated");
    }
    Ok(())
}
