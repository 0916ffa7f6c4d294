use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;

use crate::ai::{prompt, AiClient};
use crate::config::MEDIA_CATALOG_CONFIG;
use crate::model::error::pipeline_errors::StartPipelineError;
use crate::model::repository::{FileRecord, ItemStatus};
use crate::pipeline::parser::{self, ParsedMetadata};
use crate::records;
use crate::util::lock_or_recover;
use crate::CatalogContext;

/// the only file types forwarded to the model boundary; everything else is
/// skipped without a call
const AI_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Lifecycle signals emitted by the background worker, in order:
/// `Started`, then `ItemStarted`/`ItemFinished` pairs per file, then
/// `Finished`. The channel is the only boundary between the worker and any
/// observer thread; the worker never touches observer-owned state.
#[derive(Debug, PartialEq, Clone)]
pub enum PipelineEvent {
    Started,
    ItemStarted(usize),
    /// carries the raw model response (or skip/error text) for the file
    ItemFinished(usize, String),
    Finished,
}

/// Owner of the single background generation worker. At most one run may be
/// active at a time; a second start is refused with a warning rather than
/// queued.
pub struct PipelineHandle {
    running: Arc<AtomicBool>,
    should_stop: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PipelineHandle {
    pub fn new() -> Self {
        PipelineHandle {
            running: Arc::new(AtomicBool::new(false)),
            should_stop: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts a background run over every live file in the batch. The client
    /// must already be constructed; building it is where missing credentials
    /// abort the run before any file is touched.
    pub fn start(
        &self,
        context: Arc<CatalogContext>,
        client: Arc<dyn AiClient>,
        item_id: String,
        events: Sender<PipelineEvent>,
    ) -> Result<(), StartPipelineError> {
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("A generation run is already active, ignoring start for item {item_id}");
            return Err(StartPipelineError::AlreadyRunning);
        }
        self.should_stop.store(false, Ordering::SeqCst);
        let running = self.running.clone();
        let should_stop = self.should_stop.clone();
        // the worker keeps the spawning thread's name so its log lines and
        // connections correlate with the run that started it
        let name = std::thread::current()
            .name()
            .unwrap_or("generation-worker")
            .to_string();
        let spawned = std::thread::Builder::new().name(name).spawn(move || {
            run_batch(&context, client.as_ref(), &item_id, &events, &should_stop);
            running.store(false, Ordering::SeqCst);
        });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                log::error!(
                    "Failed to spawn the generation worker! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                self.running.store(false, Ordering::SeqCst);
                return Err(StartPipelineError::WorkerSpawnFailed);
            }
        };
        *lock_or_recover(&self.worker) = Some(handle);
        Ok(())
    }

    /// Cooperative cancellation: the flag is checked between files, so the
    /// file in flight still completes normally and later files keep whatever
    /// status they had.
    pub fn stop(&self) {
        log::debug!("Stop requested for the generation run");
        self.should_stop.store(true, Ordering::SeqCst);
    }

    /// blocks until the current run's worker exits; a no-op when idle
    pub fn wait(&self) {
        if let Some(handle) = lock_or_recover(&self.worker).take() {
            if handle.join().is_err() {
                log::error!("The generation worker panicked");
            }
        }
    }
}

impl Default for PipelineHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn run_batch(
    context: &CatalogContext,
    client: &dyn AiClient,
    item_id: &str,
    events: &Sender<PipelineEvent>,
    should_stop: &AtomicBool,
) {
    let records = match records::service::get_batch(item_id) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Could not load batch {item_id} for generation: {e:?}");
            let _ = events.send(PipelineEvent::Finished);
            return;
        }
    };
    log::info!("Starting generation for item {item_id} ({} files)", records.len());
    let _ = events.send(PipelineEvent::Started);

    let config = MEDIA_CATALOG_CONFIG.clone();
    let model = config.ai.model.clone();
    let prompt = prompt::build_final_prompt(&config);

    for (index, record) in records.iter().enumerate() {
        if should_stop.load(Ordering::SeqCst) {
            log::debug!("Generation cancelled before file {index}");
            break;
        }
        let record_id = match record.id {
            Some(id) => id,
            None => continue,
        };
        let _ = events.send(PipelineEvent::ItemStarted(index));
        if let Err(e) = records::service::set_status(context, record_id, ItemStatus::Generating) {
            log::error!("Could not mark record {record_id} as generating: {e:?}");
        }

        let result = process_file(client, &model, &prompt, record);

        if result.starts_with("Error:") {
            if let Err(e) = records::service::set_status(context, record_id, ItemStatus::Failed) {
                log::error!("Could not mark record {record_id} as failed: {e:?}");
            }
        } else {
            // parse failure still finishes the file; enrichment is best-effort
            if let Some(parsed) = parser::parse_ai_result(&result) {
                if let Err(e) = records::service::apply_ai_metadata(context, record_id, &parsed) {
                    log::error!("Could not store metadata for record {record_id}: {e:?}");
                }
                write_metadata_to_file(record, &parsed);
            }
            if let Err(e) = records::service::set_status(context, record_id, ItemStatus::Finished) {
                log::error!("Could not mark record {record_id} as finished: {e:?}");
            }
        }
        let _ = events.send(PipelineEvent::ItemFinished(index, result));
        // brief yield so observers can catch up before the next file
        std::thread::sleep(Duration::from_millis(100));
    }
    log::info!("Generation for item {item_id} completed");
    let _ = events.send(PipelineEvent::Finished);
}

/// Runs one file through the model boundary, strictly sequential with its
/// siblings. Returns the raw response text; skip and error outcomes are
/// encoded in the text the way the status logic expects.
fn process_file(client: &dyn AiClient, model: &str, prompt: &str, record: &FileRecord) -> String {
    let extension = record.extension.to_lowercase();
    if !AI_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return format!("Skipped: Not an image file ({extension})");
    }
    if !Path::new(&record.filepath).exists() {
        return format!("File not found: {}", record.filepath);
    }
    let image_bytes = match std::fs::read(&record.filepath) {
        Ok(bytes) => bytes,
        Err(e) => return format!("Error: {e}"),
    };
    let mime_type = mime_type_for(&extension);
    match client.generate(model, prompt, &image_bytes, mime_type) {
        Ok(text) => text,
        Err(crate::model::error::ai_errors::AiError::RequestFailed(message)) => {
            format!("Error: {message}")
        }
    }
}

fn mime_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Best-effort write of the generated description into the file's own embedded
/// metadata. Failure here is logged and never changes the record's status.
fn write_metadata_to_file(record: &FileRecord, parsed: &ParsedMetadata) {
    // embedded write only supported for the formats little_exif can rewrite
    if !matches!(record.extension.as_str(), "jpg" | "jpeg" | "png" | "tiff" | "tif" | "webp") {
        return;
    }
    let description = match parsed.description.as_ref().or(parsed.title.as_ref()) {
        Some(description) => description.clone(),
        None => return,
    };
    let path = Path::new(&record.filepath);
    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::ImageDescription(description));
    // the write is wrapped because the exif writer is known to panic on some inputs
    let write_result = catch_unwind(AssertUnwindSafe(|| metadata.write_to_file(path)));
    match write_result {
        Ok(Ok(())) => log::debug!("Wrote metadata back to {}", record.filepath),
        Ok(Err(e)) => log::warn!("Failed to write metadata to {}: {e:?}", record.filepath),
        Err(_) => log::warn!(
            "Recovered from a metadata writer panic for {}",
            record.filepath
        ),
    }
}
