use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

/// sets up the global fern logger. Safe to call more than once; repeat calls
/// are ignored
pub fn init_logging() {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout());
    if dispatch.apply().is_err() {
        log::debug!("Logger was already initialized");
    }
}

/// locks the passed mutex, recovering the guard if a previous holder panicked
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("A mutex was poisoned! Recovering...");
            mutex.clear_poison();
            poisoned.into_inner()
        }
    }
}
