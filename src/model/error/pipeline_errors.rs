#[derive(PartialEq, Debug)]
pub enum StartPipelineError {
    /// only one generation run may be active at a time
    AlreadyRunning,
    /// the OS refused to spawn the worker thread
    WorkerSpawnFailed,
}
