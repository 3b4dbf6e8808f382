use thiserror::Error;

/// Errors raised when starting a worker thread.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
