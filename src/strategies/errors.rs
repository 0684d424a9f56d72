use std::io;

use thiserror::Error;
use tokio::runtime::TryCurrentError;
use tokio::sync::AcquireError;
use tokio::task::JoinError;

/// Failure of the orchestration itself, as opposed to a single payment call.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch error: task aborted: {0}")]
    Aborted(#[from] JoinError),
    #[error("Dispatch error: admission gate closed")]
    GateClosed(#[from] AcquireError),
    #[error("Dispatch error: failed to spawn worker: {0}")]
    Spawn(#[from] io::Error),
    #[error("Dispatch error: worker pool no longer accepts payments")]
    PoolClosed,
    #[error("Dispatch error: worker thread panicked")]
    WorkerPanicked,
    #[error("Dispatch error: expected {expected} outcomes but {recorded} were recorded")]
    Incomplete {
        expected: usize,
        recorded: usize
    },
    #[error("Dispatch error: {0}")]
    NoRuntime(#[from] TryCurrentError)
}

#[derive(Debug, Error)]
#[error("Unknown dispatch strategy [{0}]")]
pub struct UnknownStrategy(pub String);
