use std::mem;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use tokio::sync::Semaphore;
use tokio::task::spawn_blocking;
use tracing::error;

use crate::aggregator::OutcomeAggregator;
use crate::models::PaymentRequest;
use crate::strategies::{execute_blocking, DispatchContext, DispatchError};

const STACK_SIZE: usize = 256 * 1024;

/// One small-stack OS thread per payment, with at most
/// `lightweight_thread_permits` of them alive at once.
///
/// A permit is taken before each thread starts and released when it ends. The
/// batch ends with a join over every started thread, also when a spawn fails
/// or a thread panics; no further threads are started after a failure.
pub(super) async fn dispatch(context: &DispatchContext, payments: Vec<PaymentRequest>, aggregator: &Arc<OutcomeAggregator>) -> Result<(), DispatchError> {
    let gate = Arc::new(Semaphore::new(context.limits.lightweight_thread_permits.max(1)));
    let mut threads = Vec::new();
    let mut failure: Option<DispatchError> = None;

    for payment in payments {
        let permit = match gate.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(closed) => {
                failure = Some(closed.into());
                break;
            }
        };

        if let Err(reaped) = reap_finished(&mut threads) {
            failure = Some(reaped);
            break;
        }

        let gateway = context.gateway.clone();
        let aggregator = aggregator.clone();

        let spawned = Builder::new()
            .name("payment-lightweight".to_string())
            .stack_size(STACK_SIZE)
            .spawn(move || {
                let _permit = permit;
                execute_blocking(&gateway, payment, &aggregator);
            });

        match spawned {
            Ok(thread) => threads.push(thread),
            Err(spawn_error) => {
                error!("Failed to start payment thread, waiting for {} started ones: {spawn_error}", threads.len());
                failure = Some(spawn_error.into());
                break;
            }
        }
    }

    let joined = spawn_blocking(move || join_threads(threads)).await?;

    match failure {
        Some(failure) => Err(failure),
        None => joined
    }
}

/// Joins the threads that already ended so their stacks are released while the batch is still starting new ones.
fn reap_finished(threads: &mut Vec<JoinHandle<()>>) -> Result<(), DispatchError> {
    let (finished, running): (Vec<_>, Vec<_>) = mem::take(threads).into_iter()
        .partition(|thread| thread.is_finished());

    *threads = running;

    join_threads(finished)
}

fn join_threads(threads: Vec<JoinHandle<()>>) -> Result<(), DispatchError> {
    let mut outcome = Ok(());

    for thread in threads {
        if thread.join().is_err() {
            outcome = Err(DispatchError::WorkerPanicked);
        }
    }

    outcome
}
