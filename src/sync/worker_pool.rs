use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::Builder;

use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of reusable OS worker threads fed from one unbounded queue.
///
/// Jobs queue while every worker is busy. A panicking job is logged and its
/// worker keeps serving. Workers exit once the pool is dropped and the queue drains.
pub struct WorkerPool {
    sender: Option<Sender<Job>>
}

impl WorkerPool {
    pub fn new(size: usize, name: &str) -> io::Result<Self> {
        let size = size.max(1);
        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        for index in 0..size {
            let receiver = receiver.clone();

            Builder::new()
                .name(format!("{name}-{index}"))
                .spawn(move || Self::serve(receiver))?;
        }

        debug!("Started worker pool [{name}] with {size} workers");

        Ok(Self {
            sender: Some(sender)
        })
    }

    /// Queues a job. Returns `false` if the pool no longer accepts work.
    pub fn execute<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.sender {
            Some(sender) => sender.send(Box::new(job)).is_ok(),
            None => false
        }
    }

    fn serve(receiver: Arc<Mutex<Receiver<Job>>>) {
        loop {
            let job = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break
            };

            let Ok(job) = job else {
                break;
            };

            if catch_unwind(AssertUnwindSafe(job)).is_err() {
                warn!("Worker pool job panicked, worker keeps serving");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.sender.take();
    }
}
