use super::{CompletionLatch, WorkerPool};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::time::timeout;

const WAIT_LIMIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_latch_with_zero_count_is_already_released() -> Result<()> {
    let latch = CompletionLatch::new(0);

    timeout(WAIT_LIMIT, latch.wait()).await?;

    assert_eq!(latch.remaining(), 0);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_latch_releases_after_signals_from_os_threads() -> Result<()> {
    let latch = Arc::new(CompletionLatch::new(16));

    let threads: Vec<_> = (0..16).map(|_| {
        let latch = latch.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            latch.count_down();
        })
    }).collect();

    timeout(WAIT_LIMIT, latch.wait()).await?;

    for handle in threads {
        handle.join().map_err(|_| anyhow!("signalling thread panicked"))?;
    }

    assert_eq!(latch.remaining(), 0);

    Ok(())
}

#[tokio::test]
async fn test_latch_stays_closed_until_last_signal() -> Result<()> {
    let latch = CompletionLatch::new(2);
    latch.count_down();

    assert!(timeout(Duration::from_millis(50), latch.wait()).await.is_err());

    latch.count_down();
    latch.count_down();

    timeout(WAIT_LIMIT, latch.wait()).await?;

    assert_eq!(latch.remaining(), 0);

    Ok(())
}

#[tokio::test]
async fn test_signal_counts_down_even_when_its_holder_panics() -> Result<()> {
    let latch = Arc::new(CompletionLatch::new(1));
    let signal = latch.signal();

    let panicked = thread::spawn(move || {
        let _signal = signal;
        panic!("worker failed");
    }).join();

    assert!(panicked.is_err());

    timeout(WAIT_LIMIT, latch.wait()).await?;

    Ok(())
}

#[tokio::test]
async fn test_worker_pool_runs_every_queued_job() -> Result<()> {
    let pool = WorkerPool::new(3, "test-pool")?;
    let executed = Arc::new(AtomicUsize::new(0));
    let latch = Arc::new(CompletionLatch::new(50));

    for _ in 0..50 {
        let executed = executed.clone();
        let signal = latch.signal();

        assert!(pool.execute(move || {
            let _signal = signal;
            executed.fetch_add(1, Ordering::SeqCst);
        }));
    }

    timeout(WAIT_LIMIT, latch.wait()).await?;

    assert_eq!(executed.load(Ordering::SeqCst), 50);

    Ok(())
}

#[tokio::test]
async fn test_worker_pool_survives_panicking_job() -> Result<()> {
    let pool = WorkerPool::new(1, "test-pool")?;
    let latch = Arc::new(CompletionLatch::new(2));
    let executed = Arc::new(AtomicUsize::new(0));

    let signal = latch.signal();
    pool.execute(move || {
        let _signal = signal;
        panic!("job failed");
    });

    let signal = latch.signal();
    let counter = executed.clone();
    pool.execute(move || {
        let _signal = signal;
        counter.fetch_add(1, Ordering::SeqCst);
    });

    timeout(WAIT_LIMIT, latch.wait()).await?;

    assert_eq!(executed.load(Ordering::SeqCst), 1);

    Ok(())
}
