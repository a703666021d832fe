use std::future::Future;
use std::time::Duration;

use error_stack::Report;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::CycleError;

/// Drive `cycle` repeatedly until `cancel` fires.
///
/// Each cycle runs to completion before the next is considered; the idle
/// period is measured after completion, so a slow cycle does not shorten the
/// gap to the next one. A failed cycle is logged and skipped — the next
/// scheduled cycle is the retry, there is no retry within a cycle.
pub async fn run<C, Fut>(idle: Duration, cancel: CancellationToken, mut cycle: C)
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Report<CycleError>>>,
{
    loop {
        if cancel.is_cancelled() {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            result = cycle() => match result {
                Ok(()) => debug!("cycle complete"),
                Err(e) => error!(error = ?e, "cycle failed, skipping until next cycle"),
            },
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(idle) => {}
        }
    }

    info!("scheduler stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn failed_cycle_does_not_stop_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let counter = Arc::clone(&count);
        let stopper = cancel.clone();
        run(Duration::from_millis(1), cancel.clone(), move || {
            let counter = Arc::clone(&counter);
            let stopper = stopper.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= 4 {
                    stopper.cancel();
                }
                if n == 2 {
                    Err(Report::new(CycleError::Fetch))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        // The failure on cycle 2 must not have stopped the loop.
        assert!(count.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn cancelled_token_prevents_any_cycle() {
        let count = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let counter = Arc::clone(&count);
        run(Duration::from_millis(1), cancel, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
