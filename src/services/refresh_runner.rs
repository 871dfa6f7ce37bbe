//! Background refresh runner
//!
//! Runs the table's refresh callback off the UI thread and lets the event
//! loop poll for its completion on each tick.

use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// User-supplied refresh operation
pub type RefreshCallback = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// How a refresh ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    Failed(String),
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Completed)
    }
}

struct RefreshJob {
    receiver: Receiver<RefreshOutcome>,
    start_instant: Instant,
}

/// Runs at most one refresh at a time
#[derive(Default)]
pub struct RefreshRunner {
    job: Option<RefreshJob>,
}

impl RefreshRunner {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Time since the running refresh started
    pub fn elapsed(&self) -> Option<Duration> {
        self.job.as_ref().map(|j| j.start_instant.elapsed())
    }

    /// Start a refresh
    ///
    /// Without a callback the job resolves immediately and completes on the
    /// next `poll`.
    pub fn spawn(&mut self, callback: Option<RefreshCallback>) {
        let (tx, rx) = mpsc::channel();

        match callback {
            Some(callback) => {
                thread::spawn(move || {
                    let outcome = match callback() {
                        Ok(()) => RefreshOutcome::Completed,
                        Err(e) => RefreshOutcome::Failed(format!("{:#}", e)),
                    };
                    // The table may be gone by now; nobody is left to tell.
                    let _ = tx.send(outcome);
                });
            }
            None => {
                let _ = tx.send(RefreshOutcome::Completed);
            }
        }

        self.job = Some(RefreshJob {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Check whether the running refresh has finished
    pub fn poll(&mut self) -> Option<RefreshOutcome> {
        let job = self.job.as_ref()?;

        let outcome = match job.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                RefreshOutcome::Failed("refresh worker exited without reporting".to_string())
            }
        };

        let elapsed = job.start_instant.elapsed();
        match &outcome {
            RefreshOutcome::Completed => debug!("refresh completed in {:?}", elapsed),
            RefreshOutcome::Failed(err) => warn!("refresh failed after {:?}: {}", elapsed, err),
        }

        self.job = None;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wait_for(runner: &mut RefreshRunner) -> RefreshOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = runner.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "refresh never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_without_callback_completes_immediately() {
        let mut runner = RefreshRunner::new();
        runner.spawn(None);
        assert!(runner.is_running());
        assert_eq!(runner.poll(), Some(RefreshOutcome::Completed));
        assert!(!runner.is_running());
        assert_eq!(runner.poll(), None);
    }

    #[test]
    fn test_callback_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let callback: RefreshCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut runner = RefreshRunner::new();
        runner.spawn(Some(callback));
        assert_eq!(wait_for(&mut runner), RefreshOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_reported() {
        let callback: RefreshCallback = Arc::new(|| Err(anyhow::anyhow!("boom")));
        let mut runner = RefreshRunner::new();
        runner.spawn(Some(callback));

        let outcome = wait_for(&mut runner);
        assert!(!outcome.is_success());
        assert_eq!(outcome, RefreshOutcome::Failed("boom".to_string()));
    }
}
