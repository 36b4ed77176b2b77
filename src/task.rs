use std::sync::mpsc;

use anyhow::Result;

/// One-shot unit of background work. The closure runs on its own thread and
/// sends a single result back over a channel; the interactive loop observes it
/// through `poll`, so model and UI state are only ever mutated on the
/// interactive thread. No cancellation: the receiver may be dropped and the
/// worker's final send simply fails.
pub(crate) struct Task<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl<T: Send + 'static> Task<T> {
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(work());
        });
        Self { rx }
    }

    /// Non-blocking check for completion. A worker that died without sending
    /// (a panic inside `work`) is reported as a failure result rather than a
    /// dropped completion; callers must discard the task once this returns
    /// `Some`.
    pub(crate) fn poll(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err(anyhow::anyhow!("background task ended without a result")))
            }
        }
    }

    /// Blocks until the work finishes.
    pub(crate) fn join(self) -> Result<T> {
        match self.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("background task ended without a result")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn join_returns_success() {
        let task = Task::spawn(|| Ok(41 + 1));
        assert_eq!(task.join().unwrap(), 42);
    }

    #[test]
    fn join_returns_failure() {
        let task: Task<()> = Task::spawn(|| anyhow::bail!("boom"));
        let err = task.join().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn poll_is_none_until_done_then_some_once() {
        let task = Task::spawn(|| {
            std::thread::sleep(Duration::from_millis(50));
            Ok(7)
        });
        let mut seen = None;
        for _ in 0..200 {
            if let Some(result) = task.poll() {
                seen = Some(result);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(seen.unwrap().unwrap(), 7);
    }

    #[test]
    fn panicking_work_still_delivers_a_failure() {
        let task: Task<()> = Task::spawn(|| panic!("worker died"));
        let err = task.join().unwrap_err();
        assert!(err.to_string().contains("without a result"));
    }
}
