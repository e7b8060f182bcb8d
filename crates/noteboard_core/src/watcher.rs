//! Periodic selection sampling feeding the mediator's visibility machine.
//!
//! # Responsibility
//! - Sample "is the selection empty" on a fixed cadence.
//! - Report each sample through `Mediator::hide_elements`.
//!
//! # Invariants
//! - The loop runs on its own named thread and stops deterministically.
//! - A stop request never interrupts an in-flight mediator call.
//! - Sample failures end the loop; they are logged, never propagated.

use crate::component::MediatorSlot;
use crate::model::collection::{ModelPoisoned, SharedCollection};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const WATCHER_THREAD_NAME: &str = "selection-watcher";

/// Source of the selection state sampled by the watcher.
pub trait SelectionSource: Send + Sync {
    fn selection_is_empty(&self) -> Result<bool, WatcherError>;
}

impl SelectionSource for SharedCollection {
    fn selection_is_empty(&self) -> Result<bool, WatcherError> {
        Ok(self.lock()?.is_selection_empty())
    }
}

/// Selection watcher failures.
#[derive(Debug)]
pub enum WatcherError {
    /// Worker thread could not be started.
    Spawn(io::Error),
    /// The selection state could not be read.
    Sample(String),
}

impl Display for WatcherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to start selection watcher: {err}"),
            Self::Sample(details) => write!(f, "failed to sample selection: {details}"),
        }
    }
}

impl Error for WatcherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            Self::Sample(_) => None,
        }
    }
}

impl From<ModelPoisoned> for WatcherError {
    fn from(value: ModelPoisoned) -> Self {
        Self::Sample(value.to_string())
    }
}

/// How the watcher loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherExit {
    Stopped,
    SampleFailed,
    /// The worker thread panicked inside a mediator call.
    Panicked,
}

/// Handle to the running sampling loop.
#[derive(Debug)]
pub struct SelectionWatcher {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<WatcherExit>>,
    exit: Option<WatcherExit>,
}

impl SelectionWatcher {
    /// Starts sampling `source` every `interval`.
    ///
    /// Samples taken before `mediator` is bound are discarded.
    pub fn start(
        source: Arc<dyn SelectionSource>,
        mediator: Arc<MediatorSlot>,
        interval: Duration,
    ) -> Result<Self, WatcherError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(WATCHER_THREAD_NAME.to_string())
            .spawn(move || {
                info!(
                    "event=watcher_start module=watcher status=ok interval_ms={}",
                    interval.as_millis()
                );
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            info!("event=watcher_stop module=watcher status=ok reason=requested");
                            return WatcherExit::Stopped;
                        }
                    }

                    let empty = match source.selection_is_empty() {
                        Ok(empty) => empty,
                        Err(err) => {
                            error!(
                                "event=watcher_stop module=watcher status=error error_code=sample_failed error={}",
                                err
                            );
                            return WatcherExit::SampleFailed;
                        }
                    };

                    match mediator.get() {
                        Some(target) => target.hide_elements(empty),
                        None => debug!(
                            "event=watcher_sample module=watcher status=skip reason=no_mediator"
                        ),
                    }
                }
            })
            .map_err(WatcherError::Spawn)?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            exit: None,
        })
    }

    /// Whether the sampling loop is still alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the loop and waits for the current cycle to finish.
    ///
    /// Repeated calls return the first recorded exit. Called from the
    /// watcher thread itself, this only signals and returns `None`.
    pub fn stop(&mut self) -> Option<WatcherExit> {
        self.stop_tx.take();
        let Some(handle) = self.handle.take() else {
            return self.exit;
        };

        if handle.thread().id() == thread::current().id() {
            return None;
        }

        let exit = handle.join().unwrap_or_else(|_| {
            error!("event=watcher_stop module=watcher status=error error_code=worker_panicked");
            WatcherExit::Panicked
        });
        self.exit = Some(exit);
        self.exit
    }
}

impl Drop for SelectionWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionSource, SelectionWatcher, WatcherError, WatcherExit};
    use crate::component::MediatorSlot;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct FailingSource;

    impl SelectionSource for FailingSource {
        fn selection_is_empty(&self) -> Result<bool, WatcherError> {
            Err(WatcherError::Sample("selection unreadable".to_string()))
        }
    }

    struct EmptySource;

    impl SelectionSource for EmptySource {
        fn selection_is_empty(&self) -> Result<bool, WatcherError> {
            Ok(true)
        }
    }

    fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        check()
    }

    #[test]
    fn sample_failure_ends_the_loop() {
        let mut watcher = SelectionWatcher::start(
            Arc::new(FailingSource),
            Arc::new(MediatorSlot::new()),
            Duration::from_millis(10),
        )
        .expect("watcher should start");

        assert!(wait_until(Duration::from_secs(2), || !watcher.is_running()));
        assert_eq!(watcher.stop(), Some(WatcherExit::SampleFailed));
    }

    #[test]
    fn stop_is_prompt_and_repeatable() {
        let mut watcher = SelectionWatcher::start(
            Arc::new(EmptySource),
            Arc::new(MediatorSlot::new()),
            Duration::from_secs(30),
        )
        .expect("watcher should start");
        assert!(watcher.is_running());

        let started = Instant::now();
        assert_eq!(watcher.stop(), Some(WatcherExit::Stopped));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!watcher.is_running());
        assert_eq!(watcher.stop(), Some(WatcherExit::Stopped));
    }
}
