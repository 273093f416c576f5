//! Background snapshot loading with simulated network latency.
//!
//! The source data arrives after a delay (the real system fronts a remote
//! service), so the TUI starts on an empty collection and fills in when
//! the load lands. Each load carries a generation token; a reload bumps
//! the generation, and a result from a superseded load is discarded
//! instead of clobbering newer state.

use chantier_core::StoreState;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;
use std::time::Duration;

use crate::snapshot;

/// Default simulated latency for the interactive loader.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

struct Pending {
    generation: u64,
    rx: Receiver<anyhow::Result<StoreState>>,
}

/// Owns the load lifecycle for one consumer (the TUI app).
pub struct Loader {
    snapshot_path: PathBuf,
    delay: Duration,
    generation: u64,
    pending: Vec<Pending>,
}

/// What `poll` observed this tick.
#[derive(Debug)]
pub enum LoadEvent {
    /// Nothing finished yet (or nothing in flight).
    Idle,
    /// The current-generation load finished.
    Ready(anyhow::Result<StoreState>),
    /// A superseded load finished and was dropped.
    Stale,
}

impl Loader {
    #[must_use]
    pub const fn new(snapshot_path: PathBuf, delay: Duration) -> Self {
        Self {
            snapshot_path,
            delay,
            generation: 0,
            pending: Vec::new(),
        }
    }

    /// True while the current-generation load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.iter().any(|p| p.generation == self.generation)
    }

    /// Kick off a load with the configured latency. Any in-flight load is
    /// superseded: its result will surface as [`LoadEvent::Stale`] and is
    /// never applied.
    pub fn start(&mut self) {
        let delay = self.delay;
        self.start_with_delay(delay);
    }

    /// Same as [`start`](Self::start) with an explicit latency.
    pub fn start_with_delay(&mut self, delay: Duration) {
        self.generation += 1;
        let generation = self.generation;
        let path = self.snapshot_path.clone();
        let (tx, rx) = channel();

        thread::spawn(move || {
            thread::sleep(delay);
            let result = snapshot::load_state(&path);
            // The receiver may be gone (app quit); that is fine.
            let _ = tx.send(result);
        });

        self.pending.push(Pending { generation, rx });
        tracing::debug!(generation, "snapshot load started");
    }

    /// Non-blocking check for a finished load.
    pub fn poll(&mut self) -> LoadEvent {
        let current = self.generation;
        for i in 0..self.pending.len() {
            match self.pending[i].rx.try_recv() {
                Ok(result) => {
                    let finished = self.pending.remove(i);
                    if finished.generation == current {
                        return LoadEvent::Ready(result);
                    }
                    tracing::debug!(
                        generation = finished.generation,
                        "discarded stale snapshot load"
                    );
                    return LoadEvent::Stale;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    let finished = self.pending.remove(i);
                    if finished.generation == current {
                        return LoadEvent::Ready(Err(anyhow::anyhow!(
                            "snapshot loader thread vanished"
                        )));
                    }
                    return LoadEvent::Stale;
                }
            }
        }
        LoadEvent::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadEvent, Loader};
    use chantier_core::StoreState;
    use std::time::Duration;

    fn wait_for(loader: &mut Loader) -> LoadEvent {
        for _ in 0..400 {
            match loader.poll() {
                LoadEvent::Idle => std::thread::sleep(Duration::from_millis(5)),
                other => return other,
            }
        }
        panic!("load never finished");
    }

    #[test]
    fn load_resolves_after_delay() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("projects.json");
        crate::snapshot::save_state(&path, &StoreState::default()).expect("seed");

        let mut loader = Loader::new(path, Duration::from_millis(10));
        assert!(!loader.is_loading());
        loader.start();
        assert!(loader.is_loading());

        match wait_for(&mut loader) {
            LoadEvent::Ready(Ok(state)) => assert_eq!(state, StoreState::default()),
            other => panic!("expected ready, got {other:?}"),
        }
        assert!(!loader.is_loading());
    }

    #[test]
    fn superseded_load_never_applies() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("projects.json");
        crate::snapshot::save_state(&path, &StoreState::default()).expect("seed");

        let mut loader = Loader::new(path.clone(), Duration::from_millis(10));
        // Slow first load, then a fast reload that supersedes it.
        loader.start_with_delay(Duration::from_millis(150));
        loader.start_with_delay(Duration::from_millis(10));

        // The fast current-generation load lands first and is applied.
        match wait_for(&mut loader) {
            LoadEvent::Ready(Ok(_)) => {}
            other => panic!("expected ready, got {other:?}"),
        }

        // The slow superseded load eventually lands and is discarded.
        match wait_for(&mut loader) {
            LoadEvent::Stale => {}
            other => panic!("expected stale, got {other:?}"),
        }
        assert!(!loader.is_loading());
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut loader = Loader::new(dir.path().join("projects.json"), Duration::from_millis(5));
        loader.start();
        match wait_for(&mut loader) {
            LoadEvent::Ready(Ok(state)) => assert!(state.projects.is_empty()),
            other => panic!("expected empty state, got {other:?}"),
        }
    }
}
