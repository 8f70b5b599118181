//! notify-backed watcher thread

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{Result, StoreError};

/// Message from the notify callback to the watcher thread
#[derive(Debug)]
enum WatchEvent {
    Changed,
    Error(String),
}

/// Supervised watcher thread for one storage file
///
/// The thread owns the notify backend. Dropping the handle signals the
/// thread, which drops the backend on exit, and joins it.
pub struct ChangeWatcher {
    path: PathBuf,
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ChangeWatcher {
    /// Start watching `path`, calling `on_change` after each (debounced)
    /// change to the file
    ///
    /// # Errors
    /// Returns `StoreError::Watch` if the notify backend cannot be created
    /// or the directory cannot be watched.
    pub fn spawn<F>(path: &Path, debounce: Duration, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| StoreError::Watch(format!("{} has no file name", path.display())))?
            .to_os_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx) = channel::unbounded();
        let (shutdown_tx, shutdown_rx) = channel::bounded(1);

        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    let _ = event_tx.send(WatchEvent::Error(e.to_string()));
                    return;
                }
            };

            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            let ours = event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()));
            if ours {
                let _ = event_tx.send(WatchEvent::Changed);
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let thread = thread::Builder::new()
            .name("jsonkv-watcher".to_string())
            .spawn(move || run_loop(watcher, event_rx, shutdown_rx, debounce, on_change))?;

        tracing::debug!(path = %path.display(), "change watcher started");

        Ok(Self {
            path: path.to_path_buf(),
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// The file being watched
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the watcher thread is still alive
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.try_send(());
        }

        if let Some(thread) = self.thread.take() {
            if thread.thread().id() == thread::current().id() {
                return;
            }
            if thread.join().is_err() {
                tracing::error!(path = %self.path.display(), "change watcher thread panicked");
            }
        }
        tracing::debug!(path = %self.path.display(), "change watcher stopped");
    }
}

fn run_loop<F>(
    _watcher: RecommendedWatcher,
    events: Receiver<WatchEvent>,
    shutdown: Receiver<()>,
    debounce: Duration,
    on_change: F,
) where
    F: Fn(),
{
    loop {
        crossbeam::select! {
            recv(shutdown) -> _ => return,
            recv(events) -> msg => match msg {
                Ok(WatchEvent::Changed) => {
                    if !drain_burst(&events, debounce) {
                        return;
                    }
                    on_change();
                }
                Ok(WatchEvent::Error(e)) => {
                    tracing::error!(error = %e, "file watch error");
                }
                // Backend dropped
                Err(_) => return,
            },
        }
    }
}

/// Swallow events for at most `debounce` after the first one
///
/// The window is measured from the first event, so a file that keeps
/// changing is still reloaded once per window.
/// Returns false if the backend went away while waiting.
fn drain_burst(events: &Receiver<WatchEvent>, debounce: Duration) -> bool {
    if debounce.is_zero() {
        return true;
    }
    let deadline = Instant::now() + debounce;
    loop {
        match events.recv_deadline(deadline) {
            Ok(WatchEvent::Changed) => continue,
            Ok(WatchEvent::Error(e)) => tracing::error!(error = %e, "file watch error"),
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}
