use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, TryRecvError};
use glance_render::RenderOutcome;

/// Handle to a minimap render running on a worker thread.
#[derive(Debug)]
pub struct RenderJob {
    cancel: Arc<AtomicBool>,
    receiver: Receiver<RenderOutcome>,
    result: Cell<Option<RenderOutcome>>,
    handle: Option<JoinHandle<()>>,
}

impl RenderJob {
    pub(crate) fn new(
        cancel: Arc<AtomicBool>,
        receiver: Receiver<RenderOutcome>,
        handle: JoinHandle<()>,
    ) -> Self {
        Self {
            cancel,
            receiver,
            result: Cell::new(None),
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop at the next span boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// The outcome, if the worker has finished.
    pub fn try_result(&self) -> Option<RenderOutcome> {
        if let Some(outcome) = self.result.get() {
            return Some(outcome);
        }
        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => RenderOutcome::Cancelled,
        };
        self.result.set(Some(outcome));
        Some(outcome)
    }

    /// Block until the worker is done.
    pub fn wait(mut self) -> RenderOutcome {
        let outcome = match self.result.get() {
            Some(outcome) => outcome,
            None => self.receiver.recv().unwrap_or(RenderOutcome::Cancelled),
        };
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("minimap render worker panicked");
            }
        }
        outcome
    }
}
