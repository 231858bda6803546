//! The serialized main context.
//!
//! Background work never touches application state directly. Instead it
//! hands a task to a [`Scheduler`], and whichever thread drives the
//! [`MainContext`] runs the queued tasks one at a time against the state it
//! owns.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// A unit of work to run on the main context.
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Queue of tasks waiting to run against state `S`.
pub struct MainContext<S> {
    sender: Sender<Task<S>>,
    receiver: Receiver<Task<S>>,
}

/// Cloneable handle for queueing tasks onto a [`MainContext`] from any
/// thread.
pub struct Scheduler<S> {
    sender: Sender<Task<S>>,
}

impl<S> Clone for Scheduler<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S> Scheduler<S> {
    /// Queues `task`. Returns `false` if the main context has been dropped,
    /// in which case the task is discarded.
    pub fn schedule(&self, task: impl FnOnce(&mut S) + Send + 'static) -> bool {
        self.sender.send(Box::new(task)).is_ok()
    }
}

impl<S> Default for MainContext<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> MainContext<S> {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    #[must_use]
    pub fn scheduler(&self) -> Scheduler<S> {
        Scheduler {
            sender: self.sender.clone(),
        }
    }

    /// Runs every task that is already queued. Returns how many ran.
    pub fn run_pending(&self, state: &mut S) -> usize {
        let mut ran = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task(state);
                    ran += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return ran,
            }
        }
    }

    /// Waits up to `timeout` for one task and runs it. Returns whether a task
    /// ran.
    pub fn run_next(&self, state: &mut S, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task(state);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }
}
