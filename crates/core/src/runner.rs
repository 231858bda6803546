//! Asynchronous command execution.
//!
//! [`ProcessRunner::execute`] returns as soon as a worker thread has been
//! handed the command. The worker runs it through a [`Spawner`], decodes
//! the output and queues the completion callback onto the main context, so
//! callbacks only ever run on the thread driving [`crate::dispatch::MainContext`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use log::{debug, warn};

use crate::command::CommandSpec;
use crate::dispatch::Scheduler;
use crate::encoding::EncodingPreference;
use crate::error::ExecutionFailure;
use crate::spawn::Spawner;

/// Decoded output on success, or why there is none.
pub type ExecutionResult = Result<String, ExecutionFailure>;

const WORKER_THREAD_NAME: &str = "folders-runner";

/// Per-call options for [`ProcessRunner::execute`].
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions<T> {
    /// Written to the child's stdin.
    pub stdin: Option<String>,
    /// Encoding label to try when the output is not UTF-8.
    pub fallback_encoding: Option<String>,
    /// Handed back untouched in the [`Completion`].
    pub data: T,
}

impl ExecuteOptions<()> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> ExecuteOptions<T> {
    pub fn with_data(data: T) -> Self {
        Self {
            stdin: None,
            fallback_encoding: None,
            data,
        }
    }

    #[must_use]
    pub fn stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    #[must_use]
    pub fn fallback_encoding(mut self, label: Option<String>) -> Self {
        self.fallback_encoding = label;
        self
    }
}

/// What a completion callback receives.
#[derive(Debug)]
pub struct Completion<T> {
    pub command: CommandSpec,
    pub result: ExecutionResult,
    pub data: T,
}

/// Runs commands off the main thread and delivers each result exactly once
/// onto the main context.
pub struct ProcessRunner<S> {
    spawner: Arc<dyn Spawner>,
    scheduler: Scheduler<S>,
}

impl<S> Clone for ProcessRunner<S> {
    fn clone(&self) -> Self {
        Self {
            spawner: Arc::clone(&self.spawner),
            scheduler: self.scheduler.clone(),
        }
    }
}

struct Job<S, T, F> {
    spawner: Arc<dyn Spawner>,
    scheduler: Scheduler<S>,
    command: CommandSpec,
    encoding: EncodingPreference,
    data: T,
    on_complete: F,
}

impl<S, T, F> Job<S, T, F>
where
    S: 'static,
    T: Send + 'static,
    F: FnOnce(&mut S, Completion<T>) + Send + 'static,
{
    fn run(self) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_command(self.spawner.as_ref(), &self.command, &self.encoding)
        }))
        .unwrap_or_else(|_| {
            Err(ExecutionFailure::Worker(format!(
                "panicked while running `{}`",
                self.command
            )))
        });

        self.deliver(result);
    }

    fn deliver(self, result: ExecutionResult) {
        let Job {
            scheduler,
            command,
            data,
            on_complete,
            ..
        } = self;

        let delivered = scheduler.schedule(move |state| {
            on_complete(
                state,
                Completion {
                    command,
                    result,
                    data,
                },
            );
        });

        if !delivered {
            warn!("Main context is gone, dropping a command result");
        }
    }
}

fn run_command(
    spawner: &dyn Spawner,
    command: &CommandSpec,
    encoding: &EncodingPreference,
) -> ExecutionResult {
    let raw = spawner.run(command)?;

    match raw.exit_code {
        Some(0) => Ok(encoding.decode(&raw.output)?),
        Some(code) => {
            debug!("`{command}` exited with code {code}");
            Err(ExecutionFailure::NonZeroExit { code })
        }
        None => {
            debug!("`{command}` was terminated by a signal");
            Err(ExecutionFailure::NonZeroExit { code: -1 })
        }
    }
}

impl<S: 'static> ProcessRunner<S> {
    pub fn new(spawner: Arc<dyn Spawner>, scheduler: Scheduler<S>) -> Self {
        Self { spawner, scheduler }
    }

    /// Runs `command` on a fresh worker thread and returns immediately.
    ///
    /// `on_complete` is queued onto the main context exactly once, with the
    /// decoded output or the failure, and with `options.data` passed through.
    pub fn execute<T, F>(&self, command: CommandSpec, options: ExecuteOptions<T>, on_complete: F)
    where
        T: Send + 'static,
        F: FnOnce(&mut S, Completion<T>) + Send + 'static,
    {
        debug!("Executing `{command}`");

        let ExecuteOptions {
            stdin,
            fallback_encoding,
            data,
        } = options;

        let command = match stdin {
            Some(payload) => command.with_stdin(payload),
            None => command,
        };
        let is_empty = command.is_empty();

        let job = Job {
            spawner: Arc::clone(&self.spawner),
            scheduler: self.scheduler.clone(),
            command,
            encoding: EncodingPreference::with_fallback(fallback_encoding),
            data,
            on_complete,
        };

        if is_empty {
            job.deliver(Err(ExecutionFailure::EmptyCommand));
            return;
        }

        // The job only moves to the worker once the thread is running, so a
        // failed spawn can still be reported through the callback.
        let (job_sender, job_receiver) = mpsc::channel::<Job<S, T, F>>();
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                if let Ok(job) = job_receiver.recv() {
                    job.run();
                }
            });

        match spawned {
            Ok(_) => {
                if let Err(mpsc::SendError(job)) = job_sender.send(job) {
                    job.deliver(Err(ExecutionFailure::Worker(
                        "runner thread exited early".to_string(),
                    )));
                }
            }
            Err(e) => job.deliver(Err(ExecutionFailure::Worker(format!(
                "could not start runner thread: {e}"
            )))),
        }
    }
}
