//! Starting child processes.
//!
//! The [`Spawner`] trait is the seam between the runner and the operating
//! system: it runs one [`CommandSpec`] to completion and reports either the
//! captured output or a [`SpawnError`] saying why the process could not run.

use std::env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, warn};

use crate::command::CommandSpec;
use crate::error::SpawnError;

/// Combined stdout and stderr of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub output: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl RawOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command to completion, blocking the calling thread.
pub trait Spawner: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SpawnError::NotFound`] if the program is not on the search
    /// path, and [`SpawnError::Launch`] / [`SpawnError::Io`] for any other
    /// failure to start or talk to the process.
    fn run(&self, command: &CommandSpec) -> Result<RawOutput, SpawnError>;
}

/// Spawns real processes with [`std::process::Command`].
#[derive(Debug, Clone, Default)]
pub struct SystemSpawner;

impl SystemSpawner {
    fn resolve_program(program: &str, working_dir: &Path) -> Result<PathBuf, SpawnError> {
        let search_path = env::var_os("PATH");

        which::which_in(program, search_path.as_ref(), working_dir).map_err(|e| {
            debug!("Could not resolve `{program}`: {e}");
            SpawnError::NotFound {
                program: program.to_string(),
                search_path: search_path
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }
        })
    }
}

impl Spawner for SystemSpawner {
    fn run(&self, spec: &CommandSpec) -> Result<RawOutput, SpawnError> {
        let program = spec.program().unwrap_or_default().to_string();
        let launch_error = |source: std::io::Error| SpawnError::Launch {
            program: program.clone(),
            source,
        };
        let io_error = |source: std::io::Error| SpawnError::Io {
            program: program.clone(),
            source,
        };

        let working_dir = match spec.working_dir() {
            Some(dir) => dir.to_path_buf(),
            None => env::current_dir().map_err(launch_error)?,
        };

        // A missing directory would otherwise surface as the same NotFound
        // error kind as a missing program.
        if !working_dir.is_dir() {
            return Err(launch_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("working directory `{}` does not exist", working_dir.display()),
            )));
        }

        let executable = Self::resolve_program(&program, &working_dir)?;

        let mut command = Command::new(executable);
        command
            .args(spec.arguments())
            .current_dir(&working_dir)
            .stdin(if spec.stdin().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        // Both streams share one pipe so their output stays interleaved.
        let reader = if spec.captures_output() {
            let (reader, writer) = std::io::pipe().map_err(launch_error)?;
            let stderr_writer = writer.try_clone().map_err(launch_error)?;
            command.stdout(writer).stderr(stderr_writer);
            Some(reader)
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
            None
        };

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpawnError::NotFound {
                    program: program.clone(),
                    search_path: env::var("PATH").unwrap_or_default(),
                }
            } else {
                launch_error(e)
            }
        })?;

        // The command still holds the parent's copies of the pipe's write end;
        // reading would never see EOF while they are open. Descendants that
        // inherit the pipe hold it open as well.
        drop(command);

        let child_stdin = child.stdin.take();
        let mut output = Vec::new();

        thread::scope(|scope| {
            let program = program.as_str();
            if let (Some(mut stdin), Some(payload)) = (child_stdin, spec.stdin()) {
                scope.spawn(move || {
                    if let Err(e) = stdin.write_all(payload.as_bytes()) {
                        // The child may exit without reading its input.
                        warn!("Could not write stdin of `{program}`: {e}");
                    }
                });
            }

            match reader {
                Some(mut reader) => reader.read_to_end(&mut output).map(|_| ()),
                None => Ok(()),
            }
        })
        .map_err(io_error)?;

        let status = child.wait().map_err(io_error)?;

        Ok(RawOutput {
            output,
            exit_code: status.code(),
        })
    }
}
