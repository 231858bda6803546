use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One external command: the program and its arguments, where to run it and
/// what to feed it on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    stdin: Option<String>,
    capture_output: bool,
}

impl CommandSpec {
    /// Builds a command from its arguments, dropping empty ones.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args
                .into_iter()
                .map(Into::into)
                .filter(|arg| !arg.is_empty())
                .collect(),
            working_dir: None,
            stdin: None,
            capture_output: true,
        }
    }

    /// Sets the directory the child runs in. An empty path leaves the
    /// current directory in place.
    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        self.working_dir = (!working_dir.as_os_str().is_empty()).then_some(working_dir);
        self
    }

    #[must_use]
    pub fn with_stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    /// Sends the child's stdout and stderr nowhere. The command then
    /// completes as soon as the child exits, even if processes it started
    /// outlive it.
    #[must_use]
    pub fn discard_output(mut self) -> Self {
        self.capture_output = false;
        self
    }

    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Arguments after the program.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    #[must_use]
    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    #[must_use]
    pub fn captures_output(&self) -> bool {
        self.capture_output
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl Display for CommandSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.args.join(" ").as_str())
    }
}
