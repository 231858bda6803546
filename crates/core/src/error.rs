use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors outside the command execution path: settings, terminal IO and
/// argument handling.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Invalid field separator `{}`: expected exactly one character", .0)]
    InvalidSeparator(String),

    #[error("No folder matches `{}`", .0)]
    FolderNotFound(String),

    #[error("Folder index out of range: {}", .0)]
    IndexOutOfRange(usize),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}

/// Failure to turn captured output bytes into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Output is not valid UTF-8 and no fallback encoding is set: {}", .0)]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Unknown fallback encoding `{}`", .0)]
    UnknownEncoding(String),

    #[error("Output could not be decoded as UTF-8 or {}", .encoding)]
    Malformed { encoding: &'static str },
}

/// Errors raised by a [`crate::spawn::Spawner`] while starting or running a
/// child process.
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("`{}` could not be found in PATH", .program)]
    NotFound { program: String, search_path: String },

    #[error("Error starting `{}`: {}", .program, .source)]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("Error communicating with `{}`: {}", .program, .source)]
    Io {
        program: String,
        source: std::io::Error,
    },
}

/// The failure half of an execution result, as delivered to completion
/// callbacks.
#[derive(Error, Debug)]
pub enum ExecutionFailure {
    #[error("Command exited with code {}", .code)]
    NonZeroExit { code: i32 },

    #[error("`{}` could not be found in PATH\n\nPATH is: {}", .program, .search_path)]
    ExecutableNotFound { program: String, search_path: String },

    #[error("{}", .0)]
    Launch(SpawnError),

    #[error("{}", .0)]
    Decode(#[from] DecodeError),

    #[error("Refusing to run an empty command")]
    EmptyCommand,

    #[error("Command runner failed: {}", .0)]
    Worker(String),
}

impl From<SpawnError> for ExecutionFailure {
    fn from(value: SpawnError) -> Self {
        match value {
            SpawnError::NotFound {
                program,
                search_path,
            } => Self::ExecutableNotFound {
                program,
                search_path,
            },
            other => Self::Launch(other),
        }
    }
}

impl ExecutionFailure {
    /// Fatal failures abort the session; the rest are reported and dropped.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::NonZeroExit { .. } | Self::ExecutableNotFound { .. }
        )
    }
}
