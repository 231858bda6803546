//! One listing, selection and open cycle.
//!
//! [`FolderPicker::list`] runs the list command in the background. When its
//! output arrives on the main context it is split into [`FolderEntry`] rows
//! and shown in the host's quick panel; the picked row is then opened with
//! the editor command.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::command::CommandSpec;
use crate::config::Settings;
use crate::dispatch::MainContext;
use crate::encoding::fallback_label;
use crate::error::{ExecutionFailure, Result};
use crate::host::Host;
use crate::runner::{Completion, ExecuteOptions, ProcessRunner};

/// Most fields one listing line is split into.
const MAX_FIELDS: usize = 3;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One row of listing output: the folder name, then up to two extra fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    fields: Vec<String>,
}

impl FolderEntry {
    /// Splits a listing line on `separator`.
    #[must_use]
    pub fn parse(line: &str, separator: char) -> Self {
        Self {
            fields: line
                .splitn(MAX_FIELDS, separator)
                .map(str::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.fields.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Display for FolderEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())?;

        for detail in self.fields.iter().skip(1) {
            write!(formatter, "  {detail}")?;
        }

        Ok(())
    }
}

/// Parses list command output into entries, one per non-blank line.
#[must_use]
pub fn parse_entries(output: &str, separator: char) -> Vec<FolderEntry> {
    output
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| FolderEntry::parse(line, separator))
        .collect()
}

pub struct FolderPicker<H: Host + 'static> {
    settings: Settings,
    separator: char,
    host: H,
    runner: ProcessRunner<FolderPicker<H>>,
    entries: Vec<FolderEntry>,
    in_flight: usize,
    fatal: Option<ExecutionFailure>,
}

impl<H: Host + 'static> FolderPicker<H> {
    /// # Errors
    ///
    /// Returns an error if the settings' field separator is not a single
    /// character.
    pub fn new(settings: Settings, host: H, runner: ProcessRunner<Self>) -> Result<Self> {
        let separator = settings.separator()?;

        Ok(Self {
            settings,
            separator,
            host,
            runner,
            entries: Vec::new(),
            in_flight: 0,
            fatal: None,
        })
    }

    /// Lists the base folder and, once the listing arrives, offers it in the
    /// quick panel.
    pub fn list(&mut self) {
        let base_path = self.settings.base_path();
        let command = CommandSpec::new([
            self.settings.list_command.clone(),
            base_path.to_string_lossy().into_owned(),
        ]);

        self.run_command(command, base_path, |picker, output, base_path| {
            picker.on_listed(&output, &base_path);
        });
    }

    /// Replaces the current entries with the listing in `output` and lets
    /// the user choose one.
    pub fn on_listed(&mut self, output: &str, base_path: &Path) {
        self.entries = parse_entries(output, self.separator);

        if self.entries.is_empty() {
            info!("No folders in {}", base_path.display());
            self.host
                .status_message(&format!("No folders found in {}", base_path.display()));
            return;
        }

        debug!("Listed {} folders in {}", self.entries.len(), base_path.display());
        let picked = self.host.show_quick_panel(&self.entries);
        self.on_selected(picked);
    }

    /// Opens the entry at `picked`. Cancellation and indexes outside the
    /// current entries are ignored.
    pub fn on_selected(&mut self, picked: isize) {
        let Some(entry) = usize::try_from(picked)
            .ok()
            .and_then(|index| self.entries.get(index))
        else {
            debug!("Ignoring selection {picked} of {} entries", self.entries.len());
            return;
        };

        let name = entry.name().to_string();
        info!("Selected `{name}`");
        self.open(&name);
    }

    /// Opens `<base folder>/<name>` with the editor command.
    ///
    /// The editor's output is discarded, so completion only waits for the
    /// launched process and not for windows it leaves running.
    pub fn open(&mut self, name: &str) {
        let folder = self.settings.folder_path(name);
        let command = CommandSpec::new([
            self.settings.editor_command.clone(),
            folder.to_string_lossy().into_owned(),
        ])
        .discard_output();

        self.run_command(command, folder, |_, _, folder| {
            debug!("Editor finished opening {}", folder.display());
        });
    }

    /// Drives `context` until every command issued so far has completed.
    pub fn run_until_idle(&mut self, context: &MainContext<Self>) {
        while self.in_flight > 0 {
            context.run_next(self, POLL_INTERVAL);
        }
    }

    /// Entries of the most recent listing.
    #[must_use]
    pub fn entries(&self) -> &[FolderEntry] {
        &self.entries
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Takes the failure that ended the session, if any.
    pub fn take_fatal(&mut self) -> Option<ExecutionFailure> {
        self.fatal.take()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Directory of the active file, else the first project folder.
    fn working_dir(&self) -> Option<PathBuf> {
        self.host
            .active_file()
            .and_then(|file| file.parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
            .or_else(|| self.host.project_folders().into_iter().next())
    }

    fn fallback_encoding(&self) -> Option<String> {
        self.host
            .fallback_encoding()
            .as_deref()
            .and_then(fallback_label)
            .or_else(|| {
                self.settings
                    .fallback_encoding
                    .as_deref()
                    .and_then(fallback_label)
            })
    }

    fn run_command<T, F>(&mut self, command: CommandSpec, data: T, on_success: F)
    where
        T: Send + 'static,
        F: FnOnce(&mut Self, String, T) + Send + 'static,
    {
        let command = match self.working_dir() {
            Some(working_dir) => command.with_working_dir(working_dir),
            None => command,
        };

        if self.settings.show_status {
            self.host.status_message(&command.to_string());
        }

        let options = ExecuteOptions::with_data(data).fallback_encoding(self.fallback_encoding());

        self.in_flight += 1;
        self.runner.execute(
            command,
            options,
            move |picker: &mut Self, completion: Completion<T>| {
                picker.in_flight = picker.in_flight.saturating_sub(1);

                match completion.result {
                    Ok(output) => on_success(picker, output, completion.data),
                    Err(failure) => picker.report_failure(&completion.command, failure),
                }
            },
        );
    }

    fn report_failure(&mut self, command: &CommandSpec, failure: ExecutionFailure) {
        match &failure {
            ExecutionFailure::ExecutableNotFound {
                program,
                search_path,
            } => {
                warn!("`{program}` is not on the PATH");
                let setting = if *program == self.settings.editor_command {
                    "editor_command"
                } else {
                    "list_command"
                };
                self.host.error_message(&format!(
                    "`{program}` could not be found in PATH\n\n\
                     Consider setting `{setting}` in the settings file\n\n\
                     PATH is: {search_path}"
                ));
            }
            ExecutionFailure::NonZeroExit { code } => {
                warn!("`{command}` exited with code {code}");
                self.host
                    .status_message(&format!("`{command}` exited with code {code}"));
            }
            _ => {
                error!("`{command}` failed: {failure}");
                self.host.error_message(&failure.to_string());
            }
        }

        if failure.is_fatal() {
            self.fatal = Some(failure);
        }
    }
}
