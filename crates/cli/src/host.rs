//! The terminal as an editor host.

use std::path::PathBuf;

use crossterm::style::Stylize;
use log::{debug, info};

use crate::command_selection::{prompt_for_folder_choice, FolderChoice, Preselection};
use folders_core::error::{Error, Result};
use folders_core::host::{Host, CANCELLED};
use folders_core::picker::FolderEntry;

/// Hosts the picker in a terminal session.
///
/// The quick panel is the interactive folder list, unless a folder was
/// already named on the command line. Messages are written to stderr.
#[derive(Debug, Default)]
pub struct TerminalHost {
    file: Option<PathBuf>,
    project_folders: Vec<PathBuf>,
    fallback_encoding: Option<String>,
    preselection: Option<Preselection>,
    selection_error: Option<Error>,
}

impl TerminalHost {
    #[must_use]
    pub fn new(
        file: Option<PathBuf>,
        project_folders: Vec<PathBuf>,
        fallback_encoding: Option<String>,
    ) -> Self {
        Self {
            file,
            project_folders,
            fallback_encoding,
            ..Self::default()
        }
    }

    /// Picks the folder named by `name_or_index` instead of prompting.
    #[must_use]
    pub fn with_preselection(mut self, name_or_index: Option<&str>) -> Self {
        self.preselection = name_or_index.map(Preselection::new);
        self
    }

    /// Takes the error that stopped the last selection, if any.
    pub fn take_selection_error(&mut self) -> Option<Error> {
        self.selection_error.take()
    }

    fn select(&self, entries: &[FolderEntry]) -> Result<Option<usize>> {
        match &self.preselection {
            Some(preselection) => resolve_preselection(preselection, entries).map(Some),
            None => match prompt_for_folder_choice(entries)? {
                FolderChoice::Index(index) => Ok(Some(index)),
                FolderChoice::Quit => Ok(None),
            },
        }
    }
}

/// Finds the entry named on the command line.
///
/// An exact name match wins, so folders with numeric names stay reachable.
/// Otherwise a number is taken as the position in the listing.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfRange`] for an index past the last entry and
/// [`Error::FolderNotFound`] when no entry has the given name.
pub fn resolve_preselection(preselection: &Preselection, entries: &[FolderEntry]) -> Result<usize> {
    if let Some(position) = entries
        .iter()
        .position(|entry| entry.name() == preselection.name())
    {
        return Ok(position);
    }

    match preselection.index() {
        Some(index) if index < entries.len() => Ok(index),
        Some(index) => Err(Error::IndexOutOfRange(index)),
        None => Err(Error::FolderNotFound(preselection.name().to_string())),
    }
}

impl Host for TerminalHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }

    fn project_folders(&self) -> Vec<PathBuf> {
        self.project_folders.clone()
    }

    fn fallback_encoding(&self) -> Option<String> {
        self.fallback_encoding.clone()
    }

    fn show_quick_panel(&mut self, entries: &[FolderEntry]) -> isize {
        match self.select(entries) {
            Ok(Some(index)) => {
                debug!("Picked entry {index} of {}", entries.len());
                isize::try_from(index).unwrap_or(CANCELLED)
            }
            Ok(None) => {
                info!("Selection cancelled");
                CANCELLED
            }
            Err(e) => {
                self.selection_error = Some(e);
                CANCELLED
            }
        }
    }

    fn status_message(&mut self, message: &str) {
        eprintln!("{}", message.dark_grey());
    }

    fn error_message(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }
}
