//! The editor around the picker.
//!
//! A [`Host`] provides what the picker needs from the editor it runs in:
//! where the user currently is, per-view settings, and ways to show things.

use std::path::PathBuf;

use crate::picker::FolderEntry;

/// Quick panel result when the user dismissed it without choosing.
pub const CANCELLED: isize = -1;

pub trait Host {
    /// File open in the active view, if any.
    fn active_file(&self) -> Option<PathBuf>;

    /// Folders of the current project, in display order.
    fn project_folders(&self) -> Vec<PathBuf>;

    /// Raw `fallback_encoding` setting of the active view.
    fn fallback_encoding(&self) -> Option<String>;

    /// Shows `entries` for selection and returns the chosen index, or
    /// [`CANCELLED`].
    fn show_quick_panel(&mut self, entries: &[FolderEntry]) -> isize;

    fn status_message(&mut self, message: &str);

    fn error_message(&mut self, message: &str);
}
