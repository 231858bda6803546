//! Interactive folder selection.
//!
//! This module provides the terminal quick panel for folders: a scrollable
//! list of the listed folders that can be filtered and picked from.
//!
//! # User Interface
//!
//! The interface supports:
//! - Arrow keys, j/k or the mouse wheel to move the selection
//! - Enter or a click to open a folder
//! - '/' to filter folders by fuzzy name or index
//! - 'q', Escape or Ctrl-C to cancel

pub mod types;
pub mod ui;

pub use types::{FolderChoice, Preselection};
pub use ui::prompt_for_folder_choice;
