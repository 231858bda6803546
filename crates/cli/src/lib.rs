//! Folders CLI Library
//!
//! This crate provides the command-line interface for folders: it lists the
//! folders under the configured base folder, lets the user pick one in a
//! terminal quick panel and opens it with the configured editor.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and settings overrides
//! - [`command_selection`]: Interactive UI for picking a folder
//! - [`host`]: The terminal implementation of the picker's editor host
//! - [`dry_run`]: A spawner that prints the editor command instead of running it
//!
//! # Examples
//!
//! The CLI binary (`fo`) can be used in several ways:
//!
//! ```bash
//! # Interactive mode - shows the folder list
//! fo
//!
//! # Open a folder directly by name or index
//! fo my-project
//! fo 2
//!
//! # List a different base folder with another editor
//! fo --base-folder code --editor zed
//!
//! # Dry run (list folders, only print the editor command)
//! fo --dry-run my-project
//! ```

pub mod cli_args;
pub mod command_selection;
pub mod dry_run;
pub mod host;
