//! Folders Core Library
//!
//! This crate provides the core functionality for folders, a small tool that
//! lists the folders under a base directory, lets the user pick one and opens
//! it in an editor.
//!
//! # Key Features
//!
//! - **Background Execution**: Commands run on worker threads and report back
//!   to a single serialized main context
//! - **Output Decoding**: UTF-8 first, with a configurable fallback encoding
//! - **Explicit Failures**: Missing executables, nonzero exits and launch
//!   errors are distinct variants delivered through the same callback
//! - **Folder Picking**: Listing, selection and opening driven against a
//!   pluggable editor [`host::Host`]
//! - **Configuration Management**: YAML settings with sensible defaults
//!
//! # Examples
//!
//! Listing and opening a folder with the real process spawner:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folders_core::config::Settings;
//! use folders_core::dispatch::MainContext;
//! use folders_core::host::Host;
//! use folders_core::picker::{FolderEntry, FolderPicker};
//! use folders_core::runner::ProcessRunner;
//! use folders_core::spawn::SystemSpawner;
//!
//! struct FirstFolder;
//!
//! impl Host for FirstFolder {
//!     fn active_file(&self) -> Option<std::path::PathBuf> { None }
//!     fn project_folders(&self) -> Vec<std::path::PathBuf> { Vec::new() }
//!     fn fallback_encoding(&self) -> Option<String> { None }
//!     fn show_quick_panel(&mut self, _entries: &[FolderEntry]) -> isize { 0 }
//!     fn status_message(&mut self, message: &str) { println!("{message}") }
//!     fn error_message(&mut self, message: &str) { eprintln!("{message}") }
//! }
//!
//! let context = MainContext::new();
//! let runner = ProcessRunner::new(Arc::new(SystemSpawner), context.scheduler());
//! let mut picker = FolderPicker::new(Settings::default(), FirstFolder, runner)?;
//!
//! picker.list();
//! picker.run_until_idle(&context);
//! # Ok::<(), folders_core::error::Error>(())
//! ```

pub mod command;
pub mod config;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod file_handling;
pub mod host;
pub mod picker;
pub mod runner;
pub mod spawn;
