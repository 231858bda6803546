//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate, and how its options override the settings file.

use std::path::PathBuf;

use clap::Parser;
use folders_core::config::Settings;

/// Command-line arguments for the folders CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use folders_cli::cli_args::Args;
///
/// let args = Args::parse_from(["fo", "--base-folder", "code"]);
/// assert_eq!(args.base_folder.as_deref(), Some("code"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the settings file YAML.
    ///
    /// If not provided, defaults to `~/.folders/settings.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Folder under the home directory to list, overriding `base_folder`.
    #[arg(long, short = 'b')]
    pub base_folder: Option<String>,

    /// Executable used to open the chosen folder, overriding `editor_command`.
    #[arg(long, short = 'e')]
    pub editor: Option<String>,

    /// The file currently being edited. Commands run in its directory.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Project folder; commands run in the first one when no file is given.
    ///
    /// Multiple folders can be provided with repeated `-p` flags.
    #[arg(long = "project", short = 'p', action = clap::ArgAction::Append)]
    pub project_folders: Vec<PathBuf>,

    /// Encoding to try when command output is not UTF-8, e.g. `Windows 1252`.
    #[arg(long)]
    pub fallback_encoding: Option<String>,

    /// Perform a dry run, which lists folders but only prints the editor
    /// command instead of running it.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Do not echo commands before running them.
    #[arg(long, short = 'q', action)]
    pub quiet: bool,

    /// Folder name or index to open directly.
    ///
    /// If not provided, interactive mode is used. Can be either:
    /// - A folder name as listed
    /// - A numeric index (0-based position in the listing)
    #[arg(num_args(1))]
    pub name_or_index: Option<String>,
}

impl Args {
    /// Applies command-line overrides on top of the loaded settings.
    #[must_use]
    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(base_folder) = &self.base_folder {
            settings.base_folder.clone_from(base_folder);
        }

        if let Some(editor) = &self.editor {
            settings.editor_command.clone_from(editor);
        }

        if self.quiet {
            settings.show_status = false;
        }

        settings
    }
}
