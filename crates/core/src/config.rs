//! Settings and settings file paths.
//!
//! Settings are read once at startup and handed to the picker explicitly;
//! nothing in the core looks them up on its own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default path for the settings file
const DEFAULT_SETTINGS_PATH: &str = "~/.folders/settings.yml";

/// Bell character, which never shows up in folder names.
pub const DEFAULT_FIELD_SEPARATOR: char = '\u{7}';

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Folder under the home directory whose children are listed.
    pub base_folder: String,
    /// Executable that opens a folder.
    pub editor_command: String,
    /// Executable that lists the base folder.
    pub list_command: String,
    /// Splits a listing line into at most three fields.
    pub field_separator: String,
    /// Encoding to try when output is not UTF-8, e.g. `Western (Windows 1252)`.
    pub fallback_encoding: Option<String>,
    /// Show each command in the status line before running it.
    pub show_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_folder: "Projects".to_string(),
            editor_command: "subl".to_string(),
            list_command: "ls".to_string(),
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
            fallback_encoding: None,
            show_status: true,
        }
    }
}

impl Settings {
    /// The listed directory: `base_folder` under the home directory.
    ///
    /// `~` is expanded, and an absolute `base_folder` is used as-is.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        let home = shellexpand::tilde("~");
        let base_folder = shellexpand::tilde(&self.base_folder);

        PathBuf::from(home.as_ref()).join(base_folder.as_ref())
    }

    #[must_use]
    pub fn folder_path(&self, name: &str) -> PathBuf {
        self.base_path().join(name)
    }

    /// The configured field separator as a single character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeparator`] unless the setting is exactly one
    /// character long.
    pub fn separator(&self) -> Result<char> {
        let mut chars = self.field_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(separator), None) => Ok(separator),
            _ => Err(Error::InvalidSeparator(self.field_separator.clone())),
        }
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use folders_core::config::get_settings_path;
///
/// let default_path = get_settings_path(&None);
/// assert!(default_path.ends_with("settings.yml"));
///
/// let custom_path = get_settings_path(&Some("/path/to/settings.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/settings.yml");
/// ```
#[must_use]
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path,
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~").as_ref())
    }

    #[test]
    fn test_get_settings_path_with_custom_path() {
        let custom_path = Some("/custom/path/settings.yml".to_string());
        assert_eq!(get_settings_path(&custom_path), "/custom/path/settings.yml");
    }

    #[test]
    fn test_get_settings_path_with_none() {
        let result = get_settings_path(&None);
        assert!(result.contains("settings.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_base_path_is_under_home() {
        let settings = Settings {
            base_folder: "code".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.base_path(), home().join("code"));
        assert_eq!(settings.folder_path("beta"), home().join("code").join("beta"));
    }

    #[test]
    fn test_base_path_accepts_tilde_and_absolute() {
        let tilde = Settings {
            base_folder: "~/work".to_string(),
            ..Settings::default()
        };
        assert_eq!(tilde.base_path(), home().join("work"));

        let absolute = Settings {
            base_folder: "/srv/repos".to_string(),
            ..Settings::default()
        };
        assert_eq!(absolute.base_path(), PathBuf::from("/srv/repos"));
    }

    #[test]
    fn test_separator_must_be_one_character() {
        assert_eq!(Settings::default().separator().unwrap(), '\u{7}');

        let tab = Settings {
            field_separator: "\t".to_string(),
            ..Settings::default()
        };
        assert_eq!(tab.separator().unwrap(), '\t');

        for invalid in ["", "ab"] {
            let settings = Settings {
                field_separator: invalid.to_string(),
                ..Settings::default()
            };
            assert!(matches!(
                settings.separator(),
                Err(Error::InvalidSeparator(_))
            ));
        }
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("base_folder: repos\n").unwrap();
        assert_eq!(settings.base_folder, "repos");
        assert_eq!(settings.editor_command, "subl");
        assert_eq!(settings.list_command, "ls");
        assert!(settings.show_status);
    }
}
