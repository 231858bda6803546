//! Type definitions for folder selection and UI state.

/// Represents the user's folder selection choice.
#[derive(Debug, PartialEq, Eq)]
pub enum FolderChoice {
    Index(usize),
    Quit,
}

/// A folder named on the command line, by name or by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preselection {
    name_or_index: String,
}

impl Preselection {
    #[must_use]
    pub fn new(name_or_index: impl Into<String>) -> Self {
        Self {
            name_or_index: name_or_index.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name_or_index
    }

    /// The position this names when no folder has it as its name.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.name_or_index.parse().ok()
    }
}

/// Direction to cycle through folders in the selection UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// The visible slice of the folder list.
#[derive(Clone, PartialEq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Complete UI state for the folder selection interface.
#[derive(Clone, PartialEq, Debug)]
pub struct UiState {
    /// Position of the highlighted row among the filtered rows
    pub selected_index: usize,
    pub viewport: ViewportState,
    pub is_filtering: bool,
    pub filter_text: String,
}

impl UiState {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            selected_index: 0,
            viewport: ViewportState {
                offset: 0,
                // header and filter line
                height: height.saturating_sub(2).max(1),
                width,
            },
            is_filtering: false,
            filter_text: String::new(),
        }
    }
}
