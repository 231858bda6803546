use std::fmt::Display;
use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{
    DisableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::Color::{DarkBlue, DarkGreen, Reset, Yellow};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, event, execute, queue, terminal, ExecutableCommand};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use itertools::Itertools;

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, FolderChoice, UiState, ViewportState};
use folders_core::error::Result;
use folders_core::picker::FolderEntry;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

fn redraw_ui(ui_state: &UiState, indexes_to_display: &[usize], entries: &[FolderEntry]) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(ui_state, indexes_to_display.len())?;

    if indexes_to_display.is_empty() {
        queue!(
            stdout,
            SetForegroundColor(Color::Red),
            Print("No matching folders!".to_string()),
            SetAttribute(Attribute::Reset),
            cursor::MoveToNextLine(1)
        )?;
    } else {
        print_entries_with_selection(ui_state, entries, indexes_to_display)?;
    }

    if ui_state.is_filtering {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            Print(format!("Filter: {}", ui_state.filter_text)),
            SetAttribute(Attribute::Reset)
        )?;
    }

    stdout.flush()?;
    Ok(())
}

/// Prompts the user to choose a folder from the list
///
/// Returns the chosen position in `entries`, or [`FolderChoice::Quit`] when
/// the user cancels.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode or written to.
pub fn prompt_for_folder_choice(entries: &[FolderEntry]) -> Result<FolderChoice> {
    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode and mouse capture is disabled
    stdout.execute(event::EnableMouseCapture)?;

    let (width, height) = terminal::size()?;
    let mut ui_state = UiState::new(width, height);

    let mut indexes_to_display = filter_displayed_indexes(entries, &ui_state.filter_text);
    redraw_ui(&ui_state, &indexes_to_display, entries)?;

    let mut down_row: Option<u16> = None;

    loop {
        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let mut new_ui_state: Option<UiState> = None;
        let mut index_change_direction: Option<CycleDirection> = None;

        match event::read()? {
            Event::Mouse(MouseEvent {
                kind,
                row,
                modifiers,
                ..
            }) if modifiers == KeyModifiers::NONE => match kind {
                MouseEventKind::Down(MouseButton::Left) => down_row = Some(row),
                MouseEventKind::Up(MouseButton::Left) => {
                    if let Some(entry_index) = down_row
                        .take()
                        .and_then(|row| clicked_entry(row, &ui_state, &indexes_to_display))
                    {
                        return Ok(FolderChoice::Index(entry_index));
                    }
                }
                MouseEventKind::ScrollDown => index_change_direction = Some(Down),
                MouseEventKind::ScrollUp => index_change_direction = Some(Up),
                _ => {}
            },
            Event::Key(key_event) => {
                let (folder_choice, new_state, new_direction) =
                    handle_key_event(key_event, &ui_state, &indexes_to_display)?;

                if let Some(choice) = folder_choice {
                    return Ok(choice);
                }

                new_ui_state = new_state;
                index_change_direction = new_direction;
            }
            Event::Resize(width, height) => {
                new_ui_state = Some(handle_resize(
                    width,
                    height,
                    &ui_state,
                    indexes_to_display.len(),
                ));
            }
            _ => {}
        }

        if let Some(direction) = index_change_direction {
            new_ui_state = Some(move_selected_index(
                new_ui_state.as_ref().unwrap_or(&ui_state),
                indexes_to_display.len(),
                direction,
            ));
        }

        if let Some(mut state) = new_ui_state.filter(|state| *state != ui_state) {
            if state.filter_text != ui_state.filter_text {
                indexes_to_display = filter_displayed_indexes(entries, &state.filter_text);
                state.selected_index = 0;
                state.viewport.offset = 0;
            }

            redraw_ui(&state, &indexes_to_display, entries)?;
            ui_state = state;
        }
    }
}

/// The entry shown on a clicked screen row, if any
///
/// Row 0 is the header and the rows after the viewport hold the filter line.
fn clicked_entry(row: u16, ui_state: &UiState, indexes_to_display: &[usize]) -> Option<usize> {
    if row == 0 || row > ui_state.viewport.height {
        return None;
    }

    indexes_to_display
        .get((row - 1) as usize + ui_state.viewport.offset)
        .copied()
}

/// Handle keyboard events in the folder selection UI
fn handle_key_event(
    key_event: event::KeyEvent,
    ui_state: &UiState,
    indexes_to_display: &[usize],
) -> Result<(Option<FolderChoice>, Option<UiState>, Option<CycleDirection>)> {
    match key_event.code {
        KeyCode::Up => Ok((None, None, Some(Up))),
        KeyCode::Down => Ok((None, None, Some(Down))),
        KeyCode::Enter => {
            if let Some(entry_index) = indexes_to_display.get(ui_state.selected_index) {
                return Ok((Some(FolderChoice::Index(*entry_index)), None, None));
            }

            execute!(stdout(), Print("\x07"))?;
            Ok((None, None, None))
        }
        KeyCode::Backspace if !ui_state.filter_text.is_empty() => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.pop();
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Ok((Some(FolderChoice::Quit), None, None))
        }
        KeyCode::Char(c) if ui_state.is_filtering => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.push(c);
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Esc if ui_state.is_filtering => {
            let mut updated_state = ui_state.clone();
            updated_state.is_filtering = false;
            updated_state.filter_text.clear();
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Char('k') => Ok((None, None, Some(Up))),
        KeyCode::Char('j') => Ok((None, None, Some(Down))),
        KeyCode::Char('/') => {
            let mut updated_state = ui_state.clone();
            updated_state.is_filtering = true;
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Char('q') | KeyCode::Esc => Ok((Some(FolderChoice::Quit), None, None)),
        _ => Ok((None, None, None)),
    }
}

/// Handle window resize events
fn handle_resize(width: u16, height: u16, ui_state: &UiState, display_count: usize) -> UiState {
    let new_height = height.saturating_sub(2).max(1);
    let mut ui_state = ui_state.clone();
    let mut new_viewport = ViewportState {
        width,
        height: new_height,
        offset: ui_state.viewport.offset,
    };

    // If growing taller, try to show more items above current selection
    match new_height.cmp(&ui_state.viewport.height) {
        std::cmp::Ordering::Greater if new_viewport.offset > 0 => {
            let height_increase = new_height - ui_state.viewport.height;
            new_viewport.offset = new_viewport.offset.saturating_sub(height_increase as usize);
        }
        std::cmp::Ordering::Less
            if ui_state.selected_index >= new_viewport.offset + new_height as usize =>
        {
            new_viewport.offset = ui_state.selected_index.saturating_sub(new_height as usize - 1);

            if new_viewport.offset + new_height as usize > display_count {
                new_viewport.offset = display_count.saturating_sub(new_height as usize);
            }
        }
        _ => {}
    }

    ui_state.viewport = new_viewport;
    ui_state
}

/// Print the header for the folder selection UI
fn print_header(ui_state: &UiState, display_count: usize) -> Result<()> {
    let mut stdout = stdout();
    let width = ui_state.viewport.width as usize;

    let left_padding_size = 2usize;

    let left_padding = " ".repeat(left_padding_size);

    let instructions = if ui_state.is_filtering {
        "<esc>: Stop Filtering".to_string()
    } else {
        format!(
            "/: Begin Filtering   |   {}/{}   |   q: Quit",
            pad_to_width_of(ui_state.selected_index + 1, display_count),
            display_count
        )
    };

    let right_padding = " ".repeat(width.saturating_sub(left_padding_size + instructions.len()));

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(left_padding),
        Print(instructions),
        Print(right_padding),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = max_number.to_string().len();
    format!("{:>width$}", value.to_string())
}

/// Formats one panel row: the padded index and the entry's fields
fn format_row(entry_index: usize, entry: &FolderEntry, entry_count: usize) -> String {
    let index_as_string = pad_to_width_of(entry_index, entry_count.saturating_sub(1));
    format!("[{index_as_string}] {entry}")
}

/// Clear and write a folder row in the selection UI
fn clear_and_write_folder_row(
    row: u16,
    content: &str,
    is_selected: bool,
    terminal_width: u16,
) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, MoveTo(0, row), Clear(ClearType::CurrentLine))?;

    let padding = " ".repeat((terminal_width as usize).saturating_sub(content.chars().count()));

    if is_selected {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            SetBackgroundColor(DarkBlue),
            SetForegroundColor(Yellow),
        )?;
    }

    queue!(
        stdout,
        Print(content),
        Print(padding),
        SetAttribute(Attribute::Reset),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Print all visible folders with the selected one highlighted
fn print_entries_with_selection(
    ui_state: &UiState,
    entries: &[FolderEntry],
    indexes_to_display: &[usize],
) -> Result<()> {
    let mut stdout = stdout();

    let viewport = &ui_state.viewport;

    let visible_entries = indexes_to_display
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (row, (position, entry_index)) in visible_entries.enumerate() {
        let Some(entry) = entries.get(*entry_index) else {
            continue;
        };

        clear_and_write_folder_row(
            row as u16 + 1,
            &format_row(*entry_index, entry, entries.len()),
            position == ui_state.selected_index,
            viewport.width,
        )?;
        queue!(stdout, cursor::MoveToNextLine(1))?;
    }

    Ok(())
}

/// Move the selected index in the given direction
fn move_selected_index(
    ui_state: &UiState,
    display_count: usize,
    direction: CycleDirection,
) -> UiState {
    if display_count == 0 {
        return ui_state.clone();
    }

    let mut new_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();
    let height = ui_state.viewport.height.max(1) as usize;

    match direction {
        Up => {
            if new_index == 0 {
                new_index = display_count - 1;
                ui_state.viewport.offset = new_index.saturating_sub(height - 1);
            } else {
                new_index -= 1;
                if new_index < ui_state.viewport.offset {
                    ui_state.viewport.offset = new_index;
                }
            }
        }
        Down => {
            new_index = (new_index + 1) % display_count;
            if new_index < ui_state.selected_index {
                ui_state.viewport.offset = 0;
            } else if new_index >= ui_state.viewport.offset + height {
                ui_state.viewport.offset = new_index + 1 - height;
            }
        }
    }

    ui_state.selected_index = new_index;
    ui_state
}

/// Filter the displayed entry indexes by index or fuzzy name match
fn filter_displayed_indexes(entries: &[FolderEntry], predicate: &str) -> Vec<usize> {
    if predicate.is_empty() {
        return (0..entries.len()).collect();
    }

    let matcher = SkimMatcherV2::default();

    if predicate.parse::<usize>().is_ok() {
        // Index-based filtering
        return (0..entries.len())
            .filter(|i| i.to_string().contains(predicate))
            .collect();
    }

    // Fuzzy name-based filtering, best matches first
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            matcher
                .fuzzy_match(&entry.to_string(), predicate)
                .map(|score| (i, score))
        })
        .sorted_by(|(i1, s1), (i2, s2)| s2.cmp(s1).then(i1.cmp(i2)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<FolderEntry> {
        names
            .iter()
            .map(|name| FolderEntry::parse(name, '\u{7}'))
            .collect()
    }

    fn state(selected_index: usize, offset: usize, height: u16) -> UiState {
        UiState {
            selected_index,
            viewport: ViewportState {
                offset,
                height,
                width: 80,
            },
            is_filtering: false,
            filter_text: String::new(),
        }
    }

    #[test]
    fn test_filter_empty_predicate_shows_everything() {
        let entries = entries(&["alpha", "beta", "gamma"]);
        assert_eq!(filter_displayed_indexes(&entries, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_by_fuzzy_name() {
        let entries = entries(&["alpha", "beta", "gamma"]);
        assert_eq!(filter_displayed_indexes(&entries, "bt"), vec![1]);
        assert!(filter_displayed_indexes(&entries, "zzz").is_empty());
    }

    #[test]
    fn test_filter_by_index() {
        let names: Vec<String> = (0..12).map(|i| format!("folder{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let entries = entries(&names);

        assert_eq!(filter_displayed_indexes(&entries, "1"), vec![1, 10, 11]);
    }

    #[test]
    fn test_move_down_wraps_to_top() {
        let moved = move_selected_index(&state(2, 1, 2), 3, Down);
        assert_eq!(moved.selected_index, 0);
        assert_eq!(moved.viewport.offset, 0);
    }

    #[test]
    fn test_move_down_scrolls_viewport() {
        let moved = move_selected_index(&state(1, 0, 2), 5, Down);
        assert_eq!(moved.selected_index, 2);
        assert_eq!(moved.viewport.offset, 1);
    }

    #[test]
    fn test_move_up_wraps_to_bottom() {
        let moved = move_selected_index(&state(0, 0, 2), 5, Up);
        assert_eq!(moved.selected_index, 4);
        assert_eq!(moved.viewport.offset, 3);
    }

    #[test]
    fn test_move_with_nothing_displayed() {
        let current = state(0, 0, 2);
        assert_eq!(move_selected_index(&current, 0, Down), current);
    }

    #[test]
    fn test_resize_keeps_selection_visible() {
        let resized = handle_resize(80, 4, &state(5, 0, 10), 8);
        assert_eq!(resized.viewport.height, 2);
        assert_eq!(resized.viewport.offset, 4);
    }

    #[test]
    fn test_key_handling() {
        let entries_shown = [0, 2];
        let current = state(1, 0, 5);

        let (choice, _, _) = handle_key_event(
            event::KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            &current,
            &entries_shown,
        )
        .unwrap();
        assert_eq!(choice, Some(FolderChoice::Index(2)));

        let (choice, _, _) = handle_key_event(
            event::KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            &current,
            &entries_shown,
        )
        .unwrap();
        assert_eq!(choice, Some(FolderChoice::Quit));

        let (choice, _, _) = handle_key_event(
            event::KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &current,
            &entries_shown,
        )
        .unwrap();
        assert_eq!(choice, Some(FolderChoice::Quit));

        let (_, filtering, _) = handle_key_event(
            event::KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE),
            &current,
            &entries_shown,
        )
        .unwrap();
        let filtering = filtering.unwrap();
        assert!(filtering.is_filtering);

        let (choice, typed, _) = handle_key_event(
            event::KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            &filtering,
            &entries_shown,
        )
        .unwrap();
        assert!(choice.is_none());
        assert_eq!(typed.unwrap().filter_text, "q");
    }

    #[test]
    fn test_clicks_only_hit_visible_rows() {
        let indexes: Vec<usize> = (0..10).collect();
        let current = state(0, 3, 4);

        assert_eq!(clicked_entry(0, &current, &indexes), None);
        assert_eq!(clicked_entry(1, &current, &indexes), Some(3));
        assert_eq!(clicked_entry(4, &current, &indexes), Some(6));
        // The filter line below the last visible row
        assert_eq!(clicked_entry(5, &current, &indexes), None);
    }

    #[test]
    fn test_click_past_short_list() {
        let indexes = [4, 7];
        assert_eq!(clicked_entry(2, &state(0, 0, 5), &indexes), Some(7));
        assert_eq!(clicked_entry(3, &state(0, 0, 5), &indexes), None);
    }

    #[test]
    fn test_format_row() {
        let entry = FolderEntry::parse("web\u{7}main", '\u{7}');
        assert_eq!(format_row(3, &entry, 12), "[ 3] web  main");
    }
}
