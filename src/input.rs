//! Input event handling
//!
//! Translates keyboard events into app commands.

use crate::constants::{PAGE_STEP, SYSTEM_PRESETS};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What keys currently drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Single-key shortcuts on the parameter list
    #[default]
    Keys,
    /// Typing a text command after `:`
    CommandLine,
}

/// Command to execute on the App
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Quit,

    // Connection
    Connect,
    Disconnect,

    // Parameter list
    SelectPrev,
    SelectNext,
    /// Move the selected parameter by this many steps
    Adjust(i64),

    // Shortcuts
    TogglePower,
    NextPalette,
    CycleCrossfade,
    SystemPreset(usize),

    // Command line
    OpenCommandLine,
    InputChar(char),
    InputBackspace,
    SubmitInput,
    CancelInput,

    None,
}

/// Translate a key press into an AppCommand
pub fn translate_key(key: KeyEvent, mode: InputMode) -> AppCommand {
    // Raw mode swallows SIGINT
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return AppCommand::Quit;
    }

    match mode {
        InputMode::Keys => translate_shortcut(key.code),
        InputMode::CommandLine => match key.code {
            KeyCode::Esc => AppCommand::CancelInput,
            KeyCode::Enter => AppCommand::SubmitInput,
            KeyCode::Backspace => AppCommand::InputBackspace,
            KeyCode::Char(c) => AppCommand::InputChar(c),
            _ => AppCommand::None,
        },
    }
}

fn translate_shortcut(code: KeyCode) -> AppCommand {
    match code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => AppCommand::Quit,

        // Connection
        KeyCode::Char('c') | KeyCode::Char('C') => AppCommand::Connect,
        KeyCode::Char('d') | KeyCode::Char('D') => AppCommand::Disconnect,

        // Selection
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => AppCommand::SelectPrev,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => AppCommand::SelectNext,

        // Value
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => AppCommand::Adjust(-1),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => AppCommand::Adjust(1),
        KeyCode::PageDown => AppCommand::Adjust(-PAGE_STEP),
        KeyCode::PageUp => AppCommand::Adjust(PAGE_STEP),

        // Shortcuts
        KeyCode::Char('p') | KeyCode::Char('P') => AppCommand::TogglePower,
        KeyCode::Char('n') | KeyCode::Char('N') => AppCommand::NextPalette,
        KeyCode::Char('x') | KeyCode::Char('X') => AppCommand::CycleCrossfade,
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if index < SYSTEM_PRESETS.len() {
                AppCommand::SystemPreset(index)
            } else {
                AppCommand::None
            }
        }

        KeyCode::Char(':') => AppCommand::OpenCommandLine,

        _ => AppCommand::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            translate_key(key(KeyCode::Char('q')), InputMode::Keys),
            AppCommand::Quit
        );
        assert_eq!(
            translate_key(key(KeyCode::Esc), InputMode::Keys),
            AppCommand::Quit
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate_key(ctrl_c, InputMode::Keys), AppCommand::Quit);
        assert_eq!(
            translate_key(ctrl_c, InputMode::CommandLine),
            AppCommand::Quit
        );
    }

    #[test]
    fn test_adjust_keys() {
        assert_eq!(
            translate_key(key(KeyCode::Right), InputMode::Keys),
            AppCommand::Adjust(1)
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('h')), InputMode::Keys),
            AppCommand::Adjust(-1)
        );
        assert_eq!(
            translate_key(key(KeyCode::PageUp), InputMode::Keys),
            AppCommand::Adjust(PAGE_STEP)
        );
    }

    #[test]
    fn test_system_preset_digits() {
        assert_eq!(
            translate_key(key(KeyCode::Char('1')), InputMode::Keys),
            AppCommand::SystemPreset(0)
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('7')), InputMode::Keys),
            AppCommand::SystemPreset(6)
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('8')), InputMode::Keys),
            AppCommand::None
        );
    }

    #[test]
    fn test_command_line_takes_letters() {
        assert_eq!(
            translate_key(key(KeyCode::Char(':')), InputMode::Keys),
            AppCommand::OpenCommandLine
        );
        // Shortcut letters are text while typing
        assert_eq!(
            translate_key(key(KeyCode::Char('q')), InputMode::CommandLine),
            AppCommand::InputChar('q')
        );
        assert_eq!(
            translate_key(key(KeyCode::Esc), InputMode::CommandLine),
            AppCommand::CancelInput
        );
        assert_eq!(
            translate_key(key(KeyCode::Enter), InputMode::CommandLine),
            AppCommand::SubmitInput
        );
    }
}
