use crate::dashboard::models::LabelKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_normal_mode_key(key_event: KeyEvent) -> NormalModeAction {
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                NormalModeAction::Quit
            }
            KeyCode::Char('q') => NormalModeAction::Quit,
            KeyCode::Esc => NormalModeAction::ClearFilter,
            KeyCode::Up | KeyCode::Char('k') => NormalModeAction::MoveSelectionUp,
            KeyCode::Down | KeyCode::Char('j') => NormalModeAction::MoveSelectionDown,
            KeyCode::Left | KeyCode::Char('h') => NormalModeAction::MoveColumnLeft,
            KeyCode::Right | KeyCode::Char('l') => NormalModeAction::MoveColumnRight,
            KeyCode::Enter | KeyCode::Char('e') => NormalModeAction::EditCell,
            KeyCode::Char('m') => NormalModeAction::CycleMetric,
            KeyCode::Char('/') => NormalModeAction::EnterSearchMode,
            KeyCode::Char('u') => NormalModeAction::Undo,
            KeyCode::Char('H') => NormalModeAction::ToggleHistory,
            KeyCode::Char('t') => NormalModeAction::EditLabel(LabelKind::DashboardTitle),
            KeyCode::Char('T') => NormalModeAction::EditLabel(LabelKind::TableTitle),
            KeyCode::Char('a') => NormalModeAction::EditLabel(LabelKind::PeriodAHeader),
            KeyCode::Char('b') => NormalModeAction::EditLabel(LabelKind::PeriodBHeader),
            KeyCode::Char('i') => NormalModeAction::PromptImport,
            KeyCode::Char('x') => NormalModeAction::PromptExport,
            KeyCode::Char('?') => NormalModeAction::ToggleHelpMode,
            _ => NormalModeAction::None,
        }
    }

    pub fn handle_help_mode_key(key_event: KeyEvent) -> HelpModeAction {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => {
                HelpModeAction::ExitHelpMode
            }
            _ => HelpModeAction::None,
        }
    }

    pub fn handle_search_mode_key(key_event: KeyEvent) -> SearchModeAction {
        match key_event.code {
            KeyCode::Esc => SearchModeAction::CancelSearch,
            KeyCode::Enter => SearchModeAction::ConfirmSearch,
            KeyCode::Backspace => SearchModeAction::Backspace,
            KeyCode::Char(c) => SearchModeAction::InsertChar(c),
            _ => SearchModeAction::None,
        }
    }

    pub fn handle_edit_mode_key(key_event: KeyEvent) -> EditModeAction {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('w') if ctrl => EditModeAction::DeleteWordBackward,
            KeyCode::Left if ctrl => EditModeAction::MoveToPreviousWord,
            KeyCode::Right if ctrl => EditModeAction::MoveToNextWord,
            KeyCode::Esc => EditModeAction::CancelEdit,
            KeyCode::Enter => EditModeAction::ConfirmEdit,
            KeyCode::Backspace => EditModeAction::Backspace,
            KeyCode::Delete => EditModeAction::Delete,
            KeyCode::Left => EditModeAction::MoveCursorLeft,
            KeyCode::Right => EditModeAction::MoveCursorRight,
            KeyCode::Home => EditModeAction::MoveCursorHome,
            KeyCode::End => EditModeAction::MoveCursorEnd,
            KeyCode::Char(c) => EditModeAction::InsertChar(c),
            _ => EditModeAction::None,
        }
    }

    pub fn handle_history_mode_key(key_event: KeyEvent) -> HistoryModeAction {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('H') | KeyCode::Char('q') => HistoryModeAction::Close,
            KeyCode::Up | KeyCode::Char('k') => HistoryModeAction::MoveSelectionUp,
            KeyCode::Down | KeyCode::Char('j') => HistoryModeAction::MoveSelectionDown,
            KeyCode::Enter => HistoryModeAction::RestoreSelected,
            KeyCode::Char('u') => HistoryModeAction::Undo,
            _ => HistoryModeAction::None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NormalModeAction {
    None,
    Quit,
    ClearFilter,
    MoveSelectionUp,
    MoveSelectionDown,
    MoveColumnLeft,
    MoveColumnRight,
    EditCell,
    EditLabel(LabelKind),
    CycleMetric,
    EnterSearchMode,
    Undo,
    ToggleHistory,
    PromptImport,
    PromptExport,
    ToggleHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum HelpModeAction {
    None,
    ExitHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum SearchModeAction {
    None,
    CancelSearch,
    ConfirmSearch,
    Backspace,
    InsertChar(char),
}

#[derive(Debug, PartialEq)]
pub enum EditModeAction {
    None,
    CancelEdit,
    ConfirmEdit,
    Backspace,
    Delete,
    DeleteWordBackward,
    MoveCursorLeft,
    MoveCursorRight,
    MoveToPreviousWord,
    MoveToNextWord,
    MoveCursorHome,
    MoveCursorEnd,
    InsertChar(char),
}

#[derive(Debug, PartialEq)]
pub enum HistoryModeAction {
    None,
    Close,
    MoveSelectionUp,
    MoveSelectionDown,
    RestoreSelected,
    Undo,
}
