use crate::dashboard::actions::coerce_metric;
use crate::dashboard::columns::Column;
use crate::dashboard::exporter::{self, ExportFormat};
use crate::dashboard::models::{LabelKind, Metric, Project};
use crate::dashboard::session::{Session, SessionError};
use crate::tui::edit::{EditState, EditTarget};
use crate::tui::handlers::{
    EditModeAction, HelpModeAction, HistoryModeAction, KeyHandler, NormalModeAction,
    SearchModeAction,
};
use crate::tui::navigation::NavigationState;
use crate::tui::search::SearchState;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::{Path, PathBuf};

pub struct App {
    pub session: Session,
    pub should_quit: bool,
    pub help_mode: bool,
    pub history_mode: bool,
    pub history_selected: usize,
    pub chart_metric: Metric,
    pub status_message: Option<String>,
    pub edit: EditState,
    pub search: SearchState,
    pub navigation: NavigationState,
    export_dir: PathBuf,
}

impl App {
    pub fn new(session: Session, export_dir: PathBuf) -> Self {
        Self {
            session,
            should_quit: false,
            help_mode: false,
            history_mode: false,
            history_selected: 0,
            chart_metric: Metric::Revenue,
            status_message: None,
            edit: EditState::new(),
            search: SearchState::new(),
            navigation: NavigationState::new(),
            export_dir,
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.help_mode {
            self.handle_help_mode_key(key_event);
        } else if self.edit.edit_mode {
            self.handle_edit_mode_key(key_event);
        } else if self.history_mode {
            self.handle_history_mode_key(key_event);
        } else if self.search.search_mode {
            self.handle_search_mode_key(key_event);
        } else {
            self.handle_normal_mode_key(key_event);
        }
        Ok(())
    }

    fn handle_normal_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_normal_mode_key(key_event) {
            NormalModeAction::Quit => self.should_quit = true,
            NormalModeAction::ClearFilter => {
                self.search.clear_filter();
                self.status_message = None;
            }
            NormalModeAction::MoveSelectionUp => self.navigation.move_selection_up(),
            NormalModeAction::MoveSelectionDown => {
                let rows = self.visible_rows().len();
                self.navigation.move_selection_down(rows);
            }
            NormalModeAction::MoveColumnLeft => self.navigation.move_column_left(),
            NormalModeAction::MoveColumnRight => self.navigation.move_column_right(),
            NormalModeAction::EditCell => self.edit_selected_cell(),
            NormalModeAction::EditLabel(kind) => {
                let content = self.session.state().label(kind).to_string();
                self.edit.enter_edit_mode(EditTarget::Label(kind), content);
            }
            NormalModeAction::CycleMetric => self.chart_metric = self.chart_metric.next(),
            NormalModeAction::EnterSearchMode => self.search.enter_search_mode(),
            NormalModeAction::Undo => self.undo(),
            NormalModeAction::ToggleHistory => {
                self.history_mode = true;
                self.history_selected = 0;
            }
            NormalModeAction::PromptImport => {
                self.edit.enter_edit_mode(EditTarget::ImportPath, String::new());
            }
            NormalModeAction::PromptExport => {
                let path = exporter::default_export_path(
                    &self.export_dir,
                    self.session.state(),
                    ExportFormat::Xlsx,
                );
                self.edit
                    .enter_edit_mode(EditTarget::ExportPath, path.display().to_string());
            }
            NormalModeAction::ToggleHelpMode => self.help_mode = true,
            NormalModeAction::None => {}
        }
    }

    fn handle_help_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_help_mode_key(key_event) {
            HelpModeAction::ExitHelpMode => self.help_mode = false,
            HelpModeAction::None => {}
        }
    }

    fn handle_search_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_search_mode_key(key_event) {
            SearchModeAction::CancelSearch => self.search.cancel_search(),
            SearchModeAction::ConfirmSearch => self.search.confirm_search(),
            SearchModeAction::Backspace => self.search.backspace(),
            SearchModeAction::InsertChar(c) => self.search.insert_char(c),
            SearchModeAction::None => {}
        }
        let rows = self.visible_rows().len();
        self.navigation.clamp(rows);
    }

    fn handle_edit_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_edit_mode_key(key_event) {
            EditModeAction::CancelEdit => {
                self.edit.exit_edit_mode();
            }
            EditModeAction::ConfirmEdit => self.confirm_edit(),
            EditModeAction::Backspace => self.edit.backspace(),
            EditModeAction::Delete => self.edit.delete(),
            EditModeAction::DeleteWordBackward => self.edit.delete_word_backward(),
            EditModeAction::MoveCursorLeft => self.edit.move_cursor_left(),
            EditModeAction::MoveCursorRight => self.edit.move_cursor_right(),
            EditModeAction::MoveToPreviousWord => self.edit.move_to_previous_word(),
            EditModeAction::MoveToNextWord => self.edit.move_to_next_word(),
            EditModeAction::MoveCursorHome => self.edit.move_cursor_home(),
            EditModeAction::MoveCursorEnd => self.edit.move_cursor_end(),
            EditModeAction::InsertChar(c) => self.edit.insert_char(c),
            EditModeAction::None => {}
        }
    }

    fn handle_history_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_history_mode_key(key_event) {
            HistoryModeAction::Close => self.history_mode = false,
            HistoryModeAction::MoveSelectionUp => {
                self.history_selected = self.history_selected.saturating_sub(1);
            }
            HistoryModeAction::MoveSelectionDown => {
                if self.history_selected + 1 < self.session.history().len() {
                    self.history_selected += 1;
                }
            }
            HistoryModeAction::RestoreSelected => self.restore_selected(),
            HistoryModeAction::Undo => {
                self.undo();
                let last = self.session.history().len().saturating_sub(1);
                self.history_selected = self.history_selected.min(last);
            }
            HistoryModeAction::None => {}
        }
    }

    /// Indices into the project list that the table currently shows.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.search.visible_rows(&self.session.state().projects)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        let rows = self.visible_rows();
        let index = *rows.get(self.navigation.selected_row)?;
        self.session.state().projects.get(index)
    }

    fn edit_selected_cell(&mut self) {
        let Some(project) = self.selected_project() else {
            self.status_message = Some("No project selected".to_string());
            return;
        };

        let column = self.navigation.current_column();
        let content = match column {
            Column::Name => project.name.clone(),
            _ => column.value(project).unwrap_or_default().to_string(),
        };
        let target = EditTarget::Cell {
            project_id: project.id,
            column,
        };
        self.edit.enter_edit_mode(target, content);
    }

    fn confirm_edit(&mut self) {
        let Some((target, buffer)) = self.edit.exit_edit_mode() else {
            return;
        };

        match target {
            EditTarget::Cell { project_id, column } => {
                let result = match column {
                    Column::Name => {
                        let name = buffer.trim();
                        if name.is_empty() {
                            self.status_message = Some("Project name cannot be empty".to_string());
                            return;
                        }
                        self.session.rename_project(project_id, name)
                    }
                    Column::Value(period, metric) => {
                        self.session
                            .set_metric(project_id, period, metric, coerce_metric(&buffer))
                    }
                    Column::Id => Ok(false),
                };
                self.report_edit(result);
            }
            EditTarget::Label(kind) => {
                let changed = self.session.set_label(kind, buffer.trim());
                self.report_edit(Ok(changed));
            }
            EditTarget::ImportPath => self.import(Path::new(buffer.trim())),
            EditTarget::ExportPath => self.export(Path::new(buffer.trim())),
        }
    }

    fn report_edit(&mut self, result: Result<bool, SessionError>) {
        self.status_message = Some(match result {
            Ok(true) => match self.session.history().current() {
                Some(entry) => entry.label().to_string(),
                None => "Saved".to_string(),
            },
            Ok(false) => "No changes".to_string(),
            Err(e) => {
                log::warn!("edit rejected: {}", e);
                e.to_string()
            }
        });
    }

    fn import(&mut self, path: &Path) {
        if path.as_os_str().is_empty() {
            self.status_message = Some("Import cancelled".to_string());
            return;
        }

        self.status_message = Some(match self.session.import_file(path) {
            Ok(count) => {
                self.navigation.clamp(self.visible_rows().len());
                format!("Imported {} projects from {}", count, path.display())
            }
            Err(e) => {
                log::warn!("import of {} failed: {}", path.display(), e);
                format!("Import failed: {}", e)
            }
        });
    }

    fn export(&mut self, path: &Path) {
        let result = ExportFormat::from_path(path)
            .and_then(|format| self.session.export(path, format));

        self.status_message = Some(match result {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => {
                log::warn!("export to {} failed: {}", path.display(), e);
                format!("Export failed: {}", e)
            }
        });
    }

    fn undo(&mut self) {
        let label = self
            .session
            .history()
            .current()
            .map(|entry| entry.label().to_string());

        self.status_message = Some(if self.session.undo() {
            format!("Undid '{}'", label.unwrap_or_default())
        } else {
            "Nothing to undo".to_string()
        });
        self.navigation.clamp(self.visible_rows().len());
    }

    fn restore_selected(&mut self) {
        let Some(entry) = self.session.history().entries().nth(self.history_selected) else {
            return;
        };
        let id = entry.id().to_string();
        let label = entry.label().to_string();

        self.status_message = Some(match self.session.restore_to(&id) {
            Ok(()) => format!("Restored '{}'", label),
            Err(e) => e.to_string(),
        });
        self.history_mode = false;
        self.navigation.clamp(self.visible_rows().len());
    }

    pub fn label(&self, kind: LabelKind) -> &str {
        self.session.state().label(kind)
    }
}
