use crate::dashboard::columns::{COLUMNS, Column};

// Project ID is never editable from the table.
const FIRST_EDITABLE_COLUMN: usize = 1;

/// Cursor over the project table. `selected_row` indexes the visible
/// (filtered) rows, `selected_column` indexes `COLUMNS`.
pub struct NavigationState {
    pub selected_row: usize,
    pub selected_column: usize,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            selected_row: 0,
            selected_column: FIRST_EDITABLE_COLUMN,
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self, visible_rows: usize) {
        if self.selected_row + 1 < visible_rows {
            self.selected_row += 1;
        }
    }

    pub fn move_column_left(&mut self) {
        if self.selected_column > FIRST_EDITABLE_COLUMN {
            self.selected_column -= 1;
        }
    }

    pub fn move_column_right(&mut self) {
        if self.selected_column + 1 < COLUMNS.len() {
            self.selected_column += 1;
        }
    }

    pub fn current_column(&self) -> Column {
        COLUMNS[self.selected_column].0
    }

    /// Keeps the row cursor inside the table after it shrinks.
    pub fn clamp(&mut self, visible_rows: usize) {
        if self.selected_row >= visible_rows {
            self.selected_row = visible_rows.saturating_sub(1);
        }
    }
}
