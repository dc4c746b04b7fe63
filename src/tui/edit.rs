use crate::dashboard::columns::Column;
use crate::dashboard::models::LabelKind;

/// What a confirmed edit buffer is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditTarget {
    Cell { project_id: u32, column: Column },
    Label(LabelKind),
    ImportPath,
    ExportPath,
}

impl EditTarget {
    pub fn prompt(&self) -> String {
        match self {
            EditTarget::Cell { column, .. } => format!("{}: ", column.header()),
            EditTarget::Label(kind) => format!("Set {}: ", kind.describe()),
            EditTarget::ImportPath => "Import from (.csv/.xlsx): ".to_string(),
            EditTarget::ExportPath => "Export to (.csv/.xlsx/.svg): ".to_string(),
        }
    }
}

/// Single-line editor. The cursor is a byte offset that always sits on a
/// char boundary of `edit_buffer`.
pub struct EditState {
    pub edit_mode: bool,
    pub edit_buffer: String,
    pub edit_cursor_position: usize,
    pub target: Option<EditTarget>,
}

impl EditState {
    pub fn new() -> Self {
        Self {
            edit_mode: false,
            edit_buffer: String::new(),
            edit_cursor_position: 0,
            target: None,
        }
    }

    pub fn enter_edit_mode(&mut self, target: EditTarget, content: String) {
        self.edit_buffer = content;
        self.edit_cursor_position = self.edit_buffer.len();
        self.target = Some(target);
        self.edit_mode = true;
    }

    /// Leaves edit mode and hands back what was being edited.
    pub fn exit_edit_mode(&mut self) -> Option<(EditTarget, String)> {
        self.edit_mode = false;
        self.edit_cursor_position = 0;
        let buffer = std::mem::take(&mut self.edit_buffer);
        self.target.take().map(|target| (target, buffer))
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_buffer.insert(self.edit_cursor_position, c);
        self.edit_cursor_position += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(start) = self.previous_boundary() {
            self.edit_buffer.remove(start);
            self.edit_cursor_position = start;
        }
    }

    pub fn delete(&mut self) {
        if self.edit_cursor_position < self.edit_buffer.len() {
            self.edit_buffer.remove(self.edit_cursor_position);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(start) = self.previous_boundary() {
            self.edit_cursor_position = start;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.edit_buffer[self.edit_cursor_position..].chars().next() {
            self.edit_cursor_position += c.len_utf8();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.edit_cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.edit_cursor_position = self.edit_buffer.len();
    }

    pub fn delete_word_backward(&mut self) {
        let start = self.previous_word_start();
        self.edit_buffer.replace_range(start..self.edit_cursor_position, "");
        self.edit_cursor_position = start;
    }

    pub fn move_to_previous_word(&mut self) {
        self.edit_cursor_position = self.previous_word_start();
    }

    pub fn move_to_next_word(&mut self) {
        let rest = &self.edit_buffer[self.edit_cursor_position..];
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let after_word = &rest[word_end..];
        let gap = after_word
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(after_word.len());
        self.edit_cursor_position += word_end + gap;
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.edit_buffer[..self.edit_cursor_position]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    // Skips trailing whitespace, then the word before it.
    fn previous_word_start(&self) -> usize {
        let before = &self.edit_buffer[..self.edit_cursor_position];
        let trimmed = before.trim_end();
        trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(content: &str) -> EditState {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode(EditTarget::ImportPath, content.to_string());
        edit_state
    }

    #[test]
    fn test_edit_state_new() {
        let edit_state = EditState::new();
        assert!(!edit_state.edit_mode);
        assert!(edit_state.edit_buffer.is_empty());
        assert_eq!(edit_state.edit_cursor_position, 0);
        assert!(edit_state.target.is_none());
    }

    #[test]
    fn test_enter_and_exit_edit_mode() {
        let mut edit_state = EditState::new();
        edit_state.enter_edit_mode(EditTarget::Label(LabelKind::TableTitle), "Hello".to_string());
        assert!(edit_state.edit_mode);
        assert_eq!(edit_state.edit_cursor_position, 5);

        let result = edit_state.exit_edit_mode();
        assert_eq!(
            result,
            Some((EditTarget::Label(LabelKind::TableTitle), "Hello".to_string()))
        );
        assert!(!edit_state.edit_mode);
        assert!(edit_state.edit_buffer.is_empty());
        assert_eq!(edit_state.exit_edit_mode(), None);
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut edit_state = editing("Hello");
        edit_state.insert_char('!');
        assert_eq!(edit_state.edit_buffer, "Hello!");
        assert_eq!(edit_state.edit_cursor_position, 6);

        edit_state.backspace();
        edit_state.backspace();
        assert_eq!(edit_state.edit_buffer, "Hell");
        assert_eq!(edit_state.edit_cursor_position, 4);
    }

    #[test]
    fn test_delete_at_start() {
        let mut edit_state = editing("Hello");
        edit_state.move_cursor_home();
        edit_state.delete();
        assert_eq!(edit_state.edit_buffer, "ello");
        assert_eq!(edit_state.edit_cursor_position, 0);
    }

    #[test]
    fn test_cursor_movement_over_multibyte_chars() {
        let mut edit_state = editing("项目A");
        assert_eq!(edit_state.edit_cursor_position, 7);

        edit_state.move_cursor_left();
        assert_eq!(edit_state.edit_cursor_position, 6);
        edit_state.move_cursor_left();
        assert_eq!(edit_state.edit_cursor_position, 3);

        edit_state.backspace();
        assert_eq!(edit_state.edit_buffer, "目A");
        assert_eq!(edit_state.edit_cursor_position, 0);

        edit_state.move_cursor_right();
        assert_eq!(edit_state.edit_cursor_position, 3);
        edit_state.insert_char('é');
        assert_eq!(edit_state.edit_buffer, "目éA");

        edit_state.move_cursor_end();
        edit_state.move_cursor_right();
        assert_eq!(edit_state.edit_cursor_position, edit_state.edit_buffer.len());
    }

    #[test]
    fn test_delete_word_backward() {
        let mut edit_state = editing("Hello world");
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "Hello ");
        assert_eq!(edit_state.edit_cursor_position, 6);

        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "");
        assert_eq!(edit_state.edit_cursor_position, 0);

        let mut edit_state = editing("foo bar baz");
        edit_state.edit_cursor_position = 7;
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "foo  baz");
        assert_eq!(edit_state.edit_cursor_position, 4);

        let mut edit_state = editing("test");
        edit_state.move_cursor_home();
        edit_state.delete_word_backward();
        assert_eq!(edit_state.edit_buffer, "test");
    }

    #[test]
    fn test_word_movement() {
        let mut edit_state = editing("hello world test");
        edit_state.move_to_previous_word();
        assert_eq!(edit_state.edit_cursor_position, 12);
        edit_state.move_to_previous_word();
        assert_eq!(edit_state.edit_cursor_position, 6);

        edit_state.move_cursor_home();
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 6);
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 12);
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 16);

        let mut edit_state = editing("word   test");
        edit_state.move_cursor_home();
        edit_state.move_to_next_word();
        assert_eq!(edit_state.edit_cursor_position, 7);
    }

    #[test]
    fn test_prompts() {
        let target = EditTarget::Cell { project_id: 1, column: Column::Name };
        assert_eq!(target.prompt(), "Project Name: ");
        assert_eq!(
            EditTarget::Label(LabelKind::DashboardTitle).prompt(),
            "Set dashboard title: "
        );
    }
}
