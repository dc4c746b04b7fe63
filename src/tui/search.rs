use crate::dashboard::models::Project;

/// Live filter over the project table. An empty query shows every project.
pub struct SearchState {
    pub search_mode: bool,
    pub search_query: String,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            search_mode: false,
            search_query: String::new(),
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_query.clear();
    }

    pub fn confirm_search(&mut self) {
        self.search_mode = false;
    }

    pub fn insert_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn backspace(&mut self) {
        self.search_query.pop();
    }

    pub fn clear_filter(&mut self) {
        self.search_query.clear();
    }

    pub fn is_filtering(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    pub fn matches(&self, project: &Project) -> bool {
        let query = self.search_query.trim().to_lowercase();
        query.is_empty()
            || project.name.to_lowercase().contains(&query)
            || project.id.to_string().contains(&query)
    }

    /// Indices into `projects` that pass the filter, in display order.
    pub fn visible_rows(&self, projects: &[Project]) -> Vec<usize> {
        projects
            .iter()
            .enumerate()
            .filter(|(_, project)| self.matches(project))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::models::default_state;

    fn search(query: &str) -> SearchState {
        let mut search_state = SearchState::new();
        search_state.enter_search_mode();
        for c in query.chars() {
            search_state.insert_char(c);
        }
        search_state
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let state = default_state();
        let search_state = SearchState::new();
        assert!(!search_state.is_filtering());
        assert_eq!(search_state.visible_rows(&state.projects).len(), state.projects.len());
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let state = default_state();
        let search_state = search("DRAGON");
        let rows = search_state.visible_rows(&state.projects);
        assert_eq!(rows.len(), 1);
        assert_eq!(state.projects[rows[0]].name, "Dragon Arena");
    }

    #[test]
    fn test_filter_by_id() {
        let state = default_state();
        let search_state = search("3");
        let rows = search_state.visible_rows(&state.projects);
        assert_eq!(rows, vec![2]);
    }

    #[test]
    fn test_filter_by_partial_id() {
        let projects: Vec<Project> = [1, 10, 11, 2, 21]
            .into_iter()
            .map(|id| Project::new(id, format!("Game {}", id), Default::default(), Default::default()))
            .collect();
        let search_state = search("1");
        assert_eq!(search_state.visible_rows(&projects), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_filter_without_matches() {
        let state = default_state();
        let search_state = search("zzz");
        assert!(search_state.visible_rows(&state.projects).is_empty());
    }

    #[test]
    fn test_confirm_keeps_filter_and_cancel_clears_it() {
        let mut search_state = search("neon");
        search_state.confirm_search();
        assert!(!search_state.search_mode);
        assert!(search_state.is_filtering());

        search_state.enter_search_mode();
        search_state.backspace();
        search_state.cancel_search();
        assert!(!search_state.search_mode);
        assert!(!search_state.is_filtering());
    }

    #[test]
    fn test_clear_filter() {
        let mut search_state = search("pixel");
        search_state.confirm_search();
        search_state.clear_filter();
        assert!(!search_state.is_filtering());
    }
}
