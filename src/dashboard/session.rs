use super::actions::ProjectActions;
use super::exporter::{self, ExportError, ExportFormat};
use super::history::{HistoryError, HistoryManager};
use super::importer::{self, ImportError};
use super::models::{DashboardState, LabelKind, Metric, Period};
use std::fmt;
use std::path::Path;

/// Owns the live dashboard and its history side by side. Every surface that
/// reads or edits the dashboard goes through a session handle.
#[derive(Debug)]
pub struct Session {
    state: DashboardState,
    history: HistoryManager,
}

impl Session {
    pub fn new(seed: DashboardState) -> Self {
        let mut history = HistoryManager::new();
        history.initialize(&seed);
        Self {
            state: seed,
            history,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Records `next` in history and makes it live. Returns `false` when `next`
    /// is identical to the live state, in which case nothing is recorded.
    pub fn apply(&mut self, label: impl Into<String>, next: DashboardState) -> bool {
        if next == self.state {
            return false;
        }
        let label = label.into();
        log::info!("{}", label);
        self.history.push(label, &next);
        self.state = next;
        true
    }

    pub fn rename_project(&mut self, id: u32, name: &str) -> Result<bool, SessionError> {
        let mut next = self.state.clone();
        let old_name = self.project_name(id)?;
        if !ProjectActions::rename_project(&mut next, id, name) {
            return Ok(false);
        }
        Ok(self.apply(format!("Renamed {} to {}", old_name, name), next))
    }

    pub fn set_metric(
        &mut self,
        id: u32,
        period: Period,
        metric: Metric,
        value: f64,
    ) -> Result<bool, SessionError> {
        let mut next = self.state.clone();
        let name = self.project_name(id)?;
        if !ProjectActions::set_metric(&mut next, id, period, metric, value) {
            return Ok(false);
        }
        let label = format!(
            "Updated {} {} for {}",
            self.state.period_header(period),
            metric.label(),
            name
        );
        Ok(self.apply(label, next))
    }

    pub fn set_label(&mut self, kind: LabelKind, text: &str) -> bool {
        let mut next = self.state.clone();
        if !ProjectActions::set_label(&mut next, kind, text) {
            return false;
        }
        self.apply(format!("Changed {}", kind.describe()), next)
    }

    /// Replaces the project list with the file's contents. A failed import
    /// leaves both the live state and the history untouched.
    pub fn import_file(&mut self, path: &Path) -> Result<usize, ImportError> {
        let projects = importer::import_projects(path)?;
        let count = projects.len();

        let mut next = self.state.clone();
        next.projects = projects;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.history.push(format!("Imported {}", file_name), &next);
        self.state = next;
        log::info!("session now holds {} imported projects", count);
        Ok(count)
    }

    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        exporter::export_to_file(&self.state, path, format)
    }

    /// Steps back one entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.state = previous;
                log::info!("undo, {} history entries remain", self.history.len());
                true
            }
            None => false,
        }
    }

    pub fn restore_to(&mut self, id: &str) -> Result<(), HistoryError> {
        let snapshot = self.history.restore_to(id)?;
        if let Some(entry) = self.history.get(id) {
            log::info!("restored '{}'", entry.label());
        }
        self.state = snapshot;
        Ok(())
    }

    fn project_name(&self, id: u32) -> Result<String, SessionError> {
        self.state
            .project(id)
            .map(|p| p.name.clone())
            .ok_or(SessionError::UnknownProject(id))
    }
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    UnknownProject(u32),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownProject(id) => write!(f, "No project with id {}", id),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::history::{INITIAL_LABEL, MAX_HISTORY};
    use crate::dashboard::models::{PeriodMetrics, Project, default_state};
    use std::fs;

    fn two_projects() -> DashboardState {
        DashboardState::new(vec![
            Project::new(
                1,
                "Alpha".to_string(),
                PeriodMetrics::new(10.0, 20.0, 300.0),
                PeriodMetrics::new(12.0, 22.0, 320.0),
            ),
            Project::new(
                2,
                "Beta".to_string(),
                PeriodMetrics::new(5.0, 8.0, 90.0),
                PeriodMetrics::new(6.0, 9.0, 95.0),
            ),
        ])
    }

    fn labels(session: &Session) -> Vec<String> {
        session.history().entries().map(|e| e.label().to_string()).collect()
    }

    #[test]
    fn test_new_session_has_initial_entry() {
        let session = Session::new(two_projects());
        assert_eq!(labels(&session), vec![INITIAL_LABEL]);
        assert_eq!(session.state(), &two_projects());
    }

    #[test]
    fn test_edit_edit_undo_scenario() {
        let mut session = Session::new(two_projects());

        assert!(session.rename_project(1, "Alpha Prime").unwrap());
        let after_a = session.state().clone();
        assert!(session.set_metric(2, Period::B, Metric::Revenue, 150.0).unwrap());

        assert_eq!(session.history().len(), 3);
        assert_eq!(labels(&session)[2], INITIAL_LABEL);
        assert_eq!(labels(&session)[1], "Renamed Alpha to Alpha Prime");
        assert_eq!(labels(&session)[0], "Updated December Comparison Revenue for Beta");

        assert!(session.undo());
        assert_eq!(session.state(), &after_a);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_undo_walks_back_without_growing() {
        let mut session = Session::new(two_projects());
        session.rename_project(1, "One").unwrap();
        session.rename_project(1, "Two").unwrap();

        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.state(), &two_projects());
        assert_eq!(labels(&session), vec![INITIAL_LABEL]);
    }

    #[test]
    fn test_unchanged_edit_is_not_recorded() {
        let mut session = Session::new(two_projects());
        assert!(!session.rename_project(1, "Alpha").unwrap());
        assert!(!session.set_metric(1, Period::A, Metric::Dau, 20.0).unwrap());
        assert!(!session.set_label(LabelKind::TableTitle, &two_projects().table_title));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_edit_unknown_project() {
        let mut session = Session::new(two_projects());
        assert_eq!(
            session.rename_project(42, "Nope"),
            Err(SessionError::UnknownProject(42))
        );
        assert_eq!(
            session.set_metric(42, Period::A, Metric::Dau, 1.0),
            Err(SessionError::UnknownProject(42))
        );
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_label_edits_are_recorded() {
        let mut session = Session::new(two_projects());
        assert!(session.set_label(LabelKind::PeriodAHeader, "Nov"));
        assert_eq!(session.state().period_a_header, "Nov");
        assert_eq!(labels(&session)[0], "Changed baseline header");

        assert!(session.undo());
        assert_eq!(session.state().period_a_header, "January Baseline");
    }

    #[test]
    fn test_history_stays_bounded() {
        let mut session = Session::new(two_projects());
        for i in 0..20 {
            session.rename_project(1, &format!("Alpha {}", i)).unwrap();
        }
        assert_eq!(session.history().len(), MAX_HISTORY);
        assert_eq!(session.state().projects[0].name, "Alpha 19");
    }

    #[test]
    fn test_restore_to_replaces_state_but_keeps_log() {
        let mut session = Session::new(two_projects());
        let initial_id = session.history().current().unwrap().id().to_string();
        session.rename_project(2, "Beta 2").unwrap();
        session.set_label(LabelKind::DashboardTitle, "Renamed board");

        session.restore_to(&initial_id).unwrap();
        assert_eq!(session.state(), &two_projects());
        assert_eq!(session.history().len(), 3);
        assert_eq!(labels(&session)[0], "Changed dashboard title");
    }

    #[test]
    fn test_restore_to_unknown_id_changes_nothing() {
        let mut session = Session::new(two_projects());
        session.rename_project(2, "Beta 2").unwrap();
        let before = session.state().clone();

        let result = session.restore_to("no-such-id");
        assert_eq!(result, Err(HistoryError::NotFound("no-such-id".to_string())));
        assert_eq!(session.state(), &before);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_import_pushes_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("january.csv");
        fs::write(
            &path,
            "Project ID,Project Name,Jan New Users,Jan DAU,Jan Revenue,Dec New Users,Dec DAU,Dec Revenue\n\
             1,Alpha,1,2,3,4,5,\n",
        )
        .unwrap();

        let mut session = Session::new(default_state());
        let count = session.import_file(&path).unwrap();

        assert_eq!(count, 1);
        assert_eq!(session.history().len(), 2);
        assert_eq!(labels(&session)[0], "Imported january.csv");
        assert_eq!(session.state().projects[0].period_b.revenue, 0.0);
        assert_eq!(session.state().dashboard_title, "Game Project KPI Dashboard");
    }

    #[test]
    fn test_failed_import_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "Project ID,Project Name\n1,\"unterminated\n").unwrap();

        let mut session = Session::new(default_state());
        session.rename_project(1, "Changed").unwrap();
        let before = session.state().clone();

        assert!(session.import_file(&path).is_err());
        assert!(session.import_file(&dir.path().join("missing.xlsx")).is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_export_does_not_push() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(default_state());
        session
            .export(&dir.path().join("out.csv"), ExportFormat::Csv)
            .unwrap();
        assert_eq!(session.history().len(), 1);
    }
}
