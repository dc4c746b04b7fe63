use super::models::{DashboardState, LabelKind, Metric, Period};

/// Pure edits over a dashboard state. Each returns `true` when it changed something.
pub struct ProjectActions;

impl ProjectActions {
    pub fn rename_project(state: &mut DashboardState, id: u32, name: &str) -> bool {
        match state.projects.iter_mut().find(|p| p.id == id) {
            Some(project) if project.name != name => {
                project.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_metric(
        state: &mut DashboardState,
        id: u32,
        period: Period,
        metric: Metric,
        value: f64,
    ) -> bool {
        let Some(project) = state.projects.iter_mut().find(|p| p.id == id) else {
            return false;
        };

        let metrics = project.period_mut(period);
        if metrics.get(metric) == value {
            return false;
        }
        metrics.set(metric, value);
        true
    }

    pub fn set_label(state: &mut DashboardState, kind: LabelKind, text: &str) -> bool {
        let label = state.label_mut(kind);
        if label == text {
            return false;
        }
        *label = text.to_string();
        true
    }
}

/// Turns typed input into a metric value: separators are dropped, and anything
/// unparseable, negative or non-finite becomes zero.
pub fn coerce_metric(input: &str) -> f64 {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::models::default_state;

    #[test]
    fn test_rename_project() {
        let mut state = default_state();
        assert!(ProjectActions::rename_project(&mut state, 2, "Dragon Arena II"));
        assert_eq!(state.project(2).unwrap().name, "Dragon Arena II");
    }

    #[test]
    fn test_rename_to_same_name_is_not_a_change() {
        let mut state = default_state();
        assert!(!ProjectActions::rename_project(&mut state, 3, "Pixel Farm"));
    }

    #[test]
    fn test_rename_unknown_project() {
        let mut state = default_state();
        let before = state.clone();
        assert!(!ProjectActions::rename_project(&mut state, 99, "Ghost"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_metric() {
        let mut state = default_state();
        assert!(ProjectActions::set_metric(&mut state, 1, Period::B, Metric::Dau, 170_000.0));
        assert_eq!(state.project(1).unwrap().period_b.dau, 170_000.0);
        assert_eq!(state.project(1).unwrap().period_a.dau, 152_000.0);

        assert!(!ProjectActions::set_metric(&mut state, 1, Period::B, Metric::Dau, 170_000.0));
    }

    #[test]
    fn test_set_label() {
        let mut state = default_state();
        assert!(ProjectActions::set_label(&mut state, LabelKind::TableTitle, "Q4 review"));
        assert_eq!(state.table_title, "Q4 review");
        assert!(!ProjectActions::set_label(&mut state, LabelKind::TableTitle, "Q4 review"));
    }

    #[test]
    fn test_coerce_metric() {
        assert_eq!(coerce_metric("1200"), 1200.0);
        assert_eq!(coerce_metric(" 1,284,500.75 "), 1_284_500.75);
        assert_eq!(coerce_metric("-5"), 0.0);
        assert_eq!(coerce_metric("abc"), 0.0);
        assert_eq!(coerce_metric(""), 0.0);
        assert_eq!(coerce_metric("inf"), 0.0);
        assert_eq!(coerce_metric("NaN"), 0.0);
    }
}
