use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodMetrics {
    pub new_users: f64,
    pub dau: f64,
    pub revenue: f64,
}

impl PeriodMetrics {
    pub fn new(new_users: f64, dau: f64, revenue: f64) -> Self {
        Self {
            new_users,
            dau,
            revenue,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::NewUsers => self.new_users,
            Metric::Dau => self.dau,
            Metric::Revenue => self.revenue,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::NewUsers => self.new_users = value,
            Metric::Dau => self.dau = value,
            Metric::Revenue => self.revenue = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    NewUsers,
    Dau,
    Revenue,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Revenue, Metric::Dau, Metric::NewUsers];

    /// Chart selector order: revenue, DAU, new users, then back to revenue.
    pub fn next(self) -> Self {
        match self {
            Metric::Revenue => Metric::Dau,
            Metric::Dau => Metric::NewUsers,
            Metric::NewUsers => Metric::Revenue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::NewUsers => "New Users",
            Metric::Dau => "DAU",
            Metric::Revenue => "Revenue",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub period_a: PeriodMetrics,
    pub period_b: PeriodMetrics,
}

impl Project {
    pub fn new(id: u32, name: String, period_a: PeriodMetrics, period_b: PeriodMetrics) -> Self {
        Self {
            id,
            name,
            period_a,
            period_b,
        }
    }

    pub fn period(&self, period: Period) -> &PeriodMetrics {
        match period {
            Period::A => &self.period_a,
            Period::B => &self.period_b,
        }
    }

    pub fn period_mut(&mut self, period: Period) -> &mut PeriodMetrics {
        match period {
            Period::A => &mut self.period_a,
            Period::B => &mut self.period_b,
        }
    }
}

/// One of the four free-text labels shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    DashboardTitle,
    TableTitle,
    PeriodAHeader,
    PeriodBHeader,
}

impl LabelKind {
    pub fn describe(self) -> &'static str {
        match self {
            LabelKind::DashboardTitle => "dashboard title",
            LabelKind::TableTitle => "table title",
            LabelKind::PeriodAHeader => "baseline header",
            LabelKind::PeriodBHeader => "comparison header",
        }
    }
}

/// The editable dataset. `Clone` is the snapshot operation used by the history log.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub projects: Vec<Project>,
    pub dashboard_title: String,
    pub table_title: String,
    pub period_a_header: String,
    pub period_b_header: String,
}

impl DashboardState {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            dashboard_title: "Game Project KPI Dashboard".to_string(),
            table_title: "All Projects: January vs December".to_string(),
            period_a_header: "January Baseline".to_string(),
            period_b_header: "December Comparison".to_string(),
        }
    }

    pub fn label(&self, kind: LabelKind) -> &str {
        match kind {
            LabelKind::DashboardTitle => &self.dashboard_title,
            LabelKind::TableTitle => &self.table_title,
            LabelKind::PeriodAHeader => &self.period_a_header,
            LabelKind::PeriodBHeader => &self.period_b_header,
        }
    }

    pub fn label_mut(&mut self, kind: LabelKind) -> &mut String {
        match kind {
            LabelKind::DashboardTitle => &mut self.dashboard_title,
            LabelKind::TableTitle => &mut self.table_title,
            LabelKind::PeriodAHeader => &mut self.period_a_header,
            LabelKind::PeriodBHeader => &mut self.period_b_header,
        }
    }

    pub fn period_header(&self, period: Period) -> &str {
        match period {
            Period::A => &self.period_a_header,
            Period::B => &self.period_b_header,
        }
    }

    pub fn project(&self, id: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn total_projects(&self) -> usize {
        self.projects.len()
    }
}

/// The built-in roster the dashboard starts from when no seed file is configured.
pub fn default_state() -> DashboardState {
    let projects = vec![
        Project::new(
            1,
            "Star Rail Odyssey".to_string(),
            PeriodMetrics::new(48_200.0, 152_000.0, 1_284_500.0),
            PeriodMetrics::new(51_900.0, 163_400.0, 1_402_300.0),
        ),
        Project::new(
            2,
            "Dragon Arena".to_string(),
            PeriodMetrics::new(22_450.0, 87_300.0, 612_800.0),
            PeriodMetrics::new(19_800.0, 81_050.0, 574_120.5),
        ),
        Project::new(
            3,
            "Pixel Farm".to_string(),
            PeriodMetrics::new(15_300.0, 40_200.0, 98_400.0),
            PeriodMetrics::new(18_750.0, 46_900.0, 121_650.0),
        ),
        Project::new(
            4,
            "Neon Racer".to_string(),
            PeriodMetrics::new(9_800.0, 27_600.0, 143_900.0),
            PeriodMetrics::new(12_100.0, 30_450.0, 151_280.0),
        ),
        Project::new(
            5,
            "Mystic Legends".to_string(),
            PeriodMetrics::new(31_700.0, 120_800.0, 955_000.0),
            PeriodMetrics::new(28_400.0, 114_300.0, 903_750.0),
        ),
        Project::new(
            6,
            "Ocean Tycoon".to_string(),
            PeriodMetrics::new(6_200.0, 18_900.0, 45_300.0),
            PeriodMetrics::new(7_950.0, 21_400.0, 52_880.0),
        ),
    ];

    DashboardState::new(projects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_ids_are_unique() {
        let state = default_state();
        let mut ids: Vec<u32> = state.projects.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), state.total_projects());
    }

    #[test]
    fn test_metric_cycle_returns_to_start() {
        let start = Metric::Revenue;
        assert_eq!(start.next(), Metric::Dau);
        assert_eq!(start.next().next(), Metric::NewUsers);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_period_metrics_get_and_set() {
        let mut metrics = PeriodMetrics::default();
        metrics.set(Metric::Revenue, 12.5);
        metrics.set(Metric::Dau, 3.0);
        assert_eq!(metrics.get(Metric::Revenue), 12.5);
        assert_eq!(metrics.get(Metric::Dau), 3.0);
        assert_eq!(metrics.get(Metric::NewUsers), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = default_state();
        let mut copy = original.clone();
        copy.projects[0].name = "Renamed".to_string();
        copy.projects[0].period_a.revenue = 1.0;
        copy.table_title.push('!');

        assert_eq!(original.projects[0].name, "Star Rail Odyssey");
        assert_eq!(original.projects[0].period_a.revenue, 1_284_500.0);
        assert_eq!(original.table_title, "All Projects: January vs December");
    }

    #[test]
    fn test_clone_keeps_numeric_edge_cases() {
        let mut state = DashboardState::new(vec![Project::new(
            1,
            "Edge".to_string(),
            PeriodMetrics::new(-0.0, f64::MAX, 0.1 + 0.2),
            PeriodMetrics::new(f64::MIN_POSITIVE, 1e-300, 9_007_199_254_740_993.0),
        )]);
        state.dashboard_title = String::new();

        let copy = state.clone();
        let (a, b) = (&copy.projects[0].period_a, &copy.projects[0].period_b);
        assert!(a.new_users.is_sign_negative());
        assert_eq!(a.dau, f64::MAX);
        assert_eq!(a.revenue.to_bits(), (0.1f64 + 0.2).to_bits());
        assert_eq!(b.new_users, f64::MIN_POSITIVE);
        assert_eq!(b.dau, 1e-300);
        assert_eq!(b.revenue, 9_007_199_254_740_993.0);
    }

    #[test]
    fn test_label_accessors() {
        let mut state = default_state();
        *state.label_mut(LabelKind::PeriodBHeader) = "Q4".to_string();
        assert_eq!(state.label(LabelKind::PeriodBHeader), "Q4");
        assert_eq!(state.period_header(Period::B), "Q4");
        assert_eq!(state.period_header(Period::A), "January Baseline");
    }
}
