use super::models::{DashboardState, Metric, Period, PeriodMetrics, Project};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub period_a: PeriodMetrics,
    pub period_b: PeriodMetrics,
}

impl Totals {
    pub fn from_state(state: &DashboardState) -> Self {
        state.projects.iter().fold(Totals::default(), |mut totals, project| {
            for metric in Metric::ALL {
                let a = totals.period_a.get(metric) + project.period_a.get(metric);
                let b = totals.period_b.get(metric) + project.period_b.get(metric);
                totals.period_a.set(metric, a);
                totals.period_b.set(metric, b);
            }
            totals
        })
    }

    pub fn get(&self, period: Period, metric: Metric) -> f64 {
        match period {
            Period::A => self.period_a.get(metric),
            Period::B => self.period_b.get(metric),
        }
    }
}

pub fn metric_value(project: &Project, period: Period, metric: Metric) -> f64 {
    project.period(period).get(metric)
}

/// Relative change from `a` to `b`; undefined when the baseline is zero.
pub fn change_ratio(a: f64, b: f64) -> Option<f64> {
    if a == 0.0 { None } else { Some((b - a) / a) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub metric: Metric,
    pub period_a: f64,
    pub period_b: f64,
    pub change: Option<f64>,
}

pub fn kpi_cards(state: &DashboardState) -> Vec<KpiCard> {
    let totals = Totals::from_state(state);
    [
        ("Total Revenue", Metric::Revenue),
        ("Total New Users", Metric::NewUsers),
        ("Combined DAU", Metric::Dau),
    ]
    .into_iter()
    .map(|(title, metric)| {
        let period_a = totals.get(Period::A, metric);
        let period_b = totals.get(Period::B, metric);
        KpiCard {
            title,
            metric,
            period_a,
            period_b,
            change: change_ratio(period_a, period_b),
        }
    })
    .collect()
}

/// One `(name, period A, period B)` triple per project, in display order.
pub fn comparison_series(state: &DashboardState, metric: Metric) -> Vec<(String, f64, f64)> {
    state
        .projects
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                metric_value(p, Period::A, metric),
                metric_value(p, Period::B, metric),
            )
        })
        .collect()
}

pub fn format_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Revenue => format_number(value, 2),
        Metric::NewUsers | Metric::Dau => format_number(value.round(), 0),
    }
}

pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(ratio) => format!("{:+.1}%", ratio * 100.0),
        None => "n/a".to_string(),
    }
}

fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole.to_string(), Some(fraction.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::models::default_state;

    fn sample() -> DashboardState {
        DashboardState::new(vec![
            Project::new(
                1,
                "A".to_string(),
                PeriodMetrics::new(100.0, 1000.0, 50.5),
                PeriodMetrics::new(150.0, 900.0, 60.0),
            ),
            Project::new(
                2,
                "B".to_string(),
                PeriodMetrics::new(0.0, 500.0, 49.5),
                PeriodMetrics::new(50.0, 600.0, 40.0),
            ),
        ])
    }

    #[test]
    fn test_totals() {
        let totals = Totals::from_state(&sample());
        assert_eq!(totals.period_a, PeriodMetrics::new(100.0, 1500.0, 100.0));
        assert_eq!(totals.period_b, PeriodMetrics::new(200.0, 1500.0, 100.0));
    }

    #[test]
    fn test_totals_of_empty_state() {
        let totals = Totals::from_state(&DashboardState::new(Vec::new()));
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_change_ratio() {
        assert_eq!(change_ratio(100.0, 150.0), Some(0.5));
        assert_eq!(change_ratio(200.0, 150.0), Some(-0.25));
        assert_eq!(change_ratio(0.0, 10.0), None);
    }

    #[test]
    fn test_kpi_cards() {
        let cards = kpi_cards(&sample());
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].metric, Metric::Revenue);
        assert_eq!(cards[0].change, Some(0.0));
        assert_eq!(cards[1].title, "Total New Users");
        assert_eq!(cards[1].change, Some(1.0));
        assert_eq!(cards[2].period_a, 1500.0);
    }

    #[test]
    fn test_comparison_series_keeps_display_order() {
        let state = default_state();
        let series = comparison_series(&state, Metric::Dau);
        assert_eq!(series.len(), state.projects.len());
        assert_eq!(series[0], ("Star Rail Odyssey".to_string(), 152_000.0, 163_400.0));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Metric::Revenue, 1_284_500.0), "1,284,500.00");
        assert_eq!(format_value(Metric::Revenue, 574_120.5), "574,120.50");
        assert_eq!(format_value(Metric::Dau, 152_000.4), "152,000");
        assert_eq!(format_value(Metric::NewUsers, 999.0), "999");
        assert_eq!(format_value(Metric::NewUsers, 0.0), "0");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(0.125)), "+12.5%");
        assert_eq!(format_change(Some(-0.05)), "-5.0%");
        assert_eq!(format_change(None), "n/a");
    }
}
