use super::models::{Metric, Period, Project};

/// A column of the tabular import/export layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    Value(Period, Metric),
}

/// Canonical header and its localized alias from the Chinese spreadsheet template.
pub const COLUMNS: [(Column, &str, &str); 8] = [
    (Column::Id, "Project ID", "项目ID"),
    (Column::Name, "Project Name", "项目名称"),
    (Column::Value(Period::A, Metric::NewUsers), "Jan New Users", "1月-新增"),
    (Column::Value(Period::A, Metric::Dau), "Jan DAU", "1月-DAU"),
    (Column::Value(Period::A, Metric::Revenue), "Jan Revenue", "1月-充值"),
    (Column::Value(Period::B, Metric::NewUsers), "Dec New Users", "12月-新增"),
    (Column::Value(Period::B, Metric::Dau), "Dec DAU", "12月-DAU"),
    (Column::Value(Period::B, Metric::Revenue), "Dec Revenue", "12月-充值"),
];

impl Column {
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        COLUMNS
            .iter()
            .find(|(_, canonical, alias)| {
                canonical.eq_ignore_ascii_case(header) || alias.eq_ignore_ascii_case(header)
            })
            .map(|(column, _, _)| *column)
    }

    pub fn header(self) -> &'static str {
        COLUMNS
            .iter()
            .find(|(column, _, _)| *column == self)
            .map(|(_, canonical, _)| *canonical)
            .unwrap_or_default()
    }

    pub fn headers() -> impl Iterator<Item = &'static str> {
        COLUMNS.iter().map(|(_, canonical, _)| *canonical)
    }

    pub fn value(self, project: &Project) -> Option<f64> {
        match self {
            Column::Value(period, metric) => Some(project.period(period).get(metric)),
            _ => None,
        }
    }
}
