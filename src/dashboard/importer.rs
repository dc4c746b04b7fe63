use super::actions::coerce_metric;
use super::columns::Column;
use super::models::{PeriodMetrics, Project};
use calamine::{Data, Reader, open_workbook_auto};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

/// Reads projects from a CSV or spreadsheet file.
///
/// The first row is the header. Missing cells fall back to defaults: zero for
/// metrics, `Project <n>` for names and the row number for ids.
pub fn import_projects(path: &Path) -> Result<Vec<Project>, ImportError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => {
            let content = fs::read_to_string(path)
                .map_err(|e| ImportError::Io(format!("{}: {}", path.display(), e)))?;
            parse_csv(&content)?
        }
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path)?,
        _ => return Err(ImportError::UnsupportedFormat(path.display().to_string())),
    };

    let projects = projects_from_records(&records)?;
    log::info!("imported {} projects from {}", projects.len(), path.display());
    Ok(projects)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::Empty)?
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn parse_csv(content: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !quoted && field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quoted = true;
                quote_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                quoted = false;
                line += 1;
            }
            // Only whitespace may follow a closing quote.
            _ if quoted => {
                if !c.is_whitespace() {
                    return Err(ImportError::Malformed { line });
                }
            }
            '"' => return Err(ImportError::Malformed { line }),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ImportError::Malformed { line: quote_line });
    }
    if quoted || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Maps header-led records to projects, keeping ids unique.
pub fn projects_from_records(records: &[Vec<String>]) -> Result<Vec<Project>, ImportError> {
    let mut rows = records.iter();
    let header = rows.next().ok_or(ImportError::Empty)?;

    let mut columns: HashMap<Column, usize> = HashMap::new();
    for (index, title) in header.iter().enumerate() {
        if let Some(column) = Column::from_header(title) {
            columns.entry(column).or_insert(index);
        }
    }

    let mut projects = Vec::new();
    let mut used_ids = HashSet::new();

    let data_rows = rows.filter(|row| row.iter().any(|cell| !cell.trim().is_empty()));
    for (index, row) in data_rows.enumerate() {
        let row_number = index + 1;
        let cell = |column: Column| {
            columns
                .get(&column)
                .and_then(|&i| row.get(i))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let requested = parse_id(cell(Column::Id)).unwrap_or(row_number as u32);
        let id = if used_ids.contains(&requested) {
            next_free_id(&used_ids)
        } else {
            requested
        };
        used_ids.insert(id);

        let name = match cell(Column::Name) {
            "" => format!("Project {}", row_number),
            name => name.to_string(),
        };

        let mut project = Project::new(id, name, PeriodMetrics::default(), PeriodMetrics::default());
        for column in columns.keys() {
            if let Column::Value(period, metric) = *column {
                project.period_mut(period).set(metric, coerce_metric(cell(*column)));
            }
        }
        projects.push(project);
    }

    if projects.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(projects)
}

// One past the highest id, or the lowest free id once the top of the range is taken.
fn next_free_id(used_ids: &HashSet<u32>) -> u32 {
    used_ids
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .unwrap_or_else(|| (1..=u32::MAX).find(|id| !used_ids.contains(id)).unwrap_or(0))
}

fn parse_id(text: &str) -> Option<u32> {
    if let Ok(id) = text.parse::<u32>() {
        return (id > 0).then_some(id);
    }
    // Spreadsheets hand integers back as floats.
    let value = text.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value >= 1.0 && value <= u32::MAX as f64).then_some(value as u32)
}

#[derive(Debug)]
pub enum ImportError {
    Io(String),
    UnsupportedFormat(String),
    Spreadsheet(String),
    Malformed { line: usize },
    Empty,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(msg) => write!(f, "Failed to read import file: {}", msg),
            ImportError::UnsupportedFormat(path) => {
                write!(f, "Unsupported import format: {} (expected .csv or .xlsx)", path)
            }
            ImportError::Spreadsheet(msg) => write!(f, "Failed to read spreadsheet: {}", msg),
            ImportError::Malformed { line } => write!(f, "Malformed CSV near line {}", line),
            ImportError::Empty => write!(f, "Import file contains no project rows"),
        }
    }
}

impl std::error::Error for ImportError {}
