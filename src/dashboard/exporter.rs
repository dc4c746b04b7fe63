use super::columns::{COLUMNS, Column};
use super::models::DashboardState;
use super::report;
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SHEET_NAME: &str = "KPI Comparison";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Svg,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Svg => "svg",
        }
    }
}

/// Writes the given state to `path`. Exporting never touches history.
pub fn export_to_file(state: &DashboardState, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => {
            fs::write(path, serialize_csv(state))
                .map_err(|e| ExportError::Io(format!("{}: {}", path.display(), e)))?;
        }
        ExportFormat::Xlsx => write_xlsx(state, path)?,
        ExportFormat::Svg => {
            let svg = report::render_svg(state).map_err(|e| ExportError::Render(e.to_string()))?;
            fs::write(path, svg).map_err(|e| ExportError::Io(format!("{}: {}", path.display(), e)))?;
        }
    }

    log::info!("exported {} projects to {}", state.projects.len(), path.display());
    Ok(())
}

/// `<dir>/<dashboard title>.<ext>`, with characters that are awkward in file names replaced.
pub fn default_export_path(dir: &Path, state: &DashboardState, format: ExportFormat) -> PathBuf {
    let stem: String = state
        .dashboard_title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "dashboard".to_string() } else { stem };

    dir.join(format!("{}.{}", stem, format.extension()))
}

pub fn serialize_csv(state: &DashboardState) -> String {
    let mut lines = Vec::with_capacity(state.projects.len() + 1);
    lines.push(Column::headers().map(escape_csv).collect::<Vec<_>>().join(","));

    for project in &state.projects {
        let row: Vec<String> = COLUMNS
            .iter()
            .map(|(column, _, _)| match column {
                Column::Id => project.id.to_string(),
                Column::Name => escape_csv(&project.name),
                Column::Value(..) => column.value(project).unwrap_or_default().to_string(),
            })
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n") + "\n"
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_xlsx(state: &DashboardState, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in Column::headers().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (index, project) in state.projects.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, (column, _, _)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            match column {
                Column::Id => {
                    sheet.write_number(row, col, project.id as f64)?;
                }
                Column::Name => {
                    sheet.write_string(row, col, project.name.as_str())?;
                }
                Column::Value(..) => {
                    sheet.write_number(row, col, column.value(project).unwrap_or_default())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[derive(Debug)]
pub enum ExportError {
    Io(String),
    UnsupportedFormat(String),
    Spreadsheet(String),
    Render(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(msg) => write!(f, "Failed to write export file: {}", msg),
            ExportError::UnsupportedFormat(path) => {
                write!(f, "Unsupported export format: {} (expected .csv, .xlsx or .svg)", path)
            }
            ExportError::Spreadsheet(msg) => write!(f, "Failed to write spreadsheet: {}", msg),
            ExportError::Render(msg) => write!(f, "Failed to render report: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}
