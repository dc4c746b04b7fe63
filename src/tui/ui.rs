use crate::dashboard::columns::{COLUMNS, Column};
use crate::dashboard::metrics::{self, KpiCard};
use crate::dashboard::models::{LabelKind, Metric, Period};
use crate::tui::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, ListState,
        Paragraph, Row, Table, TableState, Wrap,
    },
};

const PERIOD_A_COLOR: Color = Color::Gray;
const PERIOD_B_COLOR: Color = Color::Blue;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),       // Header
            Constraint::Length(5),       // KPI cards
            Constraint::Percentage(40),  // Chart
            Constraint::Min(6),          // Project table
            Constraint::Length(3),       // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);
    draw_kpi_cards(frame, chunks[1], app);
    draw_chart(frame, chunks[2], app);
    draw_project_table(frame, chunks[3], app);
    draw_footer(frame, chunks[4], app);

    if app.help_mode {
        draw_help_window(frame);
    } else if app.history_mode {
        draw_history_window(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_text = format!(
        "{} vs {}  |  History: {}/{}",
        app.label(LabelKind::PeriodAHeader),
        app.label(LabelKind::PeriodBHeader),
        app.session.history().len(),
        app.session.history().capacity()
    );
    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.label(LabelKind::DashboardTitle).to_string()),
        )
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(header, area);
}

fn draw_kpi_cards(frame: &mut Frame, area: Rect, app: &App) {
    let cards = metrics::kpi_cards(app.session.state());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32)))
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        frame.render_widget(kpi_card(card, app), *column);
    }
}

fn kpi_card<'a>(card: &KpiCard, app: &'a App) -> Paragraph<'a> {
    let change_color = match card.change {
        Some(ratio) if ratio > 0.0 => Color::Green,
        Some(ratio) if ratio < 0.0 => Color::Red,
        _ => Color::DarkGray,
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                metrics::format_value(card.metric, card.period_b),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                metrics::format_change(card.change),
                Style::default().fg(change_color),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{}: {}",
                app.label(LabelKind::PeriodAHeader),
                metrics::format_value(card.metric, card.period_a)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(card.title))
}

fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let metric = app.chart_metric;
    let series = metrics::comparison_series(app.session.state(), metric);

    let title = format!(
        "{} by project  (m: switch metric)  {} / {}",
        metric.label(),
        app.label(LabelKind::PeriodAHeader),
        app.label(LabelKind::PeriodBHeader)
    );
    let mut chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3);

    for (name, a, b) in &series {
        let bars = [
            chart_bar(metric, *a, PERIOD_A_COLOR),
            chart_bar(metric, *b, PERIOD_B_COLOR),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(name.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn chart_bar(metric: Metric, value: f64, color: Color) -> Bar<'static> {
    Bar::default()
        .value(value.max(0.0).round() as u64)
        .text_value(compact_value(metric, value))
        .style(Style::default().fg(color))
}

// Bars are narrow, so large values are shortened.
fn compact_value(metric: Metric, value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 10_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        metrics::format_value(metric, value)
    }
}

fn draw_project_table(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let header = Row::new(COLUMNS.iter().map(|(column, _, _)| {
        let text = match column {
            Column::Value(period, metric) => {
                let prefix = match period {
                    Period::A => "A",
                    Period::B => "B",
                };
                format!("{} {}", prefix, metric.label())
            }
            _ => column.header().to_string(),
        };
        Cell::from(text)
    }))
    .style(header_style);

    let rows: Vec<Row> = app
        .visible_rows()
        .into_iter()
        .enumerate()
        .filter_map(|(row_index, project_index)| {
            let project = state.projects.get(project_index)?;
            let is_selected = row_index == app.navigation.selected_row;

            let cells = COLUMNS.iter().enumerate().map(|(col_index, (column, _, _))| {
                let text = match column {
                    Column::Id => project.id.to_string(),
                    Column::Name => project.name.clone(),
                    Column::Value(period, metric) => metrics::format_value(
                        *metric,
                        metrics::metric_value(project, *period, *metric),
                    ),
                };
                let cell = Cell::from(text);
                if is_selected && col_index == app.navigation.selected_column {
                    cell.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    cell
                }
            });
            Some(Row::new(cells))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(14),
    ];

    let mut title = app.label(LabelKind::TableTitle).to_string();
    if app.search.is_filtering() {
        title = format!("{}  [filter: {}]", title, app.search.search_query.trim());
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut table_state = TableState::default();
    if !app.visible_rows().is_empty() {
        table_state.select(Some(app.navigation.selected_row));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = if app.edit.edit_mode {
        let prompt = app
            .edit
            .target
            .map(|target| target.prompt())
            .unwrap_or_default();
        let (before_cursor, after_cursor) =
            app.edit.edit_buffer.split_at(app.edit.edit_cursor_position);
        Paragraph::new(format!("{}{}█{}", prompt, before_cursor, after_cursor))
            .style(Style::default().fg(Color::White).bg(Color::Blue))
    } else if app.search.search_mode {
        Paragraph::new(format!("Search: {}█", app.search.search_query))
            .style(Style::default().fg(Color::White))
    } else if let Some(message) = &app.status_message {
        Paragraph::new(message.as_str()).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new(
            "↑↓←→: move | Enter: edit | u: undo | H: history | /: search | i/x: import/export | ?: help | q: quit",
        )
        .style(Style::default().fg(Color::Yellow))
    };

    frame.render_widget(footer.block(Block::default().borders(Borders::ALL)), area);
}

fn draw_history_window(frame: &mut Frame, app: &App) {
    let items: Vec<ListItem> = app
        .session
        .history()
        .entries()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if i == 0 { "●" } else { " " };
            let text = format!(
                "{} {}  {}",
                marker,
                entry.timestamp().format("%H:%M:%S"),
                entry.label()
            );
            let style = if i == 0 {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" History  (Enter: restore, u: undo, Esc: close) ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    list_state.select(Some(app.history_selected));

    let area = centered_rect(60, 50, frame.size());
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = [
        "KPI Dashboard - Keyboard Commands",
        "",
        "NAVIGATION:",
        "  ↑↓ / j/k          Select project",
        "  ←→ / h/l          Select column",
        "  /                 Filter projects by name or id",
        "  Esc               Clear filter",
        "",
        "EDITING:",
        "  Enter / e         Edit the focused cell",
        "  t / T             Edit dashboard / table title",
        "  a / b             Edit baseline / comparison header",
        "  Ctrl+W            Delete word while editing",
        "",
        "HISTORY:",
        "  u                 Undo last change",
        "  H                 Open history panel (Enter restores)",
        "",
        "DATA:",
        "  i                 Import projects from CSV or XLSX",
        "  x                 Export to CSV, XLSX or SVG report",
        "  m                 Switch chart metric",
        "",
        "OTHER:",
        "  ?                 Show this help (press ? or Esc to close)",
        "  q / Ctrl+C        Quit application",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help - Keyboard Commands ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    let area = centered_rect(80, 80, frame.size());
    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
