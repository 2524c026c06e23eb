use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap};

use super::app::{FacetItem, FacetKind, Focus, MessageType, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::{PLACEHOLDER, format_date_cell, value_or_placeholder};
use crate::filters::FilterState;
use crate::filters::dates::completion_month_label;
use crate::models::{TaskField, TaskRecord};
use crate::utils::terminal::{display_cell, strip_ansi_codes};

const TEXT: Color = Color::Rgb(250, 250, 250);
const MUTED: Color = Color::Rgb(113, 113, 122);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Columns shown in the results table
const RESULT_COLUMNS: [(TaskField, &str); 5] = [
    (TaskField::TaskId, "ID"),
    (TaskField::Name, "Task Name"),
    (TaskField::Section, "Section"),
    (TaskField::Assignee, "Assignee"),
    (TaskField::CompletedAt, "Completed"),
];

/// Everything the renderer reads from the app for one frame
pub struct RenderState<'a> {
    pub input: &'a str,
    pub focus: Focus,
    pub filters: &'a FilterState,
    pub facet_items: &'a [FacetItem],
    pub facet_idx: usize,
    pub page_records: &'a [&'a TaskRecord],
    pub selected_idx: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub filter_error: Option<&'a str>,
    pub load_error: Option<&'a str>,
    pub loading: bool,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_input(frame, layout.input_area, state);
    render_facets(frame, layout.facets_area, state);
    render_results(frame, layout.results_area, state);
    render_preview(frame, layout.preview_area, state.page_records.get(state.selected_idx).copied());
    render_status_bar(frame, layout.status_area, state);
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { ACCENT } else { MUTED };
    Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)).title(title)
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState) {
    let paragraph = Paragraph::new(state.input).block(panel(" Query (filter | search) ", false));
    frame.render_widget(paragraph, area);
}

fn is_facet_active(item: &FacetItem, filters: &FilterState) -> bool {
    match item.kind {
        FacetKind::Status => filters.selected_statuses().contains(&item.value),
        FacetKind::Assignee => filters.selected_assignee() == item.value,
        FacetKind::Month => filters.completion_month() == item.value,
    }
}

fn facet_heading(kind: FacetKind) -> &'static str {
    match kind {
        FacetKind::Status => "Status",
        FacetKind::Assignee => "Assignee",
        FacetKind::Month => "Completed",
    }
}

fn render_facets(frame: &mut Frame, area: Rect, state: &RenderState) {
    let focused = state.focus == Focus::Facets;
    let mut items = Vec::with_capacity(state.facet_items.len() + 3);
    let mut last_kind = None;

    for (idx, item) in state.facet_items.iter().enumerate() {
        if last_kind != Some(item.kind) {
            items.push(ListItem::new(Line::from(Span::styled(
                facet_heading(item.kind),
                Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
            ))));
            last_kind = Some(item.kind);
        }

        let marker = if is_facet_active(item, state.filters) { "[x]" } else { "[ ]" };
        let content = format!(" {} {}", marker, display_cell(&item.value));
        let style = if focused && idx == state.facet_idx {
            Style::default().fg(TEXT).bg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        items.push(ListItem::new(content).style(style));
    }

    let title = match state.filters.active_count() {
        0 => " Filters ".to_string(),
        n => format!(" Filters ({} active) ", n),
    };
    frame.render_widget(List::new(items).block(panel(&title, focused)), area);
}

fn result_cell(record: &TaskRecord, field: TaskField) -> String {
    match field {
        TaskField::CompletedAt => format_date_cell(record.get(field)),
        _ => display_cell(value_or_placeholder(record.get(field))),
    }
}

fn render_results(frame: &mut Frame, area: Rect, state: &RenderState) {
    let header = Row::new(RESULT_COLUMNS.iter().map(|(_, label)| Cell::from(*label)))
        .style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .page_records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let cells = RESULT_COLUMNS.iter().map(|(field, _)| Cell::from(result_cell(record, *field)));
            let style = if idx == state.selected_idx && state.focus == Focus::Results {
                Style::default().fg(TEXT).bg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(13),
    ];
    let title = format!(" Tasks (page {} of {}) ", state.current_page, state.total_pages);
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, state.focus == Focus::Results));

    frame.render_widget(table, area);
}

/// Label/value lines for every field of a record
fn preview_lines(record: &TaskRecord) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(MUTED);
    let mut lines = Vec::new();

    for field in TaskField::ALL {
        let value = match field {
            TaskField::CreatedAt | TaskField::CompletedAt => format_date_cell(record.get(field)),
            TaskField::Notes => continue,
            _ => display_cell(value_or_placeholder(record.get(field))),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.header()), label_style),
            Span::raw(value),
        ]));
    }

    let month = completion_month_label(record.get(TaskField::CompletedAt))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    lines.push(Line::from(vec![Span::styled("Completion month: ", label_style), Span::raw(month)]));

    for (header, value) in &record.extra {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", display_cell(header)), label_style),
            Span::raw(display_cell(value_or_placeholder(Some(value)))),
        ]));
    }

    lines.push(Line::from(""));
    match record.get(TaskField::Notes) {
        Some(notes) if !notes.trim().is_empty() => {
            for line in strip_ansi_codes(notes).lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        _ => lines.push(Line::from(Span::styled(PLACEHOLDER, label_style))),
    }

    lines
}

fn render_preview(frame: &mut Frame, area: Rect, record: Option<&TaskRecord>) {
    let content = match record {
        Some(record) => Text::from(preview_lines(record)),
        None => Text::from("No task selected"),
    };

    let paragraph = Paragraph::new(content).block(panel(" Preview ", false)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn status_text(state: &RenderState) -> (String, Style) {
    let normal = Style::default().fg(TEXT).bg(BAR_BG);
    let error = Style::default().fg(ERROR).bg(BAR_BG);

    if let Some(msg) = state.status_message {
        let style = match msg.message_type {
            MessageType::Success => Style::default().fg(ACCENT).bg(BAR_BG),
            MessageType::Error => error,
        };
        return (format!(" {} ", msg.text), style);
    }

    if let Some(load_error) = state.load_error {
        return (format!(" [LOAD ERROR] {} | Esc: dismiss ", load_error), error);
    }

    if let Some(filter_error) = state.filter_error {
        return (format!(" [ERROR] {} ", filter_error), error);
    }

    let mut parts = vec![];
    if state.loading {
        parts.push("[LOADING]".to_string());
    }

    if state.filtered_count == 0 {
        parts.push("No matching tasks".to_string());
    } else if state.filtered_count < state.total_count {
        parts.push(format!("{} of {} tasks", state.filtered_count, state.total_count));
    } else {
        parts.push(format!("{} tasks", state.total_count));
    }

    parts.push("Tab: facets".to_string());
    parts.push("Enter: apply".to_string());
    parts.push("PgUp/PgDn: page".to_string());
    parts.push("Ctrl+Y: export".to_string());
    parts.push("Ctrl+X: clear".to_string());
    parts.push("Ctrl+R: reload".to_string());
    parts.push("Ctrl+C: quit".to_string());

    (format!(" {} ", parts.join(" | ")), normal)
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = status_text(state);
    frame.render_widget(Paragraph::new(text).style(style), area);
}
