use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::api::TaskApi;
use crate::form::Form;
use crate::kanban_board::KanbanBoard;
use crate::task::{format_hours, Task, TaskStatus};
use crate::ui::Mode;

const HELP: &str =
    "q quit  a add  s settings  r refresh  ←→ column  ↑↓ task  [ ] move  Enter details";

pub fn draw<A: TaskApi>(f: &mut Frame, board: &KanbanBoard<A>, mode: &Mode) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_columns(f, rows[0], board);
    draw_status_bar(f, rows[1], board);

    match mode {
        Mode::Board => {}
        Mode::Form(form) => draw_form(f, form),
        Mode::Details(id) => {
            if let Ok(task) = board.find(*id) {
                draw_details(f, task);
            }
        }
        Mode::Message(message) => draw_message(f, message),
    }
}

fn column_title<A: TaskApi>(board: &KanbanBoard<A>, status: TaskStatus, count: usize) -> String {
    match status {
        TaskStatus::InProgress => format!(" {} ({}/{}) ", status, count, board.max_in_progress),
        _ => format!(" {} ({}) ", status, count),
    }
}

fn task_item(task: &Task) -> ListItem<'_> {
    let mut title = vec![
        Span::raw(format!("#{} ", task.id)),
        Span::styled(task.title.as_str(), Style::default().fg(Color::White)),
    ];
    if task.estimate() > 0.0 {
        title.push(Span::styled(
            format!(" ({}h est.)", format_hours(task.estimate())),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(title)];
    if let Some(description) = task.description() {
        lines.push(Line::from(Span::styled(
            format!("  {description}"),
            Style::default().fg(Color::Gray),
        )));
    }
    ListItem::new(lines)
}

fn draw_columns<A: TaskApi>(f: &mut Frame, area: Rect, board: &KanbanBoard<A>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let tasks = board.get_tasks_by_status(*status);
        let mut items: Vec<ListItem> = Vec::new();

        // Notices only ever go in the first column.
        let mut offset = 0;
        if *status == TaskStatus::Todo {
            if let Some(error) = &board.load_error {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!("Error: {error}"),
                    Style::default().fg(Color::Red),
                ))));
                offset = 1;
            } else if board.tasks.is_empty() {
                items.push(ListItem::new("No tasks yet."));
            }
        }
        items.extend(tasks.iter().copied().map(task_item));

        let selected = board.selected_status == i;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(column_title(board, *status, tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if selected && !tasks.is_empty() {
            state.select(Some(board.selected_task + offset));
        }
        f.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn draw_status_bar<A: TaskApi>(f: &mut Frame, area: Rect, board: &KanbanBoard<A>) {
    let updated = board
        .fetched_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_owned());
    let line = Line::from(vec![
        Span::styled(
            format!(" updated {updated} "),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(
            " WIP {}/{}  ",
            board.in_progress_count(),
            board.max_in_progress
        )),
        Span::styled(HELP, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// A rect of `width_percent` of the area's width and `height` rows, centered.
fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

fn popup(f: &mut Frame, title: &str, lines: Vec<Line>, border: Color) {
    let area = centered(f.area(), 60, lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!(" {title} "))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            ),
        area,
    );
}

fn draw_form(f: &mut Frame, form: &Form) {
    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>16}: ", field.label()), label_style),
                Span::raw(format!("{}{}", field.display(), cursor)),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Tab next field  ←→ choose  Enter save  Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));
    popup(f, &form.title, lines, Color::Yellow);
}

fn detail_line<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:>15}: "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

fn draw_details(f: &mut Frame, task: &Task) {
    let hours = |h: Option<f64>| {
        h.map(|h| format!("{}h", format_hours(h)))
            .unwrap_or_else(|| "-".to_owned())
    };
    let text = |s: &Option<String>| {
        s.as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("-")
            .to_owned()
    };
    let lines = vec![
        detail_line("Id", task.id.to_string()),
        detail_line("Title", task.title.clone()),
        detail_line("Status", task.status.to_string()),
        detail_line("Description", text(&task.description)),
        detail_line("Responsible", text(&task.responsible)),
        detail_line("Estimated", hours(task.estimated_time)),
        detail_line("Actual", hours(task.actual_time)),
        detail_line("Comments", text(&task.comments)),
    ];
    popup(f, &format!("Task #{}", task.id), lines, Color::Cyan);
}

fn draw_message(f: &mut Frame, message: &str) {
    let lines = vec![
        Line::raw(message),
        Line::raw(""),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    popup(f, "Error", lines, Color::Red);
}
