use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::io;
use tracing::warn;

use crate::api::TaskApi;
use crate::error::BoardError;
use crate::form::{Form, FormAction, FormKind};
use crate::kanban_board::{KanbanBoard, MoveDirection};
use crate::render;
use crate::settings;

/// What is drawn on top of the columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Board,
    Form(Form),
    Details(u64),
    Message(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub fn run_app<B: Backend, A: TaskApi>(
    terminal: &mut Terminal<B>,
    board: &mut KanbanBoard<A>,
) -> io::Result<()> {
    // A failed first load is shown inside the TODO column.
    if let Err(e) = board.refresh() {
        warn!("initial load failed: {}", e);
    }
    let mut mode = Mode::Board;

    loop {
        terminal.draw(|f| render::draw(f, board, &mode))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(board, &mut mode, key) == Control::Quit {
                return Ok(());
            }
        }
    }
}

pub fn handle_key<A: TaskApi>(
    board: &mut KanbanBoard<A>,
    mode: &mut Mode,
    key: KeyEvent,
) -> Control {
    match mode {
        Mode::Board => return on_board_key(board, mode, key),
        Mode::Details(_) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                *mode = Mode::Board;
            }
        }
        Mode::Message(_) => *mode = Mode::Board,
        Mode::Form(form) => match form.handle_key(key) {
            FormAction::Continue => {}
            FormAction::Cancel => *mode = Mode::Board,
            FormAction::Submit => match submit(board, form) {
                Ok(()) => *mode = Mode::Board,
                Err(e) => form.error = Some(e.to_string()),
            },
        },
    }
    Control::Continue
}

fn on_board_key<A: TaskApi>(
    board: &mut KanbanBoard<A>,
    mode: &mut Mode,
    key: KeyEvent,
) -> Control {
    match key.code {
        KeyCode::Char('q') => return Control::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Control::Quit
        }
        KeyCode::Left | KeyCode::Char('h') => board.select_column(MoveDirection::Back),
        KeyCode::Right | KeyCode::Char('l') => board.select_column(MoveDirection::Forward),
        KeyCode::Up | KeyCode::Char('k') => board.select_task(MoveDirection::Back),
        KeyCode::Down | KeyCode::Char('j') => board.select_task(MoveDirection::Forward),
        KeyCode::Char('r') => {
            if let Err(e) = board.refresh() {
                *mode = Mode::Message(e.to_string());
            }
        }
        KeyCode::Char('a') => *mode = Mode::Form(Form::new_task(&board.responsibles)),
        KeyCode::Char('s') => *mode = Mode::Form(Form::settings(board.max_in_progress)),
        KeyCode::Enter => {
            if let Some(task) = board.selected() {
                *mode = Mode::Details(task.id);
            }
        }
        KeyCode::Char(']') | KeyCode::Char('>') => move_selected(board, mode, MoveDirection::Forward),
        KeyCode::Char('[') | KeyCode::Char('<') => move_selected(board, mode, MoveDirection::Back),
        _ => {}
    }
    Control::Continue
}

fn move_selected<A: TaskApi>(board: &mut KanbanBoard<A>, mode: &mut Mode, direction: MoveDirection) {
    let result = match board.move_selected(direction) {
        Ok(pending) if pending.needs_completion() => board
            .find(pending.task_id)
            .map(|task| *mode = Mode::Form(Form::complete(pending.clone(), task))),
        Ok(pending) => board.commit_move(&pending, None).map(|_| ()),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        *mode = Mode::Message(e.to_string());
    }
}

fn submit<A: TaskApi>(board: &mut KanbanBoard<A>, form: &Form) -> Result<(), BoardError> {
    match &form.kind {
        FormKind::NewTask => board.add_task(&form.task_draft()).map(|_| ()),
        FormKind::Complete(pending) => board
            .commit_move(pending, Some(&form.completion()))
            .map(|_| ()),
        FormKind::Settings => {
            let settings = settings::parse_max_in_progress(form.value(0))?;
            board.save_settings(settings).map(|_| ())
        }
    }
}
