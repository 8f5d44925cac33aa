//! Small input forms drawn over the board.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::kanban_board::PendingMove;
use crate::task::{Completion, Task, TaskDraft, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text {
        label: &'static str,
        value: String,
    },
    Choice {
        label: &'static str,
        options: Vec<String>,
        index: usize,
    },
}

impl Field {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Field::Text {
            label,
            value: value.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Text { label, .. } | Field::Choice { label, .. } => label,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Field::Text { value, .. } => value,
            Field::Choice { options, index, .. } => {
                options.get(*index).map(String::as_str).unwrap_or("")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    NewTask,
    Complete(PendingMove),
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

const NEW_TITLE: usize = 0;
const NEW_DESCRIPTION: usize = 1;
const NEW_ESTIMATE: usize = 2;
const NEW_STATUS: usize = 3;
const NEW_RESPONSIBLE: usize = 4;

impl Form {
    /// `responsibles` empty means the responsible is typed freely.
    pub fn new_task(responsibles: &[String]) -> Self {
        let status = Field::Choice {
            label: "Status",
            options: TaskStatus::ALL.iter().map(|s| s.as_str().to_owned()).collect(),
            index: 0,
        };
        let responsible = if responsibles.is_empty() {
            Field::text("Responsible", "")
        } else {
            Field::Choice {
                label: "Responsible",
                options: responsibles.to_vec(),
                index: 0,
            }
        };
        Self {
            kind: FormKind::NewTask,
            title: "New task".to_owned(),
            fields: vec![
                Field::text("Title", ""),
                Field::text("Description", ""),
                Field::text("Estimated hours", ""),
                status,
                responsible,
            ],
            focus: 0,
            error: None,
        }
    }

    pub fn complete(pending: PendingMove, task: &Task) -> Self {
        let prefill = Completion::for_task(task);
        Self {
            kind: FormKind::Complete(pending),
            title: format!("Complete #{} {}", task.id, task.title),
            fields: vec![
                Field::text("Comments", prefill.comments),
                Field::text("Actual hours", prefill.actual_time),
            ],
            focus: 0,
            error: None,
        }
    }

    pub fn settings(current: u32) -> Self {
        Self {
            kind: FormKind::Settings,
            title: "Settings".to_owned(),
            fields: vec![Field::text("Max IN_PROGRESS", current.to_string())],
            focus: 0,
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(Field::display).unwrap_or("")
    }

    pub fn task_draft(&self) -> TaskDraft {
        let status = self
            .value(NEW_STATUS)
            .parse()
            .unwrap_or(TaskStatus::Todo);
        let responsible = self.value(NEW_RESPONSIBLE);
        TaskDraft {
            title: self.value(NEW_TITLE).to_owned(),
            description: self.value(NEW_DESCRIPTION).to_owned(),
            estimate: self.value(NEW_ESTIMATE).to_owned(),
            status,
            responsible: (!responsible.is_empty()).then(|| responsible.to_owned()),
        }
    }

    pub fn completion(&self) -> Completion {
        Completion {
            comments: self.value(0).to_owned(),
            actual_time: self.value(1).to_owned(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len()
            }
            code => self.edit_focused(code, key.modifiers),
        }
        FormAction::Continue
    }

    fn edit_focused(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field {
            Field::Text { value, .. } => match code {
                KeyCode::Backspace => {
                    value.pop();
                }
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => value.push(c),
                _ => {}
            },
            Field::Choice { options, index, .. } if !options.is_empty() => match code {
                KeyCode::Left => *index = (*index + options.len() - 1) % options.len(),
                KeyCode::Right | KeyCode::Char(' ') => *index = (*index + 1) % options.len(),
                _ => {}
            },
            Field::Choice { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut Form, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn new_task_form_collects_a_draft() {
        let mut form = Form::new_task(&[]);
        type_text(&mut form, "Write docs");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "for the API");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "2.5");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Right);
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "Ana");

        let draft = form.task_draft();
        assert_eq!(draft.title, "Write docs");
        assert_eq!(draft.description, "for the API");
        assert_eq!(draft.estimate, "2.5");
        assert_eq!(draft.status, TaskStatus::InProgress);
        assert_eq!(draft.responsible.as_deref(), Some("Ana"));
    }

    #[test]
    fn responsible_choice_cycles_through_backend_list() {
        let responsibles = vec!["Ana".to_owned(), "Luis".to_owned()];
        let mut form = Form::new_task(&responsibles);
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focus, NEW_RESPONSIBLE);
        assert_eq!(form.task_draft().responsible.as_deref(), Some("Ana"));

        press(&mut form, KeyCode::Left);
        assert_eq!(form.task_draft().responsible.as_deref(), Some("Luis"));
    }

    #[test]
    fn backspace_and_control_keys() {
        let mut form = Form::settings(5);
        press(&mut form, KeyCode::Backspace);
        type_text(&mut form, "12");
        form.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(form.value(0), "12");
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::Submit);
        assert_eq!(press(&mut form, KeyCode::Esc), FormAction::Cancel);
    }

    #[test]
    fn completion_form_is_prefilled_from_task() {
        let mut task = Task::sample(9, TaskStatus::InProgress);
        task.actual_time = Some(1.5);
        task.comments = Some("halfway".to_owned());
        let pending = PendingMove {
            task_id: 9,
            from: TaskStatus::InProgress,
            to: TaskStatus::Done,
        };
        let form = Form::complete(pending, &task);

        let completion = form.completion();
        assert_eq!(completion.comments, "halfway");
        assert_eq!(completion.actual_time, "1.5");
    }
}
