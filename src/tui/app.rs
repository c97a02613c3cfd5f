//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the TUI state for the
//! single screen: the input bar for new tasks, the task list with its
//! completion checkboxes, the status bar, and the modal edit dialog. All
//! list mutations go through the task store; the view keeps no task state
//! of its own beyond the selection and the pending edit.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::storage::KeyValueStorage;
use crate::store::TaskStore;
use crate::tui::{
    colors::{BLUE, GOLD, GREEN, RED, SKY_BLUE},
    enums::{AppState, Focus},
    input::InputField,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
///
/// The pending edit lives in `editing_task_id` + `editing_text` and only
/// while the modal is open; saving or cancelling clears both.
pub struct App<S: KeyValueStorage> {
    state: AppState,
    focus: Focus,
    store: TaskStore<S>,
    list_state: ListState,
    input: InputField,
    editing_task_id: Option<i64>,
    editing_text: InputField,
    status_message: String,
    should_exit: bool,
}

impl<S: KeyValueStorage> App<S> {
    /// Create the app over a loaded store. Focus starts on the input bar.
    pub fn new(store: TaskStore<S>) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            focus: Focus::Input,
            store,
            list_state: ListState::default(),
            input: InputField::new(),
            editing_task_id: None,
            editing_text: InputField::new(),
            status_message: String::new(),
            should_exit: false,
        };
        if !app.store.is_empty() {
            app.list_state.select(Some(0));
        }
        app
    }

    /// Poll for one input event and route it to the active screen.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::EditTask => self.handle_edit_input(key.code),
                }
                if self.should_exit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn handle_task_list_input(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }
        match self.focus {
            Focus::Input => self.handle_input_bar_key(code),
            Focus::List => self.handle_list_key(code),
        }
    }

    fn handle_input_bar_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_new_task(),
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Down => self.focus_list(),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('i') | KeyCode::Tab => self.focus = Focus::Input,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('e') => self.open_edit_modal(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_edit_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.save_edit(),
            KeyCode::Esc => self.close_edit_modal(),
            KeyCode::Char(c) => self.editing_text.handle_char(c),
            KeyCode::Backspace => self.editing_text.handle_backspace(),
            KeyCode::Delete => self.editing_text.handle_delete(),
            KeyCode::Left => self.editing_text.move_cursor_left(),
            KeyCode::Right => self.editing_text.move_cursor_right(),
            _ => {}
        }
    }

    fn submit_new_task(&mut self) {
        let added = self.store.add(&self.input.value).map(|t| t.id);
        match added {
            Some(id) => {
                self.input.clear();
                self.status_message = format!("Added task {id}");
                if self.list_state.selected().is_none() {
                    self.list_state.select(Some(0));
                }
            }
            None => self.status_message = "Cannot add an empty task.".to_string(),
        }
    }

    fn selected_task_id(&self) -> Option<i64> {
        self.list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|t| t.id)
    }

    fn select_previous(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        let i = match self.list_state.selected() {
            None => 0,
            Some(i) => (i + 1).min(last),
        };
        self.list_state.select(Some(i));
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.toggle(id);
        }
    }

    /// Seed the pending-edit slot from the selected task and open the modal.
    fn open_edit_modal(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if let Some(task) = self.store.get(id) {
                self.editing_task_id = Some(id);
                self.editing_text.set(&task.text);
                self.state = AppState::EditTask;
            }
        }
    }

    /// Save the pending edit. Empty text is allowed here, unlike adding.
    fn save_edit(&mut self) {
        if let Some(id) = self.editing_task_id {
            self.store.edit(id, &self.editing_text.value);
            self.status_message = format!("Updated task {id}");
        }
        self.close_edit_modal();
    }

    fn close_edit_modal(&mut self) {
        self.editing_task_id = None;
        self.editing_text.clear();
        self.state = AppState::TaskList;
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.delete(id);
            self.status_message = format!("Deleted task {id}");
            self.clamp_selection();
        }
    }

    /// Keep the selection inside the list after a removal; hand focus back
    /// to the input bar once the list is empty.
    fn clamp_selection(&mut self) {
        if self.store.is_empty() {
            self.list_state.select(None);
            self.focus = Focus::Input;
        } else if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.min(self.store.len() - 1)));
        }
    }

    fn focus_list(&mut self) {
        if self.store.is_empty() {
            self.status_message = "No tasks yet. Type one and press Enter.".to_string();
            return;
        }
        self.focus = Focus::List;
        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(Span::styled(
            "TO-DO LIST",
            Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_input_bar(&mut self, f: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Input && self.state == AppState::TaskList;
        let border_style = if focused {
            Style::default().fg(BLUE)
        } else {
            Style::default()
        };
        let content = if self.input.value.is_empty() {
            Span::styled("Enter a new task", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.input.value.as_str())
        };
        let input = Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("New Task")
                .border_style(border_style),
        );
        f.render_widget(input, area);

        if focused {
            f.set_cursor_position((
                area.x + 1 + self.input.cursor_column() as u16,
                area.y + 1,
            ));
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .store
            .tasks()
            .iter()
            .map(|t| {
                let (checkbox, checkbox_style) = if t.completed {
                    ("[x] ", Style::default().fg(GOLD))
                } else {
                    ("[ ] ", Style::default())
                };
                let text_style = if t.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(checkbox, checkbox_style),
                    Span::styled(t.text.clone(), text_style),
                ]))
            })
            .collect();

        let focused = self.focus == Focus::List && self.state == AppState::TaskList;
        let border_style = if focused {
            Style::default().fg(SKY_BLUE)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tasks ({})", self.store.len()))
                    .border_style(border_style),
            )
            .highlight_style(
                Style::default()
                    .bg(SKY_BLUE)
                    .fg(Color::Rgb(20, 20, 20))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Render the modal edit dialog over the list.
    fn render_edit_modal(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 30, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .title("Edit Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BLUE));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(inner);

        let input = Paragraph::new(self.editing_text.value.as_str())
            .block(Block::default().borders(Borders::ALL).title("Text"));
        f.render_widget(input, chunks[0]);

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(GREEN).add_modifier(Modifier::BOLD)),
            Span::raw(" save   "),
            Span::styled("Esc", Style::default().fg(RED).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(hints, chunks[1]);

        f.set_cursor_position((
            chunks[0].x + 1 + self.editing_text.cursor_column() as u16,
            chunks[0].y + 1,
        ));
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match (self.state, self.focus) {
                (AppState::EditTask, _) => "Enter to save, Esc to cancel".to_string(),
                (_, Focus::Input) => {
                    "Type a task, Enter to add | Tab to focus list | Ctrl+C to quit".to_string()
                }
                (_, Focus::List) => {
                    "↑↓ move | Space toggle | e edit | d delete | Tab input | q quit".to_string()
                }
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(SKY_BLUE).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function: header, input bar, list, status bar, and the
    /// edit modal on top when open.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_input_bar(f, chunks[1]);
        self.render_task_list(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        if self.state == AppState::EditTask {
            let area = f.area();
            self.render_edit_modal(f, area);
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
