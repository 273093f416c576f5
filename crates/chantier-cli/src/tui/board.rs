//! Interactive board view: three derived columns and a grab/move/drop
//! gesture standing in for drag-and-drop.
//!
//! Only dropping an open card on the completed column mutates anything;
//! drops elsewhere put the card back where the derivation had it. `u` on a
//! completed card is the card menu's un-complete.

use chantier_core::model::Project;
use chantier_core::projection::{Board, BoardCard, BoardColumn, build_board, drop_action};
use chantier_core::Action;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// A mutation requested by the view; the app routes it to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    Complete { stage_id: String, task_id: String },
    Reopen { stage_id: String, task_id: String },
    AddTask { stage_id: String, title: String },
}

pub struct BoardView {
    board: Board,
    /// Selected column (index into `BoardColumn::ALL`).
    column: usize,
    /// Cursor per column, preserved across column switches.
    cursors: [ListState; 3],
    /// Card picked up with space, waiting for a drop.
    grabbed: Option<BoardCard>,
    /// Task title buffer; `Some` while composing a new task.
    task_input: Option<String>,
}

impl BoardView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            column: 0,
            cursors: [ListState::default(), ListState::default(), ListState::default()],
            grabbed: None,
            task_input: None,
        }
    }

    /// Rebuild the buckets from scratch (no incremental diffing).
    pub fn refresh(&mut self, project: Option<&Project>) {
        self.board = project.map(build_board).unwrap_or_default();
        for (i, column) in BoardColumn::ALL.iter().enumerate() {
            let len = self.board.column(*column).len();
            let state = &mut self.cursors[i];
            if len == 0 {
                state.select(None);
            } else {
                let selected = state.selected().unwrap_or(0);
                state.select(Some(selected.min(len - 1)));
            }
        }
        // A refresh invalidates the grab if the card no longer exists.
        if let Some(card) = &self.grabbed {
            let still_there = BoardColumn::ALL
                .iter()
                .any(|c| self.board.column(*c).iter().any(|b| b.task.id == card.task.id));
            if !still_there {
                self.grabbed = None;
            }
        }
    }

    const fn current_column(&self) -> BoardColumn {
        BoardColumn::ALL[self.column]
    }

    fn selected_card(&self) -> Option<&BoardCard> {
        let column = self.current_column();
        self.cursors[self.column]
            .selected()
            .and_then(|i| self.board.column(column).get(i))
    }

    /// First stage a created task can attach to: the selected card's stage,
    /// or the grabbed card's as a fallback.
    fn target_stage_id(&self) -> Option<String> {
        self.selected_card()
            .map(|c| c.stage_id.clone())
            .or_else(|| self.grabbed.as_ref().map(|c| c.stage_id.clone()))
    }

    /// True while the task-title input owns the keyboard.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.task_input.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<BoardAction> {
        if let Some(buffer) = &mut self.task_input {
            match key.code {
                KeyCode::Enter => {
                    let title = buffer.trim().to_string();
                    let stage_id = self.target_stage_id();
                    self.task_input = None;
                    if title.is_empty() {
                        return None;
                    }
                    return stage_id.map(|stage_id| BoardAction::AddTask { stage_id, title });
                }
                KeyCode::Esc => {
                    self.task_input = None;
                    return None;
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    return None;
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    return None;
                }
                _ => return None,
            }
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.column = self.column.saturating_sub(1);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.column = (self.column + 1).min(BoardColumn::ALL.len() - 1);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char(' ') => self.grab_or_drop(),
            KeyCode::Esc => {
                self.grabbed = None;
                None
            }
            KeyCode::Char('u') => {
                let card = self.selected_card()?;
                if card.task.completed {
                    Some(BoardAction::Reopen {
                        stage_id: card.stage_id.clone(),
                        task_id: card.task.id.clone(),
                    })
                } else {
                    None
                }
            }
            KeyCode::Char('a') => {
                if self.target_stage_id().is_some() {
                    self.task_input = Some(String::new());
                }
                None
            }
            _ => None,
        }
    }

    fn grab_or_drop(&mut self) -> Option<BoardAction> {
        if let Some(card) = self.grabbed.take() {
            // Drop on the column the cursor sits in. Anything but the
            // completed column is a deliberate no-op; the card snaps back
            // to its derived bucket on the next refresh.
            return match drop_action(&card, self.current_column()) {
                Some(Action::SetTaskCompletion {
                    stage_id, task_id, ..
                }) => Some(BoardAction::Complete { stage_id, task_id }),
                _ => None,
            };
        }

        self.grabbed = self.selected_card().cloned();
        None
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.board.column(self.current_column()).len();
        if len == 0 {
            return;
        }
        let state = &mut self.cursors[self.column];
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        state.select(Some(next));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(chunks[0]);

        for (i, column) in BoardColumn::ALL.iter().enumerate() {
            self.render_column(frame, columns[i], i, *column);
        }
        self.render_footer(frame, chunks[1]);
    }

    fn render_column(&mut self, frame: &mut Frame, area: Rect, index: usize, column: BoardColumn) {
        let cards = self.board.column(column);
        let grabbed_id = self.grabbed.as_ref().map(|c| c.task.id.clone());

        let items: Vec<ListItem> = cards
            .iter()
            .map(|card| {
                let mut spans = vec![Span::raw(card.task.title.clone())];
                if grabbed_id.as_deref() == Some(&card.task.id) {
                    spans.insert(0, Span::styled("✋ ", Style::default().fg(Color::Magenta)));
                }
                spans.push(Span::styled(
                    format!("  · {}", card.stage_title),
                    Style::default().fg(Color::DarkGray),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let is_current = index == self.column;
        let border_style = if is_current && self.grabbed.is_some() {
            Style::default().fg(Color::Magenta)
        } else if is_current {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!(" {} ({}) ", column.title(), cards.len())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
            .highlight_symbol("► ");

        frame.render_stateful_widget(list, area, &mut self.cursors[index]);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(buffer) = &self.task_input {
            Line::from(vec![
                Span::styled("nouvelle tâche: ", Style::default().fg(Color::Cyan)),
                Span::raw(buffer.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        } else if self.grabbed.is_some() {
            Line::from(vec![
                Span::styled("h/l", Style::default().fg(Color::Yellow)),
                Span::raw(" aim column  "),
                Span::styled("space", Style::default().fg(Color::Yellow)),
                Span::raw(" drop  "),
                Span::styled("esc", Style::default().fg(Color::Yellow)),
                Span::raw(" cancel"),
            ])
        } else {
            Line::from(vec![
                Span::styled("h/l", Style::default().fg(Color::Yellow)),
                Span::raw(" column  "),
                Span::styled("j/k", Style::default().fg(Color::Yellow)),
                Span::raw(" move  "),
                Span::styled("space", Style::default().fg(Color::Yellow)),
                Span::raw(" grab  "),
                Span::styled("u", Style::default().fg(Color::Yellow)),
                Span::raw(" reopen  "),
                Span::styled("a", Style::default().fg(Color::Yellow)),
                Span::raw(" add task"),
            ])
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}
