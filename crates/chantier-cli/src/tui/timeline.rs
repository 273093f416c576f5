//! Interactive timeline view: stages in construction order, expandable
//! detail, task toggles, and an add-comment input.
//!
//! Expansion flags and the cursor are private view state; everything shown
//! is re-derived from the store snapshot on every refresh.

use chantier_core::model::Project;
use chantier_core::model::status::StageStatus;
use chantier_core::projection::derived_progress;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::collections::HashSet;

/// A mutation requested by the view; the app routes it to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineAction {
    ToggleTask {
        stage_id: String,
        task_id: String,
        completed: bool,
    },
    AddComment {
        stage_id: String,
        text: String,
    },
}

/// One selectable line: a stage header or, under an expanded stage, a
/// task, photo, or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Stage(usize),
    Task(usize, usize),
    Photo(usize, usize),
    Comment(usize, usize),
}

pub struct TimelineView {
    project: Option<Project>,
    expanded: HashSet<String>,
    rows: Vec<Row>,
    state: ListState,
    /// Comment input buffer; `Some` while composing.
    comment_input: Option<String>,
}

impl TimelineView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: None,
            expanded: HashSet::new(),
            rows: Vec::new(),
            state: ListState::default(),
            comment_input: None,
        }
    }

    /// Re-derive everything from the current snapshot. Missing project
    /// (not loaded yet, or dangling pointer) renders as a placeholder.
    pub fn refresh(&mut self, project: Option<&Project>) {
        self.project = project.cloned();
        self.rebuild_rows();
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        if let Some(project) = &self.project {
            for (i, stage) in project.stages.iter().enumerate() {
                self.rows.push(Row::Stage(i));
                if self.expanded.contains(&stage.id) {
                    for j in 0..stage.tasks.len() {
                        self.rows.push(Row::Task(i, j));
                    }
                    for j in 0..stage.photos.len() {
                        self.rows.push(Row::Photo(i, j));
                    }
                    for j in 0..stage.comments.len() {
                        self.rows.push(Row::Comment(i, j));
                    }
                }
            }
        }
        if self.rows.is_empty() {
            self.state.select(None);
        } else {
            let selected = self.state.selected().unwrap_or(0);
            self.state.select(Some(selected.min(self.rows.len() - 1)));
        }
    }

    fn selected_row(&self) -> Option<Row> {
        self.state.selected().and_then(|i| self.rows.get(i)).copied()
    }

    fn selected_stage_id(&self) -> Option<String> {
        let project = self.project.as_ref()?;
        match self.selected_row()? {
            Row::Stage(i) | Row::Task(i, _) | Row::Photo(i, _) | Row::Comment(i, _) => {
                project.stages.get(i).map(|s| s.id.clone())
            }
        }
    }

    /// True while the comment input owns the keyboard.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.comment_input.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<TimelineAction> {
        // Comment composition swallows every key until Enter/Esc.
        if let Some(buffer) = &mut self.comment_input {
            match key.code {
                KeyCode::Enter => {
                    let text = buffer.trim().to_string();
                    let stage_id = self.selected_stage_id();
                    self.comment_input = None;
                    if text.is_empty() {
                        return None;
                    }
                    return stage_id.map(|stage_id| TimelineAction::AddComment { stage_id, text });
                }
                KeyCode::Esc => {
                    self.comment_input = None;
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
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(Row::Stage(i)) = self.selected_row() {
                    if let Some(project) = &self.project {
                        if let Some(stage) = project.stages.get(i) {
                            if !self.expanded.remove(&stage.id) {
                                self.expanded.insert(stage.id.clone());
                            }
                            self.rebuild_rows();
                        }
                    }
                }
                None
            }
            KeyCode::Char('x') => {
                let project = self.project.as_ref()?;
                if let Some(Row::Task(i, j)) = self.selected_row() {
                    let stage = project.stages.get(i)?;
                    let task = stage.tasks.get(j)?;
                    return Some(TimelineAction::ToggleTask {
                        stage_id: stage.id.clone(),
                        task_id: task.id.clone(),
                        completed: !task.completed,
                    });
                }
                None
            }
            KeyCode::Char('c') => {
                if self.selected_stage_id().is_some() {
                    self.comment_input = Some(String::new());
                }
                None
            }
            _ => None,
        }
    }

    fn select_next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| if i + 1 >= len { 0 } else { i + 1 });
        self.state.select(Some(i));
    }

    fn select_prev(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.state.select(Some(i));
    }

    const fn status_style(status: StageStatus) -> Style {
        match status {
            StageStatus::Completed => Style::new().fg(Color::Green),
            StageStatus::InProgress => Style::new().fg(Color::Cyan),
            StageStatus::Delayed => Style::new().fg(Color::Red),
            StageStatus::Pending => Style::new().fg(Color::DarkGray),
        }
    }

    const fn status_icon(status: StageStatus) -> &'static str {
        match status {
            StageStatus::Completed => "●",
            StageStatus::InProgress => "◐",
            StageStatus::Delayed => "!",
            StageStatus::Pending => "○",
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_stages(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = self.project.as_ref().map_or_else(
            || Line::from(Span::styled("Chargement…", Style::default().fg(Color::DarkGray))),
            |project| {
                // Independently re-derived at render time, never the cached field.
                let percent = derived_progress(project);
                Line::from(vec![
                    Span::styled(
                        project.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(format!("{percent}%"), Style::default().fg(Color::Yellow)),
                    Span::raw(format!("  ({})", project.status)),
                ])
            },
        );
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_stages(&mut self, frame: &mut Frame, area: Rect) {
        let Some(project) = &self.project else {
            let p = Paragraph::new("Aucun projet sélectionné")
                .block(Block::default().borders(Borders::ALL).title(" Chronologie "));
            frame.render_widget(p, area);
            return;
        };

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .filter_map(|row| match *row {
                Row::Stage(i) => {
                    let stage = project.stages.get(i)?;
                    let marker = if self.expanded.contains(&stage.id) { "▾" } else { "▸" };
                    Some(ListItem::new(Line::from(vec![
                        Span::raw(format!("{marker} ")),
                        Span::styled(
                            format!("{} ", Self::status_icon(stage.status)),
                            Self::status_style(stage.status),
                        ),
                        Span::styled(
                            format!("{:<28}", stage.title),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("{:>3}% ", stage.progress), Style::default().fg(Color::Yellow)),
                        Span::styled(stage.status.to_string(), Self::status_style(stage.status)),
                    ])))
                }
                Row::Task(i, j) => {
                    let task = project.stages.get(i)?.tasks.get(j)?;
                    let mark = if task.completed { "x" } else { " " };
                    let mut spans = vec![Span::raw(format!("    [{mark}] {}", task.title))];
                    if let Some(who) = &task.assignee {
                        spans.push(Span::styled(
                            format!("  ({})", who.name),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    Some(ListItem::new(Line::from(spans)))
                }
                Row::Photo(i, j) => {
                    let photo = project.stages.get(i)?.photos.get(j)?;
                    let label = photo.caption.as_deref().unwrap_or(photo.url.as_str());
                    Some(ListItem::new(Line::from(Span::styled(
                        format!("    📷 {label}"),
                        Style::default().fg(Color::Blue),
                    ))))
                }
                Row::Comment(i, j) => {
                    let comment = project.stages.get(i)?.comments.get(j)?;
                    Some(ListItem::new(Line::from(Span::styled(
                        format!("    💬 {}: {}", comment.author.name, comment.text),
                        Style::default().fg(Color::DarkGray),
                    ))))
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Chronologie "))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
            .highlight_symbol("► ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(buffer) = &self.comment_input {
            Line::from(vec![
                Span::styled("commentaire: ", Style::default().fg(Color::Cyan)),
                Span::raw(buffer.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        } else {
            Line::from(vec![
                Span::styled("j/k", Style::default().fg(Color::Yellow)),
                Span::raw(" move  "),
                Span::styled("enter", Style::default().fg(Color::Yellow)),
                Span::raw(" expand  "),
                Span::styled("x", Style::default().fg(Color::Yellow)),
                Span::raw(" toggle task  "),
                Span::styled("c", Style::default().fg(Color::Yellow)),
                Span::raw(" comment"),
            ])
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{TimelineAction, TimelineView};
    use chantier_core::model::status::{ProjectStatus, StageStatus};
    use chantier_core::model::{Project, Stage, Task};
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn project() -> Project {
        Project {
            id: "PRJ-2026-abc123".into(),
            title: "Rénovation".into(),
            description: String::new(),
            location: "Paris".into(),
            start_date: date(2026, 3, 2),
            end_date: None,
            budget: 10_000,
            status: ProjectStatus::InProgress,
            progress: 0,
            contractor: None,
            stages: vec![Stage {
                id: "stg-1".into(),
                title: "Plomberie".into(),
                description: String::new(),
                start_date: date(2026, 3, 2),
                end_date: None,
                status: StageStatus::InProgress,
                progress: 50,
                tasks: vec![
                    Task {
                        id: "tsk-1".into(),
                        title: "Traçage".into(),
                        completed: true,
                        assignee: None,
                    },
                    Task {
                        id: "tsk-2".into(),
                        title: "Pose".into(),
                        completed: false,
                        assignee: None,
                    },
                ],
                photos: vec![],
                comments: vec![],
            }],
            updates: vec![],
            documents: vec![],
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn starts_collapsed_with_stage_rows_only() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn enter_expands_and_collapses() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));

        assert!(view.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(view.rows.len(), 3); // header + 2 tasks

        assert!(view.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn x_on_a_task_emits_the_right_toggle() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));
        view.handle_key(key(KeyCode::Enter));

        // Move to the first task (completed) and toggle it off.
        view.handle_key(key(KeyCode::Char('j')));
        match view.handle_key(key(KeyCode::Char('x'))) {
            Some(TimelineAction::ToggleTask {
                stage_id,
                task_id,
                completed,
            }) => {
                assert_eq!(stage_id, "stg-1");
                assert_eq!(task_id, "tsk-1");
                assert!(!completed); // reopen
            }
            other => panic!("expected toggle, got {other:?}"),
        }

        // Second task is open: toggling completes it.
        view.handle_key(key(KeyCode::Char('j')));
        match view.handle_key(key(KeyCode::Char('x'))) {
            Some(TimelineAction::ToggleTask { task_id, completed, .. }) => {
                assert_eq!(task_id, "tsk-2");
                assert!(completed);
            }
            other => panic!("expected toggle, got {other:?}"),
        }
    }

    #[test]
    fn x_on_a_header_is_inert() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));
        assert!(view.handle_key(key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn comment_composition_emits_on_enter() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));

        view.handle_key(key(KeyCode::Char('c')));
        for c in "RAS".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        match view.handle_key(key(KeyCode::Enter)) {
            Some(TimelineAction::AddComment { stage_id, text }) => {
                assert_eq!(stage_id, "stg-1");
                assert_eq!(text, "RAS");
            }
            other => panic!("expected comment, got {other:?}"),
        }
    }

    #[test]
    fn comment_escape_cancels() {
        let mut view = TimelineView::new();
        view.refresh(Some(&project()));

        view.handle_key(key(KeyCode::Char('c')));
        view.handle_key(key(KeyCode::Char('a')));
        assert!(view.handle_key(key(KeyCode::Esc)).is_none());
        // 'x' works again: we are out of composition mode.
        assert!(view.handle_key(key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn empty_refresh_tolerated() {
        let mut view = TimelineView::new();
        view.refresh(None);
        assert!(view.handle_key(key(KeyCode::Char('j'))).is_none());
        assert!(view.handle_key(key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn expansion_survives_refresh() {
        let mut view = TimelineView::new();
        let p = project();
        view.refresh(Some(&p));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.rows.len(), 3);

        // A store mutation triggers refresh; the expand flag is view state
        // and must survive it.
        view.refresh(Some(&p));
        assert_eq!(view.rows.len(), 3);
    }
}
