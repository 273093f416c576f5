//! Interactive TUI: timeline and board projections over one shared store.
//!
//! The app owns the store; both views are read-only over its snapshot and
//! hand mutations back as actions. The snapshot arrives through the
//! simulated-latency loader, so the first second renders the empty
//! placeholder state, and a superseded reload is never applied.

mod board;
mod timeline;

use board::{BoardAction, BoardView};
use chantier_core::model::{NewTask, UserRef};
use chantier_core::{ProjectStore, StoreState};
use clap::Args;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use std::path::Path;
use std::time::{Duration, Instant};
use timeline::{TimelineAction, TimelineView};

use crate::identity;
use crate::loader::{DEFAULT_DELAY, LoadEvent, Loader};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct TuiArgs {
    /// Project id to open (defaults to the active project).
    pub id: Option<String>,

    /// Simulated load latency in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    pub load_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Timeline,
    Board,
}

pub struct App {
    store: ProjectStore,
    /// False until the initial load lands; nothing is saved before that.
    loaded: bool,
    dirty: bool,
    tab: Tab,
    timeline: TimelineView,
    board: BoardView,
    /// Explicit project override from the CLI; otherwise the active pointer.
    project_override: Option<String>,
    user: UserRef,
    status_msg: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(project_override: Option<String>, user: UserRef) -> Self {
        Self {
            store: ProjectStore::new(),
            loaded: false,
            dirty: false,
            tab: Tab::Timeline,
            timeline: TimelineView::new(),
            board: BoardView::new(),
            project_override,
            user,
            status_msg: None,
            should_quit: false,
        }
    }

    fn viewed_project_id(&self) -> Option<String> {
        if let Some(id) = &self.project_override {
            return Some(id.clone());
        }
        self.store.state().active_project().map(|p| p.id.clone())
    }

    fn refresh_views(&mut self) {
        let project = self
            .viewed_project_id()
            .and_then(|id| self.store.state().project(&id).cloned());
        self.timeline.refresh(project.as_ref());
        self.board.refresh(project.as_ref());
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_msg = Some((msg.into(), Instant::now()));
    }

    /// Apply a loader event. Stale results are dropped on the floor.
    pub fn on_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Ready(Ok(state)) => {
                self.store = ProjectStore::from_state(state);
                self.loaded = true;
                self.refresh_views();
                self.set_status("Projets chargés");
            }
            LoadEvent::Ready(Err(err)) => {
                self.loaded = false;
                self.set_status(format!("Échec du chargement: {err}"));
            }
            LoadEvent::Stale | LoadEvent::Idle => {}
        }
    }

    /// Handle one key event. Returns true when the app should exit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        // An active input buffer owns the keyboard: 'q' and Tab are text
        // there, not global shortcuts.
        let editing = match self.tab {
            Tab::Timeline => self.timeline.is_editing(),
            Tab::Board => self.board.is_editing(),
        };
        if !editing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return true;
                }
                KeyCode::Tab => {
                    self.tab = match self.tab {
                        Tab::Timeline => Tab::Board,
                        Tab::Board => Tab::Timeline,
                    };
                    return false;
                }
                _ => {}
            }
        }

        match self.tab {
            Tab::Timeline => {
                if let Some(action) = self.timeline.handle_key(key) {
                    self.apply_timeline(action);
                }
            }
            Tab::Board => {
                if let Some(action) = self.board.handle_key(key) {
                    self.apply_board(action);
                }
            }
        }
        false
    }

    fn apply_timeline(&mut self, action: TimelineAction) {
        let Some(project_id) = self.viewed_project_id() else {
            return;
        };
        let result = match action {
            TimelineAction::ToggleTask {
                stage_id,
                task_id,
                completed,
            } => {
                let verb = if completed { "terminée" } else { "rouverte" };
                let result = if completed {
                    self.store.complete_task(&project_id, &stage_id, &task_id)
                } else {
                    self.store.reopen_task(&project_id, &stage_id, &task_id)
                };
                result.map(|()| format!("Tâche {verb}"))
            }
            TimelineAction::AddComment { stage_id, text } => self
                .store
                .add_comment(&project_id, &stage_id, &text, self.user.clone())
                .map(|_| "Commentaire ajouté".to_string()),
        };
        self.finish_mutation(result);
    }

    fn apply_board(&mut self, action: BoardAction) {
        let Some(project_id) = self.viewed_project_id() else {
            return;
        };
        let result = match action {
            BoardAction::Complete { stage_id, task_id } => self
                .store
                .complete_task(&project_id, &stage_id, &task_id)
                .map(|()| "Tâche terminée".to_string()),
            BoardAction::Reopen { stage_id, task_id } => self
                .store
                .reopen_task(&project_id, &stage_id, &task_id)
                .map(|()| "Tâche rouverte".to_string()),
            BoardAction::AddTask { stage_id, title } => self
                .store
                .add_task(
                    &project_id,
                    &stage_id,
                    NewTask {
                        title,
                        completed: false,
                        assignee: None,
                    },
                )
                .map(|_| "Tâche ajoutée".to_string()),
        };
        self.finish_mutation(result);
    }

    fn finish_mutation(&mut self, result: Result<String, chantier_core::StoreError>) {
        match result {
            Ok(msg) => {
                self.dirty = true;
                self.refresh_views();
                self.set_status(msg);
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Timeline => self.timeline.render(frame, chunks[1]),
            Tab::Board => self.board.render(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let selected = match self.tab {
            Tab::Timeline => 0,
            Tab::Board => 1,
        };
        let tabs = Tabs::new(vec!["Chronologie", "Tableau"])
            .select(selected)
            .highlight_style(Style::default().fg(Color::Cyan));
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if !self.loaded {
            spans.push(Span::styled("chargement… ", Style::default().fg(Color::DarkGray)));
        }
        if let Some((msg, at)) = &self.status_msg {
            if at.elapsed() < Duration::from_secs(3) {
                spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    #[must_use]
    pub const fn state(&self) -> &StoreState {
        self.store.state()
    }
}

pub fn run_tui(args: &TuiArgs, user_flag: Option<&str>, project_root: &Path) -> anyhow::Result<()> {
    let snapshot_path = snapshot::require_snapshot_path(project_root)?;
    let user = identity::resolve_user(user_flag).unwrap_or_else(|| UserRef::from_name("Moi"));

    let mut app = App::new(args.id.clone(), user);
    let mut loader = Loader::new(
        snapshot_path.clone(),
        Duration::from_millis(args.load_delay_ms),
    );
    loader.start();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut app, &mut loader, &mut terminal, &snapshot_path);
    ratatui::restore();
    result
}

fn event_loop(
    app: &mut App,
    loader: &mut Loader,
    terminal: &mut ratatui::DefaultTerminal,
    snapshot_path: &Path,
) -> anyhow::Result<()> {
    loop {
        let load_event = loader.poll();
        app.on_load_event(load_event);

        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if app.on_key(key) {
                    break;
                }
            }
        }
        if app.should_quit {
            break;
        }
    }

    // Persist mutations, but never clobber the snapshot with the empty
    // pre-load state if the user quit before the load landed.
    if app.loaded && app.dirty {
        snapshot::save_state(snapshot_path, app.state())?;
        tracing::info!("snapshot saved on exit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{App, Tab};
    use crate::loader::LoadEvent;
    use chantier_core::model::UserRef;
    use crossterm::event::{KeyCode, KeyEvent};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn loaded_app() -> App {
        let mut app = App::new(None, UserRef::from_name("Testeur"));
        app.on_load_event(LoadEvent::Ready(Ok(crate::seed::demo_state())));
        app
    }

    #[test]
    fn tab_key_switches_views() {
        let mut app = loaded_app();
        assert_eq!(app.tab, Tab::Timeline);
        assert!(!app.on_key(key(KeyCode::Tab)));
        assert_eq!(app.tab, Tab::Board);
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Timeline);
    }

    #[test]
    fn q_quits() {
        let mut app = loaded_app();
        assert!(app.on_key(key(KeyCode::Char('q'))));
        assert!(app.should_quit);
    }

    #[test]
    fn q_inside_comment_input_is_text_not_quit() {
        let mut app = loaded_app();
        app.on_key(key(KeyCode::Char('c'))); // start composing
        assert!(!app.on_key(key(KeyCode::Char('q'))));
        assert!(!app.should_quit);
        // Abort composition, then 'q' quits again.
        app.on_key(key(KeyCode::Esc));
        assert!(app.on_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn interactions_before_load_are_tolerated() {
        let mut app = App::new(None, UserRef::from_name("Testeur"));
        // Empty collection, null active pointer: keys must not panic or
        // mutate anything.
        assert!(!app.on_key(key(KeyCode::Char('j'))));
        assert!(!app.on_key(key(KeyCode::Char('x'))));
        assert!(!app.loaded);
        assert!(!app.dirty);
        assert!(app.state().projects.is_empty());
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut app = loaded_app();
        let projects_before = app.state().projects.len();
        app.on_load_event(LoadEvent::Stale);
        assert_eq!(app.state().projects.len(), projects_before);
        assert!(app.loaded);
    }

    #[test]
    fn timeline_toggle_flows_into_the_store() {
        let mut app = loaded_app();

        // Expand the first stage and toggle its first task (completed in
        // the demo data, so this reopens it).
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('j')));
        app.on_key(key(KeyCode::Char('x')));

        assert!(app.dirty);
        let project = app.state().active_project().expect("active project");
        assert!(!project.stages[0].tasks[0].completed);
        // Reopening dropped the demolition stage below 100%, so the stage
        // keeps its completed status but progress moves.
        assert_eq!(project.stages[0].progress, 67);
    }

    #[test]
    fn board_drop_completes_through_the_store() {
        let mut app = loaded_app();
        app.on_key(key(KeyCode::Tab)); // board

        // In-progress column holds the two open plumbing tasks.
        app.on_key(key(KeyCode::Char('l')));
        app.on_key(key(KeyCode::Char(' '))); // grab
        app.on_key(key(KeyCode::Char('l'))); // aim completed
        app.on_key(key(KeyCode::Char(' '))); // drop

        assert!(app.dirty);
        let project = app.state().active_project().expect("active project");
        let plumbing = &project.stages[1];
        assert_eq!(plumbing.completed_tasks(), 3);
        assert_eq!(plumbing.progress, 75);
    }
}
