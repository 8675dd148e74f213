//! # questionnaire
//!
//! A terminal questionnaire: tutors build a multiple-choice test from a
//! spreadsheet or an AI service, students take it against a countdown and
//! get a scored review.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use questionnaire::{FileStore, OpenAiGenerator, Questionnaire, QuizError, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let settings = Settings::load(None)?;
//!     let store = FileStore::new(&settings.store_dir);
//!     let generator = OpenAiGenerator::from_settings(&settings.ai).ok();
//!
//!     Questionnaire::new(settings, store, generator)?.run().await
//! }
//! ```

mod app;
mod auth;
mod config;
mod dashboard;
mod data;
mod error;
mod generate;
mod models;
mod scoring;
mod session;
pub mod telemetry;
pub mod terminal;
mod ui;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;

pub use app::{App, Outcome, TIME_UP_NOTICE};
pub use auth::TutorGate;
pub use config::{AiSettings, Settings};
pub use dashboard::{import_questions, Dashboard, Field, Imported};
pub use data::{
    answer_index, candidate_list, load_questions_from_json, parse_range, parse_spreadsheet,
    validate_candidates, CandidateBatch, ConfigStore, FileStore, LiveTest, MemoryStore,
    ParsedSheet, SkipReason, SkippedRow, LIVE_TEST_KEY, REQUIRED_HEADERS,
};
pub use error::{
    AuthError, ConfigError, GenerationError, InvalidTest, LoadError, ParseError, QuizError,
    SessionError, StoreError,
};
pub use generate::{
    check_count, generate_questions, GeneratedBatch, OpenAiGenerator, QuestionGenerator,
    MAX_GENERATED,
};
pub use models::{Answer, AppState, Question, Route, TestConfig, OPTION_COUNT, OPTION_LABELS};
pub use scoring::{review, score, ReviewEntry, Score};
pub use session::{
    format_time, ConfirmSubmit, SessionStatus, SubmitReason, Submission, TestSession, TickOutcome,
    Ticker,
};

/// A questionnaire instance that can be run in the terminal.
pub struct Questionnaire<S, G> {
    app: App<S, G>,
}

impl<S: ConfigStore, G: QuestionGenerator> Questionnaire<S, G> {
    pub fn new(settings: Settings, store: S, generator: Option<G>) -> Result<Self, QuizError> {
        Ok(Self {
            app: App::new(settings, store, generator)?,
        })
    }

    /// Run in the terminal until the user quits.
    ///
    /// This takes over the terminal; it is restored on return and on panic.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut tui = terminal::Tui::enter()?;
        run_event_loop(&mut tui, &mut self.app).await
    }

    pub fn app(&self) -> &App<S, G> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<S, G> {
        &mut self.app
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    LoadSource,
    Generate,
}

async fn run_event_loop<S: ConfigStore, G: QuestionGenerator>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<S, G>,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let mut ticker = Ticker::every_second();

    loop {
        if app.is_test_running() {
            ticker.arm();
        } else {
            ticker.cancel();
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            event = events.next() => {
                let Some(event) = event else { break };
                let Event::Key(key) = event? else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(app, key) {
                    Action::None => {}
                    Action::Quit => break,
                    Action::LoadSource => app.load_source().await,
                    Action::Generate => {
                        app.dashboard.status = Some("Generating questions...".to_string());
                        app.dashboard.error = None;
                        terminal.draw(|frame| ui::render(frame, app))?;
                        app.generate().await;
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.state {
        AppState::Home => handle_home_input(app, key.code),
        AppState::TutorLogin => handle_login_input(app, key.code),
        AppState::TutorDashboard => handle_dashboard_input(app, key),
        AppState::StudentPortal => handle_portal_input(app, key.code),
        AppState::StudentTest => handle_test_input(app, key.code),
        AppState::StudentResults => handle_results_input(app, key.code),
    }
}

fn handle_home_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('t') | KeyCode::Char('T') => app.choose_tutor(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.choose_student(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_login_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => app.submit_login(),
        KeyCode::Esc => app.go_home(),
        KeyCode::Backspace => {
            app.login_input.pop();
        }
        KeyCode::Char(c) => app.login_input.push(c),
        _ => {}
    }
    Action::None
}

fn handle_dashboard_input<S: ConfigStore, G: QuestionGenerator>(
    app: &mut App<S, G>,
    key: KeyEvent,
) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.save_test(),
            KeyCode::Char('r') => app.reset_test(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => app.dashboard.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.dashboard.focus_previous(),
        KeyCode::Backspace => app.dashboard.input_pop(),
        KeyCode::Char(c) => app.dashboard.input_push(c),
        KeyCode::Esc => app.go_home(),
        KeyCode::Enter => {
            return match app.dashboard.focus {
                Field::Source => Action::LoadSource,
                Field::Topic | Field::Count => Action::Generate,
                Field::TimeLimit => {
                    app.save_test();
                    Action::None
                }
            };
        }
        _ => {}
    }
    Action::None
}

fn handle_portal_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => app.start_test(),
        KeyCode::Esc => app.go_home(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_test_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyCode) -> Action {
    if app.is_confirming_submit() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_submit(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_submit(false),
            _ => {}
        }
        return Action::None;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.highlight_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.highlight_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_highlighted(),
        KeyCode::Char(c @ 'a'..='d') => app.select_option(c as usize - 'a' as usize),
        KeyCode::Char(c @ '1'..='4') => app.select_option(c as usize - '1' as usize),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.request_submit(),
        _ => {}
    }
    Action::None
}

fn handle_results_input<S: ConfigStore, G: QuestionGenerator>(app: &mut App<S, G>, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Enter | KeyCode::Esc => app.go_home(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::None
}
