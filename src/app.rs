use tracing::{info, warn};

use crate::auth::TutorGate;
use crate::config::Settings;
use crate::dashboard::Dashboard;
use crate::data::{ConfigStore, LiveTest};
use crate::error::{GenerationError, StoreError};
use crate::generate::QuestionGenerator;
use crate::models::{AppState, Route, TestConfig, OPTION_COUNT};
use crate::scoring::{review, score, ReviewEntry, Score};
use crate::session::{SubmitReason, Submission, TestSession, TickOutcome};

pub const TIME_UP_NOTICE: &str = "Time's up! Your test was submitted automatically.";

/// Score and review of a finished attempt.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub submission: Submission,
    pub score: Score,
    pub review: Vec<ReviewEntry>,
}

impl Outcome {
    pub fn timed_out(&self) -> bool {
        self.submission.reason == SubmitReason::TimeExpired
    }
}

pub struct App<S, G> {
    pub state: AppState,
    settings: Settings,
    gate: TutorGate,
    live: LiveTest<S>,
    live_test: Option<TestConfig>,
    generator: Option<G>,
    pub login_input: String,
    pub login_error: Option<String>,
    pub dashboard: Dashboard,
    pub portal_message: Option<String>,
    session: Option<TestSession>,
    highlighted_option: usize,
    confirming_submit: bool,
    outcome: Option<Outcome>,
    result_scroll: usize,
}

impl<S: ConfigStore, G: QuestionGenerator> App<S, G> {
    /// `generator` is `None` when no AI service is configured; generating
    /// then reports the missing API key.
    pub fn new(settings: Settings, store: S, generator: Option<G>) -> Result<Self, StoreError> {
        let mut live = LiveTest::new(store);
        let live_test = live.load()?;
        let dashboard = Dashboard::new(&settings, live_test.as_ref());

        Ok(Self {
            state: AppState::Home,
            gate: TutorGate::new(settings.tutor_secret.clone()),
            settings,
            live,
            live_test,
            generator,
            login_input: String::new(),
            login_error: None,
            dashboard,
            portal_message: None,
            session: None,
            highlighted_option: 0,
            confirming_submit: false,
            outcome: None,
            result_scroll: 0,
        })
    }

    pub fn live_test(&self) -> Option<&TestConfig> {
        self.live_test.as_ref()
    }

    pub fn has_live_test(&self) -> bool {
        self.live_test.is_some()
    }

    pub fn store(&self) -> &S {
        self.live.store()
    }

    pub fn session(&self) -> Option<&TestSession> {
        self.session.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn highlighted_option(&self) -> usize {
        self.highlighted_option
    }

    pub fn is_confirming_submit(&self) -> bool {
        self.confirming_submit
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// True while the countdown should be ticking.
    pub fn is_test_running(&self) -> bool {
        self.state == AppState::StudentTest
            && self.session.as_ref().is_some_and(TestSession::is_in_progress)
    }

    fn route(&mut self, route: Route) {
        let next = self.state.next(route, self.has_live_test());
        if next != self.state {
            info!(from = ?self.state, to = ?next, "Screen changed");
            self.state = next;
        }
    }

    fn refresh_live_test(&mut self) {
        match self.live.load() {
            Ok(config) => self.live_test = config,
            Err(e) => warn!(error = %e, "Failed to read the live test"),
        }
    }

    pub fn choose_tutor(&mut self) {
        self.login_input.clear();
        self.login_error = None;
        self.route(Route::ChooseTutor);
    }

    pub fn choose_student(&mut self) {
        self.refresh_live_test();
        self.portal_message = None;
        self.route(Route::ChooseStudent);
    }

    pub fn go_home(&mut self) {
        self.login_input.clear();
        self.login_error = None;
        self.route(Route::GoHome);
    }

    pub fn submit_login(&mut self) {
        match self.gate.verify(&self.login_input) {
            Ok(()) => {
                info!("Tutor logged in");
                self.login_input.clear();
                self.login_error = None;
                self.refresh_live_test();
                self.dashboard = Dashboard::new(&self.settings, self.live_test.as_ref());
                self.route(Route::LoginAccepted);
            }
            Err(e) => {
                warn!("Rejected tutor login");
                self.login_input.clear();
                self.login_error = Some(e.to_string());
            }
        }
    }

    pub async fn load_source(&mut self) {
        self.dashboard.load_source().await;
    }

    pub async fn generate(&mut self) {
        match &self.generator {
            Some(generator) => self.dashboard.generate(Ok(generator)).await,
            None => {
                let missing = GenerationError::MissingApiKey(self.settings.ai.api_key_env.clone());
                self.dashboard.generate::<G>(Err(missing)).await
            }
        }
    }

    pub fn save_test(&mut self) {
        if let Some(config) = self.dashboard.save(&mut self.live) {
            self.live_test = Some(config);
        }
    }

    pub fn reset_test(&mut self) {
        if self.dashboard.reset(&mut self.live).is_ok() {
            self.live_test = None;
        }
    }

    /// Begin an attempt at the live test, re-read from the store so a test
    /// activated after the portal opened is picked up.
    pub fn start_test(&mut self) {
        if self.state != AppState::StudentPortal {
            return;
        }
        self.refresh_live_test();

        match TestSession::new(self.live_test.as_ref()) {
            Ok(mut session) => {
                session.start();
                self.session = Some(session);
                self.highlighted_option = 0;
                self.confirming_submit = false;
                self.outcome = None;
                self.portal_message = None;
                self.route(Route::StartTest);
            }
            Err(e) => {
                self.portal_message = Some(e.to_string());
            }
        }
    }

    pub fn highlight_next_option(&mut self) {
        self.highlighted_option = (self.highlighted_option + 1) % OPTION_COUNT;
    }

    pub fn highlight_previous_option(&mut self) {
        self.highlighted_option = (self.highlighted_option + OPTION_COUNT - 1) % OPTION_COUNT;
    }

    pub fn select_option(&mut self, option: usize) {
        if self.confirming_submit {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if session.select_answer(option).is_ok() {
                self.highlighted_option = option;
            }
        }
    }

    pub fn select_highlighted(&mut self) {
        self.select_option(self.highlighted_option);
    }

    fn sync_highlight(&mut self) {
        self.highlighted_option = self
            .session
            .as_ref()
            .and_then(TestSession::current_answer)
            .unwrap_or(0);
    }

    pub fn next_question(&mut self) {
        if self.confirming_submit {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.go_to_next();
        }
        self.sync_highlight();
    }

    pub fn previous_question(&mut self) {
        if self.confirming_submit {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.go_to_previous();
        }
        self.sync_highlight();
    }

    /// Open the confirmation prompt.
    pub fn request_submit(&mut self) {
        if self.is_test_running() {
            self.confirming_submit = true;
        }
    }

    /// Answer the confirmation prompt.
    pub fn confirm_submit(&mut self, accepted: bool) {
        if !self.confirming_submit {
            return;
        }
        self.confirming_submit = false;

        let submission = self
            .session
            .as_mut()
            .and_then(|session| session.submit(&mut |_: usize| accepted));
        if let Some(submission) = submission {
            self.finish(submission);
        }
    }

    /// Feed one elapsed second to the running attempt.
    pub fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let TickOutcome::Expired(submission) = session.tick() {
            self.confirming_submit = false;
            self.finish(submission);
        }
    }

    fn finish(&mut self, submission: Submission) {
        let Some(session) = self.session.take() else {
            return;
        };

        let questions = session.questions();
        let outcome = Outcome {
            score: score(questions, &submission.answers),
            review: review(questions, &submission.answers),
            submission,
        };
        info!(
            attempt = %outcome.submission.attempt,
            correct = outcome.score.correct,
            total = outcome.score.total,
            "Attempt scored"
        );

        self.outcome = Some(outcome);
        self.result_scroll = 0;
        self.route(Route::TestSubmitted);
    }

    pub fn scroll_results_down(&mut self) {
        let total = self.outcome.as_ref().map_or(0, |o| o.review.len());
        if self.result_scroll + 1 < total {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}
