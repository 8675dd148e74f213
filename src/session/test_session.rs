//! Timed test attempt.
//!
//! A [`TestSession`] is a plain state machine: it never reads the clock
//! itself. The caller feeds it one [`tick`](TestSession::tick) per elapsed
//! second and drives navigation and answers from user input.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{Answer, Question, TestConfig, OPTION_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Submitted,
}

/// Why an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    TimeExpired,
}

/// Frozen answers handed to scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub attempt: Uuid,
    pub answers: Vec<Answer>,
    pub reason: SubmitReason,
    pub elapsed_secs: u32,
}

/// What a single timer tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not running; nothing changed.
    Ignored,
    /// Seconds left after the decrement.
    Running(u32),
    /// Time ran out and the attempt was submitted.
    Expired(Submission),
}

/// Asked before a manual submission takes effect.
pub trait ConfirmSubmit {
    /// `unanswered` is the number of questions still without an answer.
    fn confirm(&mut self, unanswered: usize) -> bool;
}

impl<F: FnMut(usize) -> bool> ConfirmSubmit for F {
    fn confirm(&mut self, unanswered: usize) -> bool {
        self(unanswered)
    }
}

pub struct TestSession {
    id: Uuid,
    status: SessionStatus,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    current_index: usize,
    time_limit_secs: u32,
    remaining_secs: u32,
}

impl TestSession {
    /// Prepare an attempt at the live test. Without one there is nothing to take.
    pub fn new(config: Option<&TestConfig>) -> Result<Self, SessionError> {
        let config = config.ok_or(SessionError::NotConfigured)?;
        if config.questions().is_empty() {
            return Err(SessionError::NotConfigured);
        }

        let time_limit_secs = config.time_limit_secs();
        Ok(Self {
            id: Uuid::new_v4(),
            status: SessionStatus::NotStarted,
            questions: config.questions().to_vec(),
            answers: vec![None; config.questions().len()],
            current_index: 0,
            time_limit_secs,
            remaining_secs: time_limit_secs,
        })
    }

    /// Begin the attempt. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.status != SessionStatus::NotStarted {
            return;
        }

        self.current_index = 0;
        self.answers = vec![None; self.questions.len()];
        self.remaining_secs = self.time_limit_secs;
        self.status = SessionStatus::InProgress;

        info!(
            attempt = %self.id,
            questions = self.questions.len(),
            time_limit_secs = self.time_limit_secs,
            "Test started"
        );
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_answer(&self) -> Answer {
        self.answers[self.current_index]
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    /// Choose an option for the current question.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if option >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange(option));
        }

        self.answers[self.current_index] = Some(option);
        Ok(())
    }

    pub fn go_to_next(&mut self) {
        if self.status == SessionStatus::InProgress && !self.is_last() {
            self.current_index += 1;
        }
    }

    pub fn go_to_previous(&mut self) {
        if self.status == SessionStatus::InProgress && !self.is_first() {
            self.current_index -= 1;
        }
    }

    /// Submit on the student's request. Returns `None` if the student backs
    /// out or the attempt is already over.
    pub fn submit<C: ConfirmSubmit + ?Sized>(&mut self, confirm: &mut C) -> Option<Submission> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        if !confirm.confirm(self.unanswered_count()) {
            debug!(attempt = %self.id, "Submission cancelled");
            return None;
        }

        Some(self.finish(SubmitReason::Manual))
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::InProgress {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return TickOutcome::Expired(self.finish(SubmitReason::TimeExpired));
        }

        TickOutcome::Running(self.remaining_secs)
    }

    fn finish(&mut self, reason: SubmitReason) -> Submission {
        self.status = SessionStatus::Submitted;
        let elapsed_secs = self.time_limit_secs - self.remaining_secs;

        info!(
            attempt = %self.id,
            ?reason,
            elapsed_secs,
            unanswered = self.unanswered_count(),
            "Test submitted"
        );

        Submission {
            attempt: self.id,
            answers: self.answers.clone(),
            reason,
            elapsed_secs,
        }
    }
}

/// `MM:SS` for the countdown display.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(questions: usize, minutes: u32) -> TestConfig {
        let questions = (0..questions)
            .map(|i| {
                Question::new(format!("Q{}", i), ["a", "b", "c", "d"].map(String::from), i % 4)
                    .unwrap()
            })
            .collect();
        TestConfig::new(questions, minutes).unwrap()
    }

    fn started(questions: usize, minutes: u32) -> TestSession {
        let mut session = TestSession::new(Some(&config(questions, minutes))).unwrap();
        session.start();
        session
    }

    fn yes(_: usize) -> bool {
        true
    }

    #[test]
    fn test_refuses_to_start_without_config() {
        assert!(matches!(
            TestSession::new(None),
            Err(SessionError::NotConfigured)
        ));
    }

    #[test]
    fn test_initial_state() {
        let mut session = TestSession::new(Some(&config(3, 2))).unwrap();
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.select_answer(0), Err(SessionError::NotInProgress));

        session.start();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers(), &[None, None, None]);
        assert_eq!(session.remaining_secs(), 120);
    }

    #[test]
    fn test_select_answer_overwrites_current() {
        let mut session = started(2, 1);
        session.select_answer(2).unwrap();
        session.select_answer(2).unwrap();
        assert_eq!(session.answers(), &[Some(2), None]);

        session.select_answer(0).unwrap();
        assert_eq!(session.answers(), &[Some(0), None]);
        assert_eq!(session.current_index(), 0);

        assert_eq!(
            session.select_answer(4),
            Err(SessionError::OptionOutOfRange(4))
        );
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = started(3, 1);
        session.go_to_previous();
        assert_eq!(session.current_index(), 0);

        session.go_to_next();
        session.go_to_next();
        assert_eq!(session.current_index(), 2);
        assert!(session.is_last());

        session.go_to_next();
        assert_eq!(session.current_index(), 2);

        session.go_to_previous();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_navigation_keeps_answers() {
        let mut session = started(3, 1);
        session.go_to_next();
        session.select_answer(3).unwrap();
        session.go_to_previous();
        session.select_answer(1).unwrap();
        assert_eq!(session.answers(), &[Some(1), Some(3), None]);
    }

    #[test]
    fn test_declined_confirmation_keeps_session_running() {
        let mut session = started(2, 1);
        let mut asked_with = None;
        let submission = session.submit(&mut |unanswered: usize| {
            asked_with = Some(unanswered);
            false
        });

        assert!(submission.is_none());
        assert_eq!(asked_with, Some(2));
        assert!(session.is_in_progress());
    }

    #[test]
    fn test_double_submit_finalizes_once() {
        let mut session = started(2, 1);
        session.select_answer(1).unwrap();

        let first = session.submit(&mut yes).unwrap();
        assert_eq!(first.answers, vec![Some(1), None]);
        assert_eq!(first.reason, SubmitReason::Manual);

        assert!(session.submit(&mut yes).is_none());
        assert_eq!(session.status(), SessionStatus::Submitted);
        assert_eq!(session.select_answer(2), Err(SessionError::NotInProgress));
        assert_eq!(session.answers(), &[Some(1), None]);
    }

    #[test]
    fn test_sixty_ticks_expire_one_minute_test() {
        let mut session = started(3, 1);
        session.select_answer(2).unwrap();

        for expected in (1..60).rev() {
            assert_eq!(session.tick(), TickOutcome::Running(expected));
        }
        session.go_to_next();
        session.select_answer(0).unwrap();

        let submission = match session.tick() {
            TickOutcome::Expired(submission) => submission,
            other => panic!("expected expiry, got {:?}", other),
        };
        assert_eq!(submission.reason, SubmitReason::TimeExpired);
        assert_eq!(submission.answers, vec![Some(2), Some(0), None]);
        assert_eq!(submission.elapsed_secs, 60);

        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn test_tick_after_manual_submit_is_discarded() {
        let mut session = started(1, 1);
        session.tick();
        let submission = session.submit(&mut yes).unwrap();
        assert_eq!(submission.elapsed_secs, 1);

        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 59);
    }

    #[test]
    fn test_expiry_skips_confirmation() {
        let mut session = started(1, 1);
        for _ in 0..59 {
            session.tick();
        }
        // A manual submit declined at the last second leaves the timer in charge.
        assert!(session.submit(&mut |_: usize| false).is_none());
        assert!(matches!(session.tick(), TickOutcome::Expired(_)));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(61), "01:01");
        assert_eq!(format_time(30 * 60), "30:00");
    }
}
