use std::time::Duration;

use questionnaire::{
    score, Question, SubmitReason, TestConfig, TestSession, TickOutcome, Ticker,
};
use tokio::time::Instant;

fn config(minutes: u32) -> TestConfig {
    let questions = vec![
        Question::new("one", ["a", "b", "c", "d"].map(String::from), 0).unwrap(),
        Question::new("two", ["a", "b", "c", "d"].map(String::from), 3).unwrap(),
    ];
    TestConfig::new(questions, minutes).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_countdown_submits_after_time_limit() {
    let mut session = TestSession::new(Some(&config(1))).unwrap();
    session.start();
    session.select_answer(0).unwrap();

    let mut ticker = Ticker::every_second();
    ticker.arm();
    let start = Instant::now();

    let submission = loop {
        ticker.tick().await;
        match session.tick() {
            TickOutcome::Running(_) => continue,
            TickOutcome::Expired(submission) => break submission,
            TickOutcome::Ignored => panic!("session stopped without expiring"),
        }
    };
    ticker.cancel();

    assert_eq!(start.elapsed(), Duration::from_secs(60));
    assert_eq!(submission.reason, SubmitReason::TimeExpired);

    let result = score(session.questions(), &submission.answers);
    assert_eq!(result.correct, 1);
    assert_eq!(result.total, 2);
    assert_eq!(result.percentage, 50);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_ticker_stays_silent() {
    let mut session = TestSession::new(Some(&config(1))).unwrap();
    session.start();

    let mut ticker = Ticker::every_second();
    ticker.arm();
    ticker.tick().await;
    session.tick();

    assert!(session.submit(&mut |_: usize| true).is_some());
    ticker.cancel();

    let late = tokio::time::timeout(Duration::from_secs(120), ticker.tick()).await;
    assert!(late.is_err());
    assert_eq!(session.tick(), TickOutcome::Ignored);
    assert_eq!(session.remaining_secs(), 59);
}
