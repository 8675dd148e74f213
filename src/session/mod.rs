//! Test-taking: the attempt state machine and its countdown tick.

mod test_session;
mod ticker;

pub use test_session::{
    format_time, ConfirmSubmit, SessionStatus, SubmitReason, Submission, TestSession, TickOutcome,
};
pub use ticker::Ticker;
