mod question;
mod state;
mod test_config;

pub use question::{Question, OPTION_COUNT, OPTION_LABELS};
pub use state::{AppState, Route};
pub use test_config::TestConfig;

/// The option chosen for one question; `None` means unanswered.
pub type Answer = Option<usize>;
