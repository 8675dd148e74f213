mod candidates;
mod loader;
mod spreadsheet;
mod store;

pub use candidates::{candidate_list, validate_candidates, CandidateBatch};
pub use loader::load_questions_from_json;
pub(crate) use loader::questions_from_json_str;
pub use spreadsheet::{
    answer_index, parse_range, parse_spreadsheet, ParsedSheet, SkipReason, SkippedRow,
    REQUIRED_HEADERS,
};
pub use store::{ConfigStore, FileStore, LiveTest, MemoryStore, LIVE_TEST_KEY};
