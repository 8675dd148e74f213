use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::LoadError;
use crate::models::Question;

use super::candidates::{candidate_list, validate_candidates};

/// Load a JSON question bank.
///
/// The file holds either an array of questions or `{"questions": [...]}`,
/// each in the same shape the live test is stored in. Invalid entries are
/// dropped; a file with no valid entry at all is an error.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    questions_from_json_str(&json_content, path)
}

pub(crate) fn questions_from_json_str(content: &str, path: &Path) -> Result<Vec<Question>, LoadError> {
    let root: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let candidates = candidate_list(root).unwrap_or_default();
    let batch = validate_candidates(candidates);

    if batch.questions.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    info!(
        path = %path.display(),
        questions = batch.questions.len(),
        discarded = batch.discarded,
        "Loaded question bank"
    );
    Ok(batch.questions)
}
