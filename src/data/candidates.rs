//! Validation of loosely-typed question candidates.
//!
//! AI responses and JSON question banks both arrive as untyped JSON. Each
//! candidate must look like
//! `{"question": string, "options": [4 strings], "correctAnswerIndex": 0..=3}`;
//! anything else is discarded rather than failing the batch.

use serde_json::Value;
use tracing::warn;

use crate::models::{Question, OPTION_COUNT};

/// Candidates that passed validation, plus how many were thrown away.
#[derive(Debug, Clone, Default)]
pub struct CandidateBatch {
    pub questions: Vec<Question>,
    pub discarded: usize,
}

/// Pull the candidate list out of either a bare array or `{"questions": [...]}`.
pub fn candidate_list(root: Value) -> Option<Vec<Value>> {
    match root {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

pub fn validate_candidates(candidates: Vec<Value>) -> CandidateBatch {
    let total = candidates.len();
    let questions: Vec<Question> = candidates.iter().filter_map(candidate_question).collect();
    let discarded = total - questions.len();

    if discarded > 0 {
        warn!(
            discarded,
            total, "Some question candidates had an invalid format and were filtered out"
        );
    }

    CandidateBatch {
        questions,
        discarded,
    }
}

fn candidate_question(candidate: &Value) -> Option<Question> {
    let text = candidate.get("question")?.as_str()?;

    let options = candidate.get("options")?.as_array()?;
    if options.len() != OPTION_COUNT {
        return None;
    }
    let options: Vec<String> = options
        .iter()
        .map(|option| option.as_str().map(String::from))
        .collect::<Option<_>>()?;
    let options: [String; OPTION_COUNT] = options.try_into().ok()?;

    let index = candidate.get("correctAnswerIndex")?.as_u64()?;
    let index = usize::try_from(index).ok()?;

    Question::new(text, options, index).ok()
}
