//! AI question generation.
//!
//! The service behind [`QuestionGenerator`] only returns raw JSON
//! candidates. [`generate_questions`] validates the request, filters the
//! candidates and reports how many were lost.

mod openai;

use std::future::Future;

use serde_json::Value;
use tracing::{info, warn};

use crate::data::validate_candidates;
use crate::error::GenerationError;
use crate::models::Question;

pub use openai::OpenAiGenerator;

/// Largest batch a tutor may request at once.
pub const MAX_GENERATED: usize = 20;

/// An external service that writes questions about a topic.
pub trait QuestionGenerator {
    /// Ask for `count` questions about `topic`; returns the raw candidates.
    fn candidates(
        &self,
        topic: &str,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Value>, GenerationError>> + Send;
}

/// Questions accepted from one generation request.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub questions: Vec<Question>,
    pub requested: usize,
    pub discarded: usize,
}

impl GeneratedBatch {
    /// True when fewer questions came back than were asked for.
    pub fn is_short(&self) -> bool {
        self.questions.len() != self.requested
    }
}

pub fn check_count(count: usize) -> Result<(), GenerationError> {
    if (1..=MAX_GENERATED).contains(&count) {
        Ok(())
    } else {
        Err(GenerationError::InvalidCount {
            requested: count,
            max: MAX_GENERATED,
        })
    }
}

pub async fn generate_questions<G: QuestionGenerator>(
    generator: &G,
    topic: &str,
    count: usize,
) -> Result<GeneratedBatch, GenerationError> {
    check_count(count)?;

    let candidates = generator.candidates(topic, count).await?;
    let batch = validate_candidates(candidates);
    if batch.questions.is_empty() {
        return Err(GenerationError::NoUsableQuestions);
    }

    let generated = GeneratedBatch {
        questions: batch.questions,
        requested: count,
        discarded: batch.discarded,
    };

    if generated.is_short() {
        warn!(
            requested = count,
            received = generated.questions.len(),
            discarded = generated.discarded,
            "Generated batch differs from the requested size"
        );
    }
    info!(topic, questions = generated.questions.len(), "Questions generated");

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Canned(Vec<Value>);

    impl QuestionGenerator for Canned {
        async fn candidates(&self, _topic: &str, _count: usize) -> Result<Vec<Value>, GenerationError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl QuestionGenerator for Failing {
        async fn candidates(&self, _topic: &str, _count: usize) -> Result<Vec<Value>, GenerationError> {
            Err(GenerationError::Malformed("no questions array".to_string()))
        }
    }

    fn candidate(text: &str, index: i64) -> Value {
        json!({"question": text, "options": ["a", "b", "c", "d"], "correctAnswerIndex": index})
    }

    #[tokio::test]
    async fn test_rejects_count_out_of_range() {
        let generator = Canned(vec![]);
        for count in [0, 21] {
            let result = generate_questions(&generator, "topic", count).await;
            assert!(matches!(result, Err(GenerationError::InvalidCount { .. })));
        }
    }

    #[tokio::test]
    async fn test_reports_shortfall() {
        let generator = Canned(vec![candidate("one", 0), candidate("bad", 9), candidate("two", 3)]);
        let batch = generate_questions(&generator, "topic", 3).await.unwrap();

        assert_eq!(batch.questions.len(), 2);
        assert_eq!(batch.discarded, 1);
        assert!(batch.is_short());
    }

    #[tokio::test]
    async fn test_full_batch() {
        let generator = Canned(vec![candidate("one", 0), candidate("two", 1)]);
        let batch = generate_questions(&generator, "topic", 2).await.unwrap();
        assert!(!batch.is_short());
    }

    #[tokio::test]
    async fn test_nothing_usable() {
        let generator = Canned(vec![candidate("bad", 5)]);
        let result = generate_questions(&generator, "topic", 1).await;
        assert!(matches!(result, Err(GenerationError::NoUsableQuestions)));
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let result = generate_questions(&Failing, "topic", 5).await;
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }
}
