//! Tutor dashboard: the draft question list and the actions on it.
//!
//! Loading or generating replaces the draft only on success; failures leave
//! the previous draft in place and set the error line instead.

use std::path::Path;

use tracing::{error, info};

use crate::config::Settings;
use crate::data::{parse_spreadsheet, questions_from_json_str, ConfigStore, LiveTest, SkippedRow};
use crate::error::{GenerationError, QuizError, StoreError};
use crate::generate::{generate_questions, QuestionGenerator};
use crate::models::{Question, TestConfig};

/// Questions read from a file, with the rows that were left out.
#[derive(Debug, Clone)]
pub struct Imported {
    pub questions: Vec<Question>,
    pub skipped: Vec<SkippedRow>,
}

/// Read questions from a spreadsheet, or from a JSON question bank when the
/// file has a `.json` extension.
pub async fn import_questions(path: &Path) -> Result<Imported, QuizError> {
    let bytes = tokio::fs::read(path).await?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let content = String::from_utf8_lossy(&bytes);
        let questions = questions_from_json_str(&content, path)?;
        return Ok(Imported {
            questions,
            skipped: Vec::new(),
        });
    }

    let parsed = parse_spreadsheet(&bytes)?;
    Ok(Imported {
        questions: parsed.questions,
        skipped: parsed.skipped,
    })
}

/// Editable dashboard fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Source,
    Topic,
    Count,
    TimeLimit,
}

impl Field {
    const ORDER: [Field; 4] = [Field::Source, Field::Topic, Field::Count, Field::TimeLimit];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Field {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Field {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn numeric(self) -> bool {
        matches!(self, Field::Count | Field::TimeLimit)
    }
}

pub struct Dashboard {
    questions: Vec<Question>,
    pub source_path: String,
    pub topic: String,
    pub count: String,
    pub time_limit: String,
    pub focus: Field,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl Dashboard {
    /// Start a draft from the live test, if there is one.
    pub fn new(settings: &Settings, live: Option<&TestConfig>) -> Self {
        let (questions, time_limit) = match live {
            Some(config) => (config.questions().to_vec(), config.time_limit_minutes()),
            None => (Vec::new(), settings.default_time_limit),
        };

        Self {
            questions,
            source_path: String::new(),
            topic: settings.ai.default_topic.clone(),
            count: settings.ai.default_count.to_string(),
            time_limit: time_limit.to_string(),
            focus: Field::Source,
            status: None,
            error: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Source => &mut self.source_path,
            Field::Topic => &mut self.topic,
            Field::Count => &mut self.count,
            Field::TimeLimit => &mut self.time_limit,
        }
    }

    pub fn input_push(&mut self, c: char) {
        if self.focus.numeric() && !c.is_ascii_digit() {
            return;
        }
        self.focused_input().push(c);
    }

    pub fn input_pop(&mut self) {
        self.focused_input().pop();
    }

    fn report_error(&mut self, message: String) {
        error!(%message, "Dashboard action failed");
        self.status = None;
        self.error = Some(message);
    }

    fn report_status(&mut self, message: String) {
        self.error = None;
        self.status = Some(message);
    }

    /// Replace the draft with questions from `source_path`.
    pub async fn load_source(&mut self) {
        let path = self.source_path.trim().to_string();
        if path.is_empty() {
            self.report_error("Enter the path of an .xlsx, .xls or .json file first.".to_string());
            return;
        }

        let path = Path::new(&path);
        match import_questions(path).await {
            Ok(imported) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());

                let mut message = format!(
                    "{} questions loaded successfully from {}.",
                    imported.questions.len(),
                    file_name
                );
                if !imported.skipped.is_empty() {
                    message.push_str(&format!(" {} rows skipped.", imported.skipped.len()));
                }

                info!(file = %file_name, questions = imported.questions.len(), "Draft replaced from file");
                self.questions = imported.questions;
                self.report_status(message);
            }
            Err(e) => self.report_error(e.to_string()),
        }
    }

    /// Replace the draft with AI-generated questions.
    pub async fn generate<G: QuestionGenerator>(
        &mut self,
        generator: Result<&G, GenerationError>,
    ) {
        let count = self.count.trim().parse::<usize>().unwrap_or(0);

        let result = match generator {
            Ok(generator) => generate_questions(generator, self.topic.trim(), count).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(batch) => {
                let mut message = format!("{} questions generated successfully!", batch.questions.len());
                if batch.is_short() {
                    message.push_str(&format!(
                        " ({} requested, {} discarded as invalid)",
                        batch.requested, batch.discarded
                    ));
                }
                self.questions = batch.questions;
                self.report_status(message);
            }
            Err(e) => self.report_error(e.to_string()),
        }
    }

    /// Activate the draft as the live test.
    pub fn save<S: ConfigStore>(&mut self, live: &mut LiveTest<S>) -> Option<TestConfig> {
        if self.questions.is_empty() {
            self.report_error("Please load or generate questions before saving.".to_string());
            return None;
        }

        let minutes = self.time_limit.trim().parse::<u32>().unwrap_or(0);
        let config = match TestConfig::new(self.questions.clone(), minutes) {
            Ok(config) => config,
            Err(e) => {
                self.report_error(e.to_string());
                return None;
            }
        };

        match live.save(&config) {
            Ok(()) => {
                self.report_status(
                    "Test configuration saved and is now live for students!".to_string(),
                );
                Some(config)
            }
            Err(e) => {
                self.report_error(e.to_string());
                None
            }
        }
    }

    /// Remove the live test; the draft is kept.
    pub fn reset<S: ConfigStore>(&mut self, live: &mut LiveTest<S>) -> Result<(), StoreError> {
        match live.clear() {
            Ok(()) => {
                self.report_status("The live test has been reset.".to_string());
                Ok(())
            }
            Err(e) => {
                self.report_error(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::data::MemoryStore;

    struct Canned(Vec<Value>);

    impl QuestionGenerator for Canned {
        async fn candidates(&self, _topic: &str, _count: usize) -> Result<Vec<Value>, GenerationError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl QuestionGenerator for Down {
        async fn candidates(&self, _topic: &str, _count: usize) -> Result<Vec<Value>, GenerationError> {
            Err(GenerationError::Service {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn candidate(text: &str) -> Value {
        json!({"question": text, "options": ["a", "b", "c", "d"], "correctAnswerIndex": 0})
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(&Settings::default(), None)
    }

    #[test]
    fn test_defaults() {
        let dash = dashboard();
        assert_eq!(dash.time_limit, "30");
        assert_eq!(dash.count, "5");
        assert_eq!(dash.topic, "General Knowledge");
        assert!(dash.questions().is_empty());
    }

    #[test]
    fn test_numeric_fields_take_digits_only() {
        let mut dash = dashboard();
        dash.focus = Field::Count;
        dash.input_pop();
        dash.input_push('x');
        dash.input_push('1');
        dash.input_push('2');
        assert_eq!(dash.count, "12");

        dash.focus_next();
        assert_eq!(dash.focus, Field::TimeLimit);
        dash.focus_next();
        assert_eq!(dash.focus, Field::Source);
        dash.focus_previous();
        assert_eq!(dash.focus, Field::TimeLimit);
    }

    #[tokio::test]
    async fn test_generation_replaces_draft() {
        let mut dash = dashboard();
        dash.count = "2".to_string();
        dash.generate(Ok(&Canned(vec![candidate("one"), candidate("two")])))
            .await;

        assert_eq!(dash.questions().len(), 2);
        assert_eq!(dash.status.as_deref(), Some("2 questions generated successfully!"));
        assert!(dash.error.is_none());
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_draft() {
        let mut dash = dashboard();
        dash.count = "1".to_string();
        dash.generate(Ok(&Canned(vec![candidate("kept")]))).await;

        dash.generate(Ok(&Down)).await;
        assert_eq!(dash.questions().len(), 1);
        assert_eq!(dash.questions()[0].text(), "kept");
        assert!(dash.error.as_deref().unwrap().contains("overloaded"));

        dash.generate::<Canned>(Err(GenerationError::MissingApiKey("OPENAI_API_KEY".to_string())))
            .await;
        assert_eq!(dash.questions().len(), 1);
        assert_eq!(
            dash.error.as_deref(),
            Some("OPENAI_API_KEY environment variable not set")
        );
    }

    #[tokio::test]
    async fn test_short_batch_is_reported() {
        let mut dash = dashboard();
        dash.count = "3".to_string();
        dash.generate(Ok(&Canned(vec![candidate("one"), json!({"question": "bad"})])))
            .await;

        let status = dash.status.unwrap();
        assert!(status.starts_with("1 questions generated successfully!"));
        assert!(status.contains("3 requested, 1 discarded"));
    }

    #[tokio::test]
    async fn test_missing_file_keeps_draft() {
        let mut dash = dashboard();
        dash.source_path = "/no/such/file.xlsx".to_string();
        dash.load_source().await;
        assert!(dash.error.is_some());
        assert!(dash.questions().is_empty());
    }

    #[test]
    fn test_save_validation() {
        let mut live = LiveTest::new(MemoryStore::new());
        let mut dash = dashboard();

        assert!(dash.save(&mut live).is_none());
        assert_eq!(
            dash.error.as_deref(),
            Some("Please load or generate questions before saving.")
        );

        dash.questions = vec![Question::new("q", ["a", "b", "c", "d"].map(String::from), 0).unwrap()];
        dash.time_limit = "0".to_string();
        assert!(dash.save(&mut live).is_none());
        assert_eq!(dash.error.as_deref(), Some("Time limit must be greater than zero."));
        assert_eq!(live.load().unwrap(), None);

        dash.time_limit = "20".to_string();
        let saved = dash.save(&mut live).unwrap();
        assert_eq!(saved.time_limit_minutes(), 20);
        assert_eq!(live.load().unwrap(), Some(saved));

        dash.reset(&mut live).unwrap();
        assert_eq!(live.load().unwrap(), None);
        assert_eq!(dash.questions().len(), 1);
    }
}
