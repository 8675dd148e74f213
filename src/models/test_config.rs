use serde::{Deserialize, Serialize};

use crate::error::InvalidTest;

use super::Question;

/// The live test: the only durable state in the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTestConfig")]
pub struct TestConfig {
    questions: Vec<Question>,
    #[serde(rename = "timeLimit")]
    time_limit_minutes: u32,
}

impl TestConfig {
    pub fn new(questions: Vec<Question>, time_limit_minutes: u32) -> Result<Self, InvalidTest> {
        if questions.is_empty() {
            return Err(InvalidTest::NoQuestions);
        }
        if time_limit_minutes == 0 {
            return Err(InvalidTest::ZeroTimeLimit);
        }

        Ok(Self {
            questions,
            time_limit_minutes,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_minutes.saturating_mul(60)
    }
}

#[derive(Deserialize)]
struct RawTestConfig {
    questions: Vec<Question>,
    #[serde(rename = "timeLimit")]
    time_limit: u32,
}

impl TryFrom<RawTestConfig> for TestConfig {
    type Error = InvalidTest;

    fn try_from(raw: RawTestConfig) -> Result<Self, Self::Error> {
        TestConfig::new(raw.questions, raw.time_limit)
    }
}
