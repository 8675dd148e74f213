use serde::{Deserialize, Serialize};

use crate::error::InvalidTest;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Letters used to label options on screen and in spreadsheets.
pub const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// A multiple-choice question with four options and one correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswerIndex")]
    correct_answer: usize,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: usize,
    ) -> Result<Self, InvalidTest> {
        if correct_answer >= OPTION_COUNT {
            return Err(InvalidTest::AnswerOutOfRange(correct_answer));
        }

        Ok(Self {
            text: text.into(),
            options,
            correct_answer,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    /// Text of the option at `index`, if it exists.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswerIndex")]
    correct_answer_index: usize,
}

impl TryFrom<RawQuestion> for Question {
    type Error = InvalidTest;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(raw.question, raw.options, raw.correct_answer_index)
    }
}
