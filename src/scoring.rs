//! Scoring and answer review of a submitted attempt.

use crate::models::{Answer, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent, halves rounding up.
    pub percentage: u32,
}

/// Count answers matching the correct option. Unanswered never counts.
pub fn score(questions: &[Question], answers: &[Answer]) -> Score {
    let correct = answers
        .iter()
        .zip(questions.iter())
        .filter(|(answer, question)| **answer == Some(question.correct_answer()))
        .count();

    Score {
        correct,
        total: questions.len(),
        percentage: percentage(correct, questions.len()),
    }
}

fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(correct / total * 100) in integers: (200c + t) / 2t
    ((correct * 200 + total) / (total * 2)) as u32
}

/// One line of the answer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub question_text: String,
    pub correct_option: String,
    /// `None` when the question was left unanswered.
    pub your_option: Option<String>,
    pub is_correct: bool,
}

impl ReviewEntry {
    pub fn your_answer_label(&self) -> &str {
        self.your_option.as_deref().unwrap_or("Not Answered")
    }
}

pub fn review(questions: &[Question], answers: &[Answer]) -> Vec<ReviewEntry> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let answer = answers.get(i).copied().flatten();
            ReviewEntry {
                question_text: question.text().to_string(),
                correct_option: question.correct_option().to_string(),
                your_option: answer.and_then(|a| question.option(a)).map(String::from),
                is_correct: answer == Some(question.correct_answer()),
            }
        })
        .collect()
}
