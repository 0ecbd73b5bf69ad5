use crate::question::{decode_entities, Question};
use crate::session::AnswerRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// How one question went, decoded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    /// 1-based question number
    pub number: usize,
    pub prompt: String,
    pub correct_answer: String,
    /// `None` when the question timed out
    pub selected: Option<String>,
    pub is_correct: bool,
    pub timed_out: bool,
}

/// Score breakdown shown once the session is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    /// Score as a percentage, rounded half up
    pub percentage: u32,
    pub breakdown: Vec<QuestionOutcome>,
}

impl QuizResults {
    pub fn from_parts(
        questions: &[Question],
        answers: &BTreeMap<usize, AnswerRecord>,
        score: usize,
    ) -> Self {
        let breakdown = questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let record = answers.get(&i);
                QuestionOutcome {
                    number: i + 1,
                    prompt: q.display_prompt(),
                    correct_answer: decode_entities(q.correct_answer()),
                    selected: record
                        .and_then(|r| r.selected_option.as_deref())
                        .map(decode_entities),
                    is_correct: record.is_some_and(|r| r.is_correct),
                    timed_out: record.is_some_and(|r| r.timed_out),
                }
            })
            .collect();

        Self {
            score,
            total: questions.len(),
            percentage: percentage(score, questions.len()),
            breakdown,
        }
    }
}

fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}
