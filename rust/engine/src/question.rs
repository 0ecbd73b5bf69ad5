use crate::shuffle::Shuffler;
use serde::{Deserialize, Serialize};

/// One record of a question bank `results` array, still entity-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A normalized multiple-choice question.
///
/// Text is kept exactly as the question bank sent it (HTML-entity encoded);
/// the `display_*` accessors decode it for rendering. Option order is fixed
/// at construction so every render shows the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    category: String,
    difficulty: String,
}

impl Question {
    /// Build a question from a raw record, shuffling
    /// `incorrect_answers ++ [correct_answer]` exactly once.
    pub fn from_raw(raw: RawQuestion, shuffler: &mut Shuffler) -> Self {
        let RawQuestion {
            category,
            difficulty,
            question,
            correct_answer,
            mut incorrect_answers,
            ..
        } = raw;
        incorrect_answers.push(correct_answer.clone());
        let options = shuffler.shuffled(incorrect_answers);
        Self {
            prompt: question,
            correct_answer,
            options,
            category,
            difficulty,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    pub fn display_prompt(&self) -> String {
        decode_entities(&self.prompt)
    }

    pub fn display_options(&self) -> Vec<String> {
        self.options.iter().map(|o| decode_entities(o)).collect()
    }
}

/// Normalize a whole batch. Either every record becomes a question or the
/// caller gets nothing back (see the bank client for the error side).
pub fn normalize_batch(raw: Vec<RawQuestion>, shuffler: &mut Shuffler) -> Vec<Question> {
    raw.into_iter()
        .map(|r| Question::from_raw(r, shuffler))
        .collect()
}

/// Decode HTML entities (`&quot;`, `&#039;`, `&eacute;`, ...) for display.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
