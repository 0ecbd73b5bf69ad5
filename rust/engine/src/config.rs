use crate::errors::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question counts a quiz may request.
pub const ALLOWED_AMOUNTS: [u32; 4] = [5, 10, 15, 20];

/// Question count used by a fresh configuration.
pub const DEFAULT_AMOUNT: u32 = 10;

/// Difficulty filter understood by the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            )),
        }
    }
}

/// Answer format. Only multiple choice is played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Multiple,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
        }
    }
}

/// Parameters of a question batch request.
///
/// Editable only while the session is configuring; each fetch captures its
/// own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfiguration {
    /// Number of questions requested (one of [`ALLOWED_AMOUNTS`])
    pub amount: u32,
    /// Question bank category id, `None` for any category
    pub category: Option<u32>,
    /// Difficulty filter, `None` for any difficulty
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

impl Default for QuizConfiguration {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            category: None,
            difficulty: None,
            question_type: QuestionType::Multiple,
        }
    }
}

impl QuizConfiguration {
    pub fn validate(&self) -> Result<(), SessionError> {
        validate_amount(self.amount)
    }
}

pub fn validate_amount(amount: u32) -> Result<(), SessionError> {
    if ALLOWED_AMOUNTS.contains(&amount) {
        Ok(())
    } else {
        Err(SessionError::InvalidConfig(format!(
            "amount must be one of {:?}, got {}",
            ALLOWED_AMOUNTS, amount
        )))
    }
}

/// Partial edit of a [`QuizConfiguration`].
///
/// Fields left as `None` are untouched. The optional filters use a nested
/// option so they can be cleared back to "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub amount: Option<u32>,
    pub category: Option<Option<u32>>,
    pub difficulty: Option<Option<Difficulty>>,
}

impl ConfigUpdate {
    pub fn amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: Option<u32>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.difficulty.is_none()
    }

    /// Apply to `config`, leaving it unchanged if the update is invalid.
    pub fn apply_to(&self, config: &mut QuizConfiguration) -> Result<(), SessionError> {
        // amount is the only checked field, so it goes first
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
            config.amount = amount;
        }
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        Ok(())
    }
}
