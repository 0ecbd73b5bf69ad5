use crate::config::{ConfigUpdate, QuizConfiguration};
use crate::countdown::{Countdown, CountdownTick, TIME_BUDGET};
use crate::errors::{FetchError, SessionError};
use crate::question::Question;
use crate::results::QuizResults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle position of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Phase {
    /// Editing the configuration (start screen, or after a failed fetch)
    Configuring,
    /// Waiting for the question bank
    Loading,
    /// Showing question `index`
    Presenting { index: usize },
    /// Every question answered or timed out; results on screen
    Terminal,
}

impl Phase {
    pub fn presenting_index(&self) -> Option<usize> {
        match self {
            Phase::Presenting { index } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Configuring => f.write_str("configuring"),
            Phase::Loading => f.write_str("loading questions"),
            Phase::Presenting { index } => write!(f, "presenting question {}", index + 1),
            Phase::Terminal => f.write_str("showing results"),
        }
    }
}

/// Captured outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The option picked, still entity-encoded; `None` when time ran out
    pub selected_option: Option<String>,
    pub is_correct: bool,
    pub timed_out: bool,
}

impl AnswerRecord {
    fn answered(option: String, is_correct: bool) -> Self {
        Self {
            selected_option: Some(option),
            is_correct,
            timed_out: false,
        }
    }

    fn timeout() -> Self {
        Self {
            selected_option: None,
            is_correct: false,
            timed_out: true,
        }
    }
}

/// What `begin` hands to whoever performs the fetch.
///
/// The result must be reported back with the same `ticket`; only the newest
/// ticket is ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub config: QuizConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32 },
    /// The tick emptied the countdown and a timeout record was stored
    TimedOut,
}

/// Quiz session state machine.
///
/// Owns configuration, questions, score, per-question answer records and
/// the countdown counter. Every operation either applies fully or returns a
/// [`SessionError`] without touching state.
///
/// # Examples
///
/// ```
/// use trivium_engine::question::{Question, RawQuestion};
/// use trivium_engine::session::{Phase, Session};
/// use trivium_engine::shuffle::Shuffler;
///
/// let mut session = Session::new();
/// let request = session.begin().expect("begin from configuring");
///
/// let raw = RawQuestion {
///     category: "General".into(),
///     question_type: "multiple".into(),
///     difficulty: "easy".into(),
///     question: "2 + 2?".into(),
///     correct_answer: "4".into(),
///     incorrect_answers: vec!["3".into(), "5".into(), "22".into()],
/// };
/// let mut shuffler = Shuffler::with_seed(7);
/// let questions = vec![Question::from_raw(raw, &mut shuffler)];
///
/// session.complete_fetch(request.ticket, Ok(questions)).unwrap();
/// assert_eq!(session.phase(), Phase::Presenting { index: 0 });
///
/// session.record_answer("4").unwrap();
/// session.advance().unwrap();
/// assert_eq!(session.phase(), Phase::Terminal);
/// assert_eq!(session.score(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: QuizConfiguration,
    phase: Phase,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answers: BTreeMap<usize, AnswerRecord>,
    countdown: Countdown,
    last_error: Option<String>,
    ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(QuizConfiguration::default())
    }

    pub fn with_config(config: QuizConfiguration) -> Self {
        Self {
            config,
            phase: Phase::Configuring,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answers: BTreeMap::new(),
            countdown: Countdown::new(TIME_BUDGET),
            last_error: None,
            ticket: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn config(&self) -> &QuizConfiguration {
        &self.config
    }
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
    pub fn current_index(&self) -> usize {
        self.current_index
    }
    pub fn score(&self) -> usize {
        self.score
    }
    pub fn answers(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answers
    }
    pub fn answer(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(&index)
    }
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }
    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
    pub fn current_ticket(&self) -> u64 {
        self.ticket
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.phase
            .presenting_index()
            .and_then(|i| self.questions.get(i))
    }

    /// Edit the pending configuration. Only allowed while configuring.
    pub fn configure(&mut self, update: &ConfigUpdate) -> Result<(), SessionError> {
        if self.phase != Phase::Configuring {
            return Err(self.invalid("configure", "configuration is locked once started"));
        }
        update.apply_to(&mut self.config)
    }

    /// Start loading a batch for the current configuration.
    ///
    /// Calling again while loading supersedes the pending request: a new
    /// ticket is issued and the older one becomes stale.
    pub fn begin(&mut self) -> Result<FetchRequest, SessionError> {
        if !matches!(self.phase, Phase::Configuring | Phase::Loading) {
            return Err(self.invalid("begin", "start a new quiz first"));
        }
        self.config.validate()?;
        self.ticket += 1;
        self.phase = Phase::Loading;
        self.last_error = None;
        Ok(FetchRequest {
            ticket: self.ticket,
            config: self.config.clone(),
        })
    }

    /// Apply the outcome of the fetch issued with `ticket`.
    ///
    /// A success populates the session and presents the first question; a
    /// failure (or an empty batch) returns to configuring with the message
    /// kept for display. Results for any other ticket are rejected.
    pub fn complete_fetch(
        &mut self,
        ticket: u64,
        result: Result<Vec<Question>, FetchError>,
    ) -> Result<(), SessionError> {
        if ticket != self.ticket {
            return Err(SessionError::StaleFetch {
                ticket,
                current: self.ticket,
            });
        }
        if self.phase != Phase::Loading {
            return Err(self.invalid("apply fetched questions", "no fetch is pending"));
        }
        match result {
            Ok(questions) if !questions.is_empty() => {
                self.questions = questions;
                self.start_pass();
            }
            Ok(_) => self.fail_fetch(&FetchError::Empty),
            Err(e) => self.fail_fetch(&e),
        }
        Ok(())
    }

    /// Answer the current question with one of its options (encoded text).
    pub fn record_answer(&mut self, option: &str) -> Result<AnswerRecord, SessionError> {
        let index = self.open_question("record an answer")?;
        let question = &self.questions[index];
        if !question.has_option(option) {
            return Err(SessionError::UnknownOption(option.to_string()));
        }
        let is_correct = question.is_correct(option);

        self.countdown.stop();
        if is_correct {
            self.score += 1;
        }
        let record = AnswerRecord::answered(option.to_string(), is_correct);
        self.answers.insert(index, record.clone());
        Ok(record)
    }

    /// Answer the current question by option position.
    pub fn select_option(&mut self, option_index: usize) -> Result<AnswerRecord, SessionError> {
        let index = self.open_question("select an option")?;
        let question = &self.questions[index];
        let option = question
            .option(option_index)
            .ok_or(SessionError::OptionOutOfRange {
                index: option_index,
                len: question.options().len(),
            })?
            .to_string();
        self.record_answer(&option)
    }

    /// Store a timeout for the current question once its countdown is empty.
    pub fn record_timeout(&mut self) -> Result<AnswerRecord, SessionError> {
        let index = self.presenting("record a timeout")?;
        if self.answers.contains_key(&index) {
            return Err(self.invalid("record a timeout", "question already answered"));
        }
        if !self.countdown.is_expired() {
            return Err(self.invalid("record a timeout", "time has not run out"));
        }
        self.countdown.stop();
        let record = AnswerRecord::timeout();
        self.answers.insert(index, record.clone());
        Ok(record)
    }

    /// One countdown tick for the current question. The tick that empties
    /// the countdown also records the timeout.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.open_question("tick the countdown")?;
        match self.countdown.tick() {
            None => Err(self.invalid("tick the countdown", "countdown is not running")),
            Some(CountdownTick::Running(remaining)) => Ok(TickOutcome::Running { remaining }),
            Some(CountdownTick::Expired) => {
                self.record_timeout()?;
                Ok(TickOutcome::TimedOut)
            }
        }
    }

    /// Move past an answered question, to the next one or to the results.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        let index = self.presenting("advance")?;
        if !self.answers.contains_key(&index) {
            return Err(self.invalid("advance", "no answer recorded yet"));
        }
        self.countdown.stop();
        let next = index + 1;
        self.current_index = next;
        if next < self.questions.len() {
            self.phase = Phase::Presenting { index: next };
            self.countdown.start();
        } else {
            self.phase = Phase::Terminal;
        }
        Ok(self.phase)
    }

    /// Replay the same questions, in the same option order, from the start.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Terminal {
            return Err(self.invalid("restart", "the quiz is not finished"));
        }
        self.start_pass();
        Ok(())
    }

    /// Drop everything and go back to a default configuration.
    ///
    /// Allowed from any phase. Any fetch still in flight becomes stale.
    pub fn new_quiz(&mut self) {
        self.countdown.reset();
        self.questions.clear();
        self.answers.clear();
        self.score = 0;
        self.current_index = 0;
        self.config = QuizConfiguration::default();
        self.last_error = None;
        self.phase = Phase::Configuring;
        self.ticket += 1;
    }

    /// Final breakdown, available once the session is terminal.
    pub fn results(&self) -> Option<QuizResults> {
        if self.phase != Phase::Terminal {
            return None;
        }
        Some(QuizResults::from_parts(
            &self.questions,
            &self.answers,
            self.score,
        ))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let total = self.questions.len();
        let progress = match self.phase {
            Phase::Presenting { index } if total > 0 => (index + 1) as f64 / total as f64,
            Phase::Terminal => 1.0,
            _ => 0.0,
        };
        let answer = self
            .phase
            .presenting_index()
            .and_then(|i| self.answers.get(&i))
            .cloned();
        let question = self.phase.presenting_index().and_then(|i| {
            self.questions
                .get(i)
                .map(|q| QuestionView::new(i, q, answer.is_some()))
        });

        SessionSnapshot {
            phase: self.phase,
            config: self.config.clone(),
            current_index: self.current_index,
            total_questions: total,
            progress,
            time_remaining: self.countdown.remaining(),
            score: self.score,
            question,
            answer,
            error: self.last_error.clone(),
            results: self.results(),
        }
    }

    fn start_pass(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.phase = Phase::Presenting { index: 0 };
        self.countdown.start();
    }

    fn fail_fetch(&mut self, error: &FetchError) {
        self.questions.clear();
        self.countdown.reset();
        self.last_error = Some(error.user_message());
        self.phase = Phase::Configuring;
    }

    fn presenting(&self, operation: &'static str) -> Result<usize, SessionError> {
        self.phase
            .presenting_index()
            .ok_or_else(|| self.invalid(operation, "no question is on screen"))
    }

    /// Index of the current question if it can still take an answer.
    fn open_question(&self, operation: &'static str) -> Result<usize, SessionError> {
        let index = self.presenting(operation)?;
        if self.answers.contains_key(&index) {
            return Err(self.invalid(operation, "question already answered"));
        }
        Ok(index)
    }

    fn invalid(&self, operation: &'static str, reason: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            phase: self.phase,
            reason,
        }
    }
}

/// Render-ready view of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// 1-based question number
    pub number: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: String,
    /// Position of the correct option, revealed once the question has a record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

impl QuestionView {
    fn new(index: usize, question: &Question, reveal: bool) -> Self {
        Self {
            number: index + 1,
            prompt: question.display_prompt(),
            options: question.display_options(),
            category: crate::question::decode_entities(question.category()),
            difficulty: question.difficulty().to_string(),
            correct_option: if reveal {
                question.correct_index()
            } else {
                None
            },
        }
    }
}

/// Everything a presentation needs to redraw after a transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub config: QuizConfiguration,
    pub current_index: usize,
    pub total_questions: usize,
    /// `(current_index + 1) / total` while presenting
    pub progress: f64,
    pub time_remaining: u32,
    pub score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present once the session is terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<QuizResults>,
}
