//! Parsing of the lines typed during `trivium play`.
//!
//! What a line means depends on the screen: while a question is open the
//! letters pick an option; on the feedback screen Enter moves on; on the
//! results screen `r` replays and `n` starts over.

/// Input while a question is waiting for an answer.
#[derive(Debug, PartialEq, Eq)]
pub enum AnswerInput {
    /// 0-based option position
    Option(usize),
    Quit,
    Invalid(String),
}

/// Input once the current question has a record.
#[derive(Debug, PartialEq, Eq)]
pub enum ContinueInput {
    Next,
    Quit,
    Invalid(String),
}

/// Input on the results screen, or after a failed load.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuInput {
    /// Replay the same questions (results) or retry the load (failure)
    Again,
    NewQuiz,
    Quit,
    Invalid(String),
}

fn is_quit(input: &str) -> bool {
    input == "q" || input == "quit"
}

/// Parse an answer: `a`-`z` or `1`-`N` for an `option_count`-option question.
///
/// ```rust
/// use trivium_cli::validation::{parse_answer, AnswerInput};
///
/// assert_eq!(parse_answer("b", 4), AnswerInput::Option(1));
/// assert_eq!(parse_answer(" 4 ", 4), AnswerInput::Option(3));
/// assert_eq!(parse_answer("q", 4), AnswerInput::Quit);
/// assert!(matches!(parse_answer("e", 4), AnswerInput::Invalid(_)));
/// ```
pub fn parse_answer(input: &str, option_count: usize) -> AnswerInput {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return AnswerInput::Invalid("Type a letter or number to answer".to_string());
    }
    if is_quit(&input) {
        return AnswerInput::Quit;
    }

    let index = match input.as_bytes() {
        [c @ b'a'..=b'z'] => Some(usize::from(c - b'a')),
        _ => input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)),
    };
    match index {
        Some(i) if i < option_count => AnswerInput::Option(i),
        _ => AnswerInput::Invalid(format!(
            "'{}' is not an option (choose {} or 1-{})",
            input,
            option_letters(option_count),
            option_count
        )),
    }
}

pub fn parse_continue(input: &str) -> ContinueInput {
    match input.trim().to_lowercase().as_str() {
        "" | "n" | "next" => ContinueInput::Next,
        i if is_quit(i) => ContinueInput::Quit,
        other => ContinueInput::Invalid(format!(
            "Unrecognized input '{}': press Enter to continue or q to quit",
            other
        )),
    }
}

pub fn parse_menu(input: &str) -> MenuInput {
    match input.trim().to_lowercase().as_str() {
        "r" | "retry" | "restart" | "again" => MenuInput::Again,
        "n" | "new" => MenuInput::NewQuiz,
        i if is_quit(i) => MenuInput::Quit,
        other => MenuInput::Invalid(format!(
            "Unrecognized input '{}': r to play again, n for a new quiz, q to quit",
            other
        )),
    }
}

/// `a-d` for four options.
fn option_letters(option_count: usize) -> String {
    let last = (b'a' + option_count.clamp(1, 26) as u8 - 1) as char;
    format!("a-{}", last)
}
