use crate::session::Phase;
use thiserror::Error;

/// Rejections raised by the session state machine.
///
/// These are caller-contract violations: the session is left exactly as it
/// was before the rejected call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {operation} while {phase}: {reason}")]
    InvalidTransition {
        operation: &'static str,
        phase: Phase,
        reason: &'static str,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("'{0}' is not an option of the current question")]
    UnknownOption(String),
    #[error("Option index {index} out of range (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("Fetch ticket {ticket} is stale (current ticket: {current})")]
    StaleFetch { ticket: u64, current: u64 },
}

/// Why a question batch could not be loaded.
///
/// Every variant renders with the same "Failed to load questions" prefix;
/// callers show the message and let the user retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to load questions: network error ({0})")]
    Network(String),
    #[error("Failed to load questions: question bank answered with HTTP {0}")]
    Status(u16),
    #[error("Failed to load questions: malformed response ({0})")]
    Malformed(String),
    #[error("Failed to load questions: {reason} (response code {code})")]
    Source { code: u32, reason: String },
    #[error("Failed to load questions: the question bank returned no questions")]
    Empty,
}

impl FetchError {
    /// Map a non-zero `response_code` to its documented meaning.
    pub fn from_response_code(code: u32) -> Self {
        let reason = match code {
            1 => "not enough questions for the chosen filters",
            2 => "the request contained an invalid parameter",
            3 => "session token not found",
            4 => "session token has returned every available question",
            5 => "too many requests, wait a few seconds and try again",
            _ => "the question bank reported an unknown failure",
        };
        FetchError::Source {
            code,
            reason: reason.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fetch_error_shares_the_user_facing_prefix() {
        let errors = [
            FetchError::Network("connection refused".into()),
            FetchError::Status(503),
            FetchError::Malformed("missing field `results`".into()),
            FetchError::from_response_code(1),
            FetchError::Empty,
        ];
        for e in errors {
            assert!(
                e.user_message().starts_with("Failed to load questions"),
                "unexpected message: {}",
                e
            );
        }
    }

    #[test]
    fn response_codes_carry_their_reason() {
        match FetchError::from_response_code(5) {
            FetchError::Source { code, reason } => {
                assert_eq!(code, 5);
                assert!(reason.contains("too many requests"));
            }
            other => panic!("expected Source, got {other:?}"),
        }
    }

    #[test]
    fn invalid_transition_names_operation_and_phase() {
        let err = SessionError::InvalidTransition {
            operation: "advance",
            phase: Phase::Loading,
            reason: "no question is on screen",
        };
        assert_eq!(
            err.to_string(),
            "Cannot advance while loading questions: no question is on screen"
        );
    }
}
