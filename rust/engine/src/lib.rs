//! # trivium-engine: Trivia Quiz Session Core
//!
//! The quiz session state machine and the pieces it is built from. Everything
//! here is synchronous and free of I/O: the question bank client and the
//! wall-clock timer live in `trivium-bank` and `trivium-runtime`.
//!
//! ## Core Modules
//!
//! - [`shuffle`] - Fisher–Yates shuffling with a seedable ChaCha20 RNG
//! - [`config`] - Quiz configuration (amount, category, difficulty, type)
//! - [`question`] - Raw question records and normalized questions
//! - [`countdown`] - Per-question countdown counter
//! - [`session`] - Session state machine and render snapshots
//! - [`results`] - Final score breakdown
//! - [`errors`] - Session and fetch error types
//!
//! ## Quick Start
//!
//! ```rust
//! use trivium_engine::config::{ConfigUpdate, Difficulty};
//! use trivium_engine::session::{Phase, Session};
//!
//! let mut session = Session::new();
//! session
//!     .configure(&ConfigUpdate::default().amount(5).difficulty(Some(Difficulty::Easy)))
//!     .expect("valid configuration");
//!
//! let request = session.begin().expect("begin from configuring");
//! assert_eq!(session.phase(), Phase::Loading);
//! assert_eq!(request.config.amount, 5);
//! ```
//!
//! ## Reproducible Option Order
//!
//! ```rust
//! use trivium_engine::shuffle::Shuffler;
//!
//! let a = Shuffler::with_seed(42).shuffled(vec![1, 2, 3, 4]);
//! let b = Shuffler::with_seed(42).shuffled(vec![1, 2, 3, 4]);
//! assert_eq!(a, b);
//! ```

pub mod config;
pub mod countdown;
pub mod errors;
pub mod question;
pub mod results;
pub mod session;
pub mod shuffle;

pub use config::{ConfigUpdate, Difficulty, QuestionType, QuizConfiguration};
pub use countdown::TIME_BUDGET;
pub use errors::{FetchError, SessionError};
pub use question::{Question, RawQuestion};
pub use results::QuizResults;
pub use session::{AnswerRecord, FetchRequest, Phase, Session, SessionSnapshot, TickOutcome};
pub use shuffle::Shuffler;
