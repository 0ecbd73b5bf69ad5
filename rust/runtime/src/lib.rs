//! # trivium-runtime: Quiz Event Loop
//!
//! Drives a [`trivium_engine::session::Session`] in real time: a single
//! controller task serializes presentation commands, one-second countdown
//! ticks and question-bank fetch completions, and publishes [`QuizEvent`]s
//! for whatever is drawing the quiz.
//!
//! ## Core Modules
//!
//! - [`controller`] - [`QuizController`] event loop and its [`QuizHandle`]
//! - [`timer`] - Cancellable countdown tick task
//! - [`events`] - [`EventBus`] fan-out of [`QuizEvent`]s
//! - [`logging`] - `tracing` setup and an in-memory capture for tests

pub mod controller;
pub mod events;
pub mod logging;
pub mod timer;

pub use controller::{QuizController, QuizHandle, RuntimeError, RuntimeOptions};
pub use events::{EventBus, EventSubscription, QuizEvent};
pub use logging::{capture_logs, init_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use timer::{CountdownTimer, TimerSlot, DEFAULT_TICK_INTERVAL};
