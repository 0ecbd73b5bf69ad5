//! # trivium-bank: Question Bank Client
//!
//! Fetches question batches from an Open Trivia Database compatible service
//! and turns them into shuffled, ready-to-present [`Question`]s.
//!
//! ## Core Components
//!
//! - [`QuestionSource`] - Trait over anything that can supply raw question records
//! - [`opentdb`] - HTTP client for the Open Trivia Database API
//! - [`fetch_questions`] - Fetch a batch and normalize it in one step
//! - [`create_source`] - Factory for sources by name
//!
//! ## Quick Start
//!
//! ```no_run
//! use trivium_bank::opentdb::{ClientSettings, OpenTdbClient};
//! use trivium_bank::fetch_questions;
//! use trivium_engine::config::QuizConfiguration;
//! use trivium_engine::shuffle::Shuffler;
//!
//! # async fn demo() -> Result<(), trivium_engine::errors::FetchError> {
//! let client = OpenTdbClient::new(ClientSettings::default())?;
//! let mut shuffler = Shuffler::new();
//! let questions = fetch_questions(&client, &QuizConfiguration::default(), &mut shuffler).await?;
//! println!("loaded {} questions", questions.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use opentdb::{ClientSettings, OpenTdbClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use trivium_engine::config::QuizConfiguration;
use trivium_engine::errors::FetchError;
use trivium_engine::question::{normalize_batch, Question, RawQuestion};
use trivium_engine::shuffle::Shuffler;

pub mod opentdb;

/// A category as listed by the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Anything that can supply raw question records for a configuration.
///
/// The HTTP client is the production implementation; tests plug in canned
/// sources.
///
/// # Example Implementation
///
/// ```rust
/// use async_trait::async_trait;
/// use trivium_bank::QuestionSource;
/// use trivium_engine::config::QuizConfiguration;
/// use trivium_engine::errors::FetchError;
/// use trivium_engine::question::RawQuestion;
///
/// struct Offline;
///
/// #[async_trait]
/// impl QuestionSource for Offline {
///     async fn fetch(&self, _config: &QuizConfiguration) -> Result<Vec<RawQuestion>, FetchError> {
///         Err(FetchError::Network("offline".into()))
///     }
///
///     fn name(&self) -> &str {
///         "offline"
///     }
/// }
/// ```
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Request one batch matching `config`.
    ///
    /// An `Ok` batch may hold fewer records than `config.amount`.
    async fn fetch(&self, config: &QuizConfiguration) -> Result<Vec<RawQuestion>, FetchError>;

    /// Categories the source can filter on. Sources without a catalogue
    /// return an empty list.
    async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str;
}

/// Name of the source used when none is configured.
pub const DEFAULT_SOURCE: &str = "opentdb";

#[derive(Debug, Error)]
pub enum BankError {
    #[error("Unknown question source: {0}")]
    UnknownSource(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Build a question source by name.
///
/// # Supported Sources
///
/// - `"opentdb"` - [`OpenTdbClient`] against `settings.base_url`
///
/// # Example
///
/// ```rust
/// use trivium_bank::create_source;
/// use trivium_bank::opentdb::ClientSettings;
///
/// let source = create_source("opentdb", ClientSettings::default()).expect("known source");
/// assert_eq!(source.name(), "opentdb");
/// assert!(create_source("carrier-pigeon", ClientSettings::default()).is_err());
/// ```
pub fn create_source(
    kind: &str,
    settings: ClientSettings,
) -> Result<Arc<dyn QuestionSource>, BankError> {
    match kind {
        "opentdb" => Ok(Arc::new(OpenTdbClient::new(settings)?)),
        other => Err(BankError::UnknownSource(other.to_string())),
    }
}

/// Fetch a batch from `source` and normalize it into shuffled questions.
///
/// An empty batch is reported as [`FetchError::Empty`] so callers never
/// start a quiz with nothing to show.
pub async fn fetch_questions(
    source: &dyn QuestionSource,
    config: &QuizConfiguration,
    shuffler: &mut Shuffler,
) -> Result<Vec<Question>, FetchError> {
    let raw = source.fetch(config).await?;
    if raw.is_empty() {
        return Err(FetchError::Empty);
    }
    if raw.len() < config.amount as usize {
        tracing::warn!(
            source = source.name(),
            requested = config.amount,
            received = raw.len(),
            "question bank returned a short batch"
        );
    }
    Ok(normalize_batch(raw, shuffler))
}
