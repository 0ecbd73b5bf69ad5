//! # Play Command
//!
//! Interactive quiz in the terminal. The quiz itself runs on a
//! [`QuizController`]; this module only turns snapshots into screens and
//! typed lines into commands.
//!
//! ## Controls
//!
//! - `a`-`d` or `1`-`4`: answer the open question
//! - Enter: next question, or the results after the last one
//! - `r`: play the same questions again (results) or retry a failed load
//! - `n`: new quiz with fresh questions
//! - `q`: quit

use super::{load_config, runtime};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters::{
    format_time_warning, render_feedback, render_load_failure, render_question, render_results,
    TIME_WARNINGS,
};
use crate::ui;
use crate::validation::{
    parse_answer, parse_continue, parse_menu, AnswerInput, ContinueInput, MenuInput,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use trivium_bank::{create_source, DEFAULT_SOURCE};
use trivium_engine::config::ConfigUpdate;
use trivium_engine::session::{Phase, SessionSnapshot};
use trivium_runtime::{
    EventSubscription, QuizController, QuizEvent, QuizHandle, RuntimeError, RuntimeOptions,
};

/// Flags given to `trivium play`; unset ones fall back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub amount: Option<u32>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub seed: Option<u64>,
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    InputClosed,
}

pub fn handle_play_command(
    options: PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_config(&options)?;
    let runtime = runtime()?;

    let result = runtime.block_on(async {
        let source = create_source(DEFAULT_SOURCE, config.client_settings())?;
        let quiz = QuizController::spawn(
            source,
            RuntimeOptions {
                seed: options.seed,
                initial_config: config.quiz_configuration(),
                ..RuntimeOptions::default()
            },
        );
        let settings = config.as_update();
        let stdin = BufReader::new(tokio::io::stdin());
        tokio::select! {
            end = play_session(&quiz, &settings, stdin, out, err) => end,
            _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted("quiz abandoned".into())),
        }
    });
    // a pending stdin read would otherwise hold the runtime open
    runtime.shutdown_background();

    if result? == SessionEnd::InputClosed {
        writeln!(out)?;
    }
    writeln!(out, "Thanks for playing!")?;
    Ok(())
}

/// Apply `play` flags over the loaded configuration.
fn resolve_config(options: &PlayOptions) -> Result<Config, CliError> {
    let mut config = load_config()?;
    if let Some(amount) = options.amount {
        config.amount = amount;
    }
    if let Some(difficulty) = &options.difficulty {
        config.difficulty = config::parse_difficulty(difficulty).map_err(CliError::InvalidInput)?;
    }
    if let Some(category) = &options.category {
        config.category = config::parse_category(category).map_err(CliError::InvalidInput)?;
    }
    config::validate(&config).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Configuring,
    Loading,
    LoadFailed,
    Question(usize),
    Feedback(usize),
    Results,
}

impl Screen {
    fn of(snapshot: &SessionSnapshot) -> Self {
        match snapshot.phase {
            Phase::Configuring if snapshot.error.is_some() => Screen::LoadFailed,
            Phase::Configuring => Screen::Configuring,
            Phase::Loading => Screen::Loading,
            Phase::Presenting { index } if snapshot.answer.is_some() => Screen::Feedback(index),
            Phase::Presenting { index } => Screen::Question(index),
            Phase::Terminal => Screen::Results,
        }
    }
}

/// Run one interactive session against `quiz`, reading lines from `input`.
///
/// `settings` is re-applied whenever the user asks for a new quiz. Returns
/// when the user quits or `input` ends.
pub async fn play_session<R>(
    quiz: &QuizHandle,
    settings: &ConfigUpdate,
    input: R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<SessionEnd, CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut events = quiz.subscribe();

    quiz.begin().await?;
    let mut snapshot = settle(quiz, &mut events).await?;
    let mut shown: Option<Screen> = None;

    loop {
        let screen = Screen::of(&snapshot);
        if shown != Some(screen) {
            render(screen, &snapshot, out)?;
            shown = Some(screen);
        }

        match screen {
            Screen::Configuring => {
                accept(quiz.begin().await, err)?;
                snapshot = settle(quiz, &mut events).await?;
            }
            Screen::Loading => match events.recv().await {
                Some(QuizEvent::Transitioned { snapshot: next }) => snapshot = next,
                Some(_) => {}
                None => return Err(stopped()),
            },
            Screen::Question(_) => {
                let option_count = snapshot.question.as_ref().map_or(0, |q| q.options.len());
                // Events first: a queued timeout outranks a line typed after it
                tokio::select! {
                    biased;
                    event = events.recv() => match event {
                        Some(QuizEvent::Tick { remaining, .. }) if TIME_WARNINGS.contains(&remaining) => {
                            writeln!(out)?;
                            writeln!(out, "{}", format_time_warning(remaining))?;
                        }
                        Some(QuizEvent::TimedOut { .. }) => {
                            snapshot = settle(quiz, &mut events).await?;
                        }
                        Some(_) => {}
                        None => return Err(stopped()),
                    },
                    line = lines.next_line() => {
                        let Some(line) = line? else {
                            return Ok(SessionEnd::InputClosed);
                        };
                        match parse_answer(&line, option_count) {
                            AnswerInput::Option(index) => {
                                accept(quiz.select_option(index).await, err)?;
                                snapshot = settle(quiz, &mut events).await?;
                            }
                            AnswerInput::Quit => return Ok(SessionEnd::Quit),
                            AnswerInput::Invalid(msg) => ui::display_warning(err, &msg)?,
                        }
                    }
                }
            }
            Screen::Feedback(_) => {
                let Some(line) = lines.next_line().await? else {
                    return Ok(SessionEnd::InputClosed);
                };
                match parse_continue(&line) {
                    ContinueInput::Next => {
                        accept(quiz.advance().await, err)?;
                        snapshot = settle(quiz, &mut events).await?;
                    }
                    ContinueInput::Quit => return Ok(SessionEnd::Quit),
                    ContinueInput::Invalid(msg) => ui::display_warning(err, &msg)?,
                }
            }
            Screen::Results | Screen::LoadFailed => {
                let Some(line) = lines.next_line().await? else {
                    return Ok(SessionEnd::InputClosed);
                };
                match parse_menu(&line) {
                    MenuInput::Again if screen == Screen::Results => {
                        accept(quiz.restart().await, err)?;
                        shown = None;
                    }
                    MenuInput::Again => {
                        accept(quiz.begin().await, err)?;
                        // a retry that fails at once lands on this same screen
                        shown = None;
                    }
                    MenuInput::NewQuiz => {
                        accept(quiz.new_quiz().await, err)?;
                        accept(quiz.configure(settings.clone()).await, err)?;
                        accept(quiz.begin().await, err)?;
                        shown = None;
                    }
                    MenuInput::Quit => return Ok(SessionEnd::Quit),
                    MenuInput::Invalid(msg) => ui::display_warning(err, &msg)?,
                }
                snapshot = settle(quiz, &mut events).await?;
            }
        }
    }
}

fn render(screen: Screen, snapshot: &SessionSnapshot, out: &mut dyn Write) -> std::io::Result<()> {
    match screen {
        Screen::Configuring => Ok(()),
        Screen::Loading => writeln!(out, "Loading questions..."),
        Screen::LoadFailed => render_load_failure(out, snapshot.error.as_deref().unwrap_or_default()),
        Screen::Question(_) => render_question(out, snapshot),
        Screen::Feedback(_) => render_feedback(out, snapshot),
        Screen::Results => match &snapshot.results {
            Some(results) => render_results(out, results),
            None => Ok(()),
        },
    }
}

/// Drop queued notifications and read the authoritative state.
///
/// Events already queued describe transitions the fresh snapshot includes;
/// anything broadcast afterwards is newer than it.
async fn settle(
    quiz: &QuizHandle,
    events: &mut EventSubscription,
) -> Result<SessionSnapshot, CliError> {
    while events.receiver.try_recv().is_ok() {}
    Ok(quiz.snapshot().await?)
}

/// A rejected command is reported and play goes on; a stopped controller ends it.
fn accept(
    result: Result<SessionSnapshot, RuntimeError>,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match result {
        Ok(_) => Ok(()),
        Err(RuntimeError::Rejected(e)) => {
            ui::display_warning(err, &e.to_string())?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn stopped() -> CliError {
    CliError::from(RuntimeError::Stopped)
}
