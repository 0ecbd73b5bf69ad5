//! The quiz event loop.
//!
//! One [`QuizController`] owns one [`Session`]. Presentation commands, timer
//! ticks and fetch completions share one inbox and are handled one at a time,
//! in arrival order, on the controller's task. A [`QuizHandle`] is the
//! cloneable front door to that task.

use crate::events::{EventBus, EventSubscription, QuizEvent};
use crate::timer::{TimerSlot, DEFAULT_TICK_INTERVAL};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use trivium_bank::{fetch_questions, QuestionSource};
use trivium_engine::config::{ConfigUpdate, QuizConfiguration};
use trivium_engine::errors::{FetchError, SessionError};
use trivium_engine::question::Question;
use trivium_engine::session::{FetchRequest, Phase, Session, SessionSnapshot, TickOutcome};
use trivium_engine::shuffle::Shuffler;

const INBOX_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rejected(#[from] SessionError),
    #[error("Quiz controller has stopped")]
    Stopped,
}

/// Knobs for a controller instance.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Wall-clock length of one countdown step.
    pub tick_interval: Duration,
    /// Seed for answer shuffling; OS entropy when `None`.
    pub seed: Option<u64>,
    /// Configuration the session starts with.
    pub initial_config: QuizConfiguration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            initial_config: QuizConfiguration::default(),
        }
    }
}

#[derive(Debug)]
enum Command {
    Configure(ConfigUpdate),
    Begin,
    SelectOption(usize),
    Advance,
    Restart,
    NewQuiz,
    Snapshot,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Configure(_) => "configure",
            Command::Begin => "begin",
            Command::SelectOption(_) => "select_option",
            Command::Advance => "advance",
            Command::Restart => "restart",
            Command::NewQuiz => "new_quiz",
            Command::Snapshot => "snapshot",
        }
    }
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
}

enum Message {
    Request(Request),
    Internal(Internal),
}

enum Internal {
    Tick {
        generation: u64,
    },
    Fetched {
        ticket: u64,
        result: Result<Vec<Question>, FetchError>,
    },
}

/// Cloneable handle to a running controller.
///
/// Every command resolves to the snapshot taken right after the transition,
/// or to the rejection. The controller stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    inbox: mpsc::Sender<Message>,
    bus: EventBus,
    // dropped with the last clone, which stops the controller
    _alive: Arc<oneshot::Sender<()>>,
}

impl QuizHandle {
    pub async fn configure(&self, update: ConfigUpdate) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::Configure(update)).await
    }

    pub async fn begin(&self) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::Begin).await
    }

    pub async fn select_option(&self, index: usize) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::SelectOption(index)).await
    }

    pub async fn advance(&self) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::Advance).await
    }

    pub async fn restart(&self) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::Restart).await
    }

    pub async fn new_quiz(&self) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::NewQuiz).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, RuntimeError> {
        self.request(Command::Snapshot).await
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.bus.subscribe()
    }

    async fn request(&self, command: Command) -> Result<SessionSnapshot, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(Message::Request(Request { command, reply }))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        let result = response.await.map_err(|_| RuntimeError::Stopped)?;
        Ok(result?)
    }
}

pub struct QuizController {
    session: Session,
    source: Arc<dyn QuestionSource>,
    shuffler: Shuffler,
    bus: EventBus,
    options: RuntimeOptions,
    inbox: mpsc::Receiver<Message>,
    inbox_tx: mpsc::Sender<Message>,
    handles_gone: oneshot::Receiver<()>,
    timer: TimerSlot,
    pending_fetch: Option<JoinHandle<()>>,
}

impl QuizController {
    /// Spawn a controller on the current tokio runtime.
    pub fn spawn(source: Arc<dyn QuestionSource>, options: RuntimeOptions) -> QuizHandle {
        let (handle, controller) = Self::new(source, options);
        tokio::spawn(controller.run());
        handle
    }

    pub fn new(source: Arc<dyn QuestionSource>, options: RuntimeOptions) -> (QuizHandle, Self) {
        let (inbox_tx, inbox) = mpsc::channel(INBOX_BUFFER);
        let (alive, handles_gone) = oneshot::channel();
        let bus = EventBus::new();
        let shuffler = match options.seed {
            Some(seed) => Shuffler::with_seed(seed),
            None => Shuffler::new(),
        };

        let controller = Self {
            session: Session::with_config(options.initial_config.clone()),
            source,
            shuffler,
            bus: bus.clone(),
            options,
            inbox,
            inbox_tx: inbox_tx.clone(),
            handles_gone,
            timer: TimerSlot::new(),
            pending_fetch: None,
        };
        let handle = QuizHandle {
            inbox: inbox_tx,
            bus,
            _alive: Arc::new(alive),
        };
        (handle, controller)
    }

    /// Process messages until every [`QuizHandle`] is gone.
    pub async fn run(mut self) {
        tracing::info!(source = self.source.name(), "quiz controller started");
        loop {
            tokio::select! {
                biased;
                message = self.inbox.recv() => match message {
                    Some(Message::Request(request)) => self.handle_request(request),
                    Some(Message::Internal(internal)) => self.handle_internal(internal),
                    None => break,
                },
                _ = &mut self.handles_gone => break,
            }
        }
        self.timer.disarm();
        self.cancel_fetch();
        tracing::info!("quiz controller stopped");
    }

    fn handle_request(&mut self, request: Request) {
        let Request { command, reply } = request;
        let name = command.name();
        let result = self.apply(command);
        if let Err(e) = &result {
            tracing::debug!(command = name, error = %e, "command rejected");
        }
        // a caller that stopped waiting is not an error
        let _ = reply.send(result);
    }

    fn apply(&mut self, command: Command) -> Result<SessionSnapshot, SessionError> {
        match command {
            Command::Configure(update) => {
                self.session.configure(&update)?;
            }
            Command::Begin => {
                let request = self.session.begin()?;
                self.start_fetch(request);
            }
            Command::SelectOption(index) => {
                let record = self.session.select_option(index)?;
                self.timer.disarm();
                tracing::debug!(
                    question = self.session.current_index(),
                    correct = record.is_correct,
                    "answer recorded"
                );
            }
            Command::Advance => {
                self.session.advance()?;
                self.sync_timer();
            }
            Command::Restart => {
                self.session.restart()?;
                tracing::info!("quiz restarted with the same questions");
                self.sync_timer();
            }
            Command::NewQuiz => {
                self.session.new_quiz();
                self.cancel_fetch();
                self.timer.disarm();
            }
            Command::Snapshot => return Ok(self.session.snapshot()),
        }
        Ok(self.publish_transition())
    }

    fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::Tick { generation } => self.on_tick(generation),
            Internal::Fetched { ticket, result } => self.on_fetched(ticket, result),
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if !self.timer.is_live(generation) {
            tracing::trace!(generation, "discarding tick from a stopped timer");
            return;
        }
        let question = self.session.current_index();
        match self.session.tick() {
            Ok(TickOutcome::Running { remaining }) => {
                self.bus.broadcast(QuizEvent::Tick {
                    question,
                    remaining,
                });
            }
            Ok(TickOutcome::TimedOut) => {
                self.timer.disarm();
                tracing::info!(question, "question timed out");
                self.bus.broadcast(QuizEvent::Tick {
                    question,
                    remaining: 0,
                });
                self.bus.broadcast(QuizEvent::TimedOut { question });
                self.publish_transition();
            }
            Err(e) => {
                tracing::debug!(generation, error = %e, "tick rejected, stopping timer");
                self.timer.disarm();
            }
        }
    }

    fn on_fetched(&mut self, ticket: u64, result: Result<Vec<Question>, FetchError>) {
        if ticket == self.session.current_ticket() {
            self.pending_fetch = None;
        }
        let failure = result.as_ref().err().map(FetchError::user_message);
        let count = result.as_ref().map(Vec::len).unwrap_or(0);

        match self.session.complete_fetch(ticket, result) {
            Err(SessionError::StaleFetch { ticket, current }) => {
                tracing::info!(ticket, current, "discarding superseded fetch result");
                return;
            }
            Err(e) => {
                tracing::warn!(ticket, error = %e, "fetch result not applied");
                return;
            }
            Ok(()) => {}
        }

        match self.session.phase() {
            Phase::Presenting { .. } => {
                tracing::info!(ticket, count, "questions loaded");
                self.sync_timer();
            }
            _ => {
                let message = failure
                    .or_else(|| self.session.last_error().map(str::to_string))
                    .unwrap_or_else(|| FetchError::Empty.user_message());
                tracing::warn!(ticket, error = %message, "question fetch failed");
                self.bus.broadcast(QuizEvent::FetchFailed { message });
            }
        }
        self.publish_transition();
    }

    fn start_fetch(&mut self, request: FetchRequest) {
        if self.cancel_fetch() {
            tracing::info!(ticket = request.ticket, "superseding pending fetch");
        }
        tracing::info!(
            ticket = request.ticket,
            amount = request.config.amount,
            "fetching questions"
        );

        let source = Arc::clone(&self.source);
        let sink = self.inbox_tx.clone();
        let mut shuffler = self.shuffler.fork();
        let FetchRequest { ticket, config } = request;
        self.pending_fetch = Some(tokio::spawn(async move {
            let result = fetch_questions(source.as_ref(), &config, &mut shuffler).await;
            let _ = sink
                .send(Message::Internal(Internal::Fetched { ticket, result }))
                .await;
        }));
    }

    /// Abort the in-flight fetch, if any. Returns whether one was running.
    fn cancel_fetch(&mut self) -> bool {
        match self.pending_fetch.take() {
            Some(task) => {
                let running = !task.is_finished();
                task.abort();
                running
            }
            None => false,
        }
    }

    /// Run the timer exactly while a question is open.
    fn sync_timer(&mut self) {
        if self.session.countdown_running() {
            self.timer.arm(
                self.options.tick_interval,
                self.inbox_tx.clone(),
                |generation| Message::Internal(Internal::Tick { generation }),
            );
        } else {
            self.timer.disarm();
        }
    }

    fn publish_transition(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        self.bus.broadcast(QuizEvent::Transitioned {
            snapshot: snapshot.clone(),
        });
        snapshot
    }
}
