#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trivium_bank::QuestionSource;
use trivium_engine::config::QuizConfiguration;
use trivium_engine::errors::FetchError;
use trivium_engine::question::RawQuestion;
use trivium_engine::session::{Phase, SessionSnapshot};
use trivium_runtime::{EventSubscription, QuizEvent};

/// Question source that replays a fixed list of responses, each after a delay.
pub struct ScriptedSource {
    script: Mutex<VecDeque<(Duration, Result<Vec<RawQuestion>, FetchError>)>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn then(self, delay: Duration, result: Result<Vec<RawQuestion>, FetchError>) -> Self {
        self.script.lock().unwrap().push_back((delay, result));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self, _config: &QuizConfiguration) -> Result<Vec<RawQuestion>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted source ran out of responses");
        tokio::time::sleep(delay).await;
        result
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn raw(label: &str, i: usize) -> RawQuestion {
    RawQuestion {
        category: "General Knowledge".into(),
        question_type: "multiple".into(),
        difficulty: "medium".into(),
        question: format!("{label} question {}?", i + 1),
        correct_answer: format!("{label} right {}", i + 1),
        incorrect_answers: vec![
            format!("{label} wrong {}a", i + 1),
            format!("{label} wrong {}b", i + 1),
            format!("{label} wrong {}c", i + 1),
        ],
    }
}

pub fn batch(label: &str, n: usize) -> Vec<RawQuestion> {
    (0..n).map(|i| raw(label, i)).collect()
}

/// Receive events until one matches, giving up after ten simulated minutes.
pub async fn wait_for<F>(sub: &mut EventSubscription, pred: F) -> QuizEvent
where
    F: Fn(&QuizEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(600), async {
        loop {
            let event = sub.recv().await.expect("event bus closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected event never arrived")
}

pub async fn wait_for_phase(sub: &mut EventSubscription, phase: Phase) -> SessionSnapshot {
    match wait_for(sub, |e| {
        matches!(e, QuizEvent::Transitioned { snapshot } if snapshot.phase == phase)
    })
    .await
    {
        QuizEvent::Transitioned { snapshot } => snapshot,
        other => panic!("unexpected event {other:?}"),
    }
}

/// Position of the option whose text contains `needle` on the shown question.
pub fn option_index(snapshot: &SessionSnapshot, needle: &str) -> usize {
    snapshot
        .question
        .as_ref()
        .expect("a question on screen")
        .options
        .iter()
        .position(|o| o.contains(needle))
        .expect("option present")
}
