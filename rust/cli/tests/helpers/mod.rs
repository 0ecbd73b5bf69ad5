#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trivium_bank::QuestionSource;
use trivium_engine::config::QuizConfiguration;
use trivium_engine::errors::FetchError;
use trivium_engine::question::RawQuestion;
use trivium_engine::session::SessionSnapshot;
use trivium_runtime::{EventSubscription, QuizEvent};

type Response = (Duration, Result<Vec<RawQuestion>, FetchError>);

/// Question source that replays scripted responses and remembers each request.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<QuizConfiguration>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, delay: Duration, result: Result<Vec<RawQuestion>, FetchError>) -> Self {
        self.script.lock().unwrap().push_back((delay, result));
        self
    }

    pub fn requests(&self) -> Vec<QuizConfiguration> {
        self.requests.lock().unwrap().clone()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self, config: &QuizConfiguration) -> Result<Vec<RawQuestion>, FetchError> {
        self.requests.lock().unwrap().push(config.clone());
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

pub fn batch(n: usize) -> Vec<RawQuestion> {
    (0..n)
        .map(|i| RawQuestion {
            category: "Science &amp; Nature".into(),
            question_type: "multiple".into(),
            difficulty: "easy".into(),
            question: format!("Which element is number {}?", i + 1),
            correct_answer: format!("right {}", i + 1),
            incorrect_answers: vec![
                format!("wrong {}a", i + 1),
                format!("wrong {}b", i + 1),
                format!("wrong {}c", i + 1),
            ],
        })
        .collect()
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

/// Wait until question `index` is open and still unanswered.
pub async fn wait_for_question(sub: &mut EventSubscription, index: usize) -> SessionSnapshot {
    match wait_for(sub, |e| {
        matches!(e, QuizEvent::Transitioned { snapshot }
            if snapshot.phase.presenting_index() == Some(index) && snapshot.answer.is_none())
    })
    .await
    {
        QuizEvent::Transitioned { snapshot } => snapshot,
        other => panic!("unexpected event {other:?}"),
    }
}

/// The line that picks the option containing `needle`, e.g. `"c\n"`.
pub fn answer_line(snapshot: &SessionSnapshot, needle: &str) -> String {
    let index = snapshot
        .question
        .as_ref()
        .expect("a question on screen")
        .options
        .iter()
        .position(|o| o.contains(needle))
        .expect("option present");
    format!("{}\n", (b'a' + index as u8) as char)
}

/// Sets or clears environment variables, restoring them on drop.
pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for (key, value) in pairs {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }

    pub fn clear(keys: &[&str]) -> Self {
        let mut restores = Vec::new();
        for key in keys {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
