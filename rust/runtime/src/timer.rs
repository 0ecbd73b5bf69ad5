//! Wall-clock countdown ticks.
//!
//! A [`CountdownTimer`] owns a tokio task that sends one message per period.
//! Every message carries the generation the timer was started with, so a
//! tick that was already queued when the timer was replaced can be told apart
//! from a live one.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct CountdownTimer {
    generation: u64,
    task: JoinHandle<()>,
}

impl CountdownTimer {
    /// Start ticking. The first tick arrives one full `period` from now.
    pub fn start<M, F>(generation: u64, period: Duration, sink: mpsc::Sender<M>, tick: F) -> Self
    where
        M: Send + 'static,
        F: Fn(u64) -> M + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sink.send(tick(generation)).await.is_err() {
                    break;
                }
            }
        });
        tracing::trace!(generation, "countdown timer started");
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Holds at most one live timer and hands out increasing generations.
#[derive(Debug, Default)]
pub struct TimerSlot {
    current: Option<CountdownTimer>,
    next_generation: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running timer with a fresh one.
    pub fn arm<M, F>(&mut self, period: Duration, sink: mpsc::Sender<M>, tick: F) -> u64
    where
        M: Send + 'static,
        F: Fn(u64) -> M + Send + 'static,
    {
        self.disarm();
        self.next_generation += 1;
        let generation = self.next_generation;
        self.current = Some(CountdownTimer::start(generation, period, sink, tick));
        generation
    }

    pub fn disarm(&mut self) {
        if let Some(timer) = self.current.take() {
            tracing::trace!(generation = timer.generation(), "countdown timer stopped");
        }
    }

    /// Whether `generation` belongs to the timer that is running now.
    pub fn is_live(&self, generation: u64) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.generation() == generation)
    }

    pub fn is_armed(&self) -> bool {
        self.current.is_some()
    }
}
