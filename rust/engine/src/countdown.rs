/// Per-question countdown length, in ticks (one tick per second when played).
pub const TIME_BUDGET: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still counting, with this many ticks left
    Running(u32),
    /// Reached zero on this tick; the countdown has stopped itself
    Expired,
}

/// Counter half of the question timer.
///
/// Only counts; the wall-clock driver lives in the runtime and calls
/// [`Countdown::tick`] once per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
            running: false,
        }
    }

    /// Refill to the full budget and start counting.
    pub fn start(&mut self) {
        self.remaining = self.budget;
        self.running = self.budget > 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Refill to the full budget without starting.
    pub fn reset(&mut self) {
        self.remaining = self.budget;
        self.running = false;
    }

    /// Advance one tick. A stopped countdown ignores ticks.
    pub fn tick(&mut self) -> Option<CountdownTick> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Some(CountdownTick::Expired)
        } else {
            Some(CountdownTick::Running(self.remaining))
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TIME_BUDGET)
    }
}
