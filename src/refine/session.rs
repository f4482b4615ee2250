//! A running refine simulation with log and cost totals

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use super::engine::{
    get_refine_cost, refine_attempt, FailGuard, Outcome, Prob, RefineAttempt, RefineState,
};

/// One logged attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub attempt_no: u64,
    pub prev: RefineState,
    pub next: RefineState,
    pub outcome: Outcome,
    pub roll: f64,
    pub prob: Prob,
}

/// Resources spent so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostTotals {
    pub stone: u64,
    pub catalyst: u64,
    pub rion: u64,
    pub gold: u64,
    pub terra: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Only(Outcome),
}

impl LogFilter {
    pub fn matches(self, outcome: Outcome) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Only(wanted) => wanted == outcome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefineSession {
    state: RefineState,
    attempts: u64,
    max_level: u8,
    totals: CostTotals,
    /// Newest first
    log: VecDeque<LogEntry>,
    capacity: usize,
}

impl RefineSession {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RefineState::default(),
            attempts: 0,
            max_level: 0,
            totals: CostTotals::default(),
            log: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Session sized from the global config
    pub fn from_config() -> Self {
        Self::new(crate::core::config::config().refine_log_capacity)
    }

    pub fn state(&self) -> RefineState {
        self.state
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn totals(&self) -> CostTotals {
        self.totals
    }

    pub fn guard_label(&self) -> &'static str {
        self.state.fail_guard.label()
    }

    /// Charge the current level's cost, roll, and log the result
    pub fn attempt<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RefineAttempt {
        let attempt = refine_attempt(self.state, rng);
        self.record(attempt);
        attempt
    }

    /// Apply an attempt resolved elsewhere
    pub fn record(&mut self, attempt: RefineAttempt) {
        let cost = get_refine_cost(i64::from(attempt.prev.level));
        self.attempts += 1;
        self.totals.stone += u64::from(cost.stone);
        self.totals.catalyst += u64::from(cost.catalyst);
        self.totals.rion += u64::from(cost.rion);
        self.totals.gold += cost.gold;
        self.totals.terra += cost.terra;

        self.state = attempt.next;
        self.max_level = self.max_level.max(attempt.prev.level).max(attempt.next.level);

        if self.capacity == 0 {
            return;
        }
        self.log.push_front(LogEntry {
            id: Uuid::new_v4(),
            attempt_no: self.attempts,
            prev: attempt.prev,
            next: attempt.next,
            outcome: attempt.outcome,
            roll: attempt.roll,
            prob: attempt.prob,
        });
        self.log.truncate(self.capacity);
    }

    pub fn logs(&self, filter: LogFilter) -> impl Iterator<Item = &LogEntry> {
        self.log.iter().filter(move |e| filter.matches(e.outcome))
    }

    pub fn outcome_count(&self, outcome: Outcome) -> usize {
        self.logs(LogFilter::Only(outcome)).count()
    }

    /// Start over at `level` with no guard, clearing log and totals
    pub fn reset(&mut self, level: i64) {
        self.reset_to(RefineState::new(level, FailGuard::None));
    }

    /// Start over from an arbitrary state
    pub fn reset_to(&mut self, state: RefineState) {
        self.state = state.clamped();
        self.attempts = 0;
        self.max_level = self.state.level;
        self.totals = CostTotals::default();
        self.log.clear();
        tracing::debug!(level = self.state.level, guard = ?self.state.fail_guard, "refine session reset");
    }
}

impl Default for RefineSession {
    fn default() -> Self {
        Self::from_config()
    }
}
