//! Refinement simulator
//!
//! `tables` holds the fixed odds and costs, `engine` is the pure attempt
//! function, and `session` accumulates attempts the way the simulator does.

pub mod engine;
pub mod session;
pub mod tables;

pub use engine::{
    attempt_with_roll, calc, clamp_level, classify_roll, get_prob, get_refine_cost, refine_attempt, transition,
    CalcResult, FailGuard, Outcome, Prob, RefineAttempt, RefineCost, RefineState,
};
pub use session::{CostTotals, LogEntry, LogFilter, RefineSession};
