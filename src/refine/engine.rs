//! Refinement probability lookup, roll classification and state transitions
//!
//! All lookups clamp their inputs first, so out-of-range levels or guards can
//! never index past a table. The engine itself is pure: randomness comes in
//! through an injected [`rand::Rng`].

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tables::{
    BREAK, CATALYST, FAIL, GOLD, GOLD_PER_TERRA, KEEP, MAX_LEVEL, MIN_LEVEL, RION, STONE, SUCCESS,
    TERRA_PER_CATALYST, TERRA_PER_RION, TERRA_PER_STONE,
};

/// Clamp any integer into `MIN_LEVEL..=MAX_LEVEL`
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

/// Consecutive-failure guard; each step shifts odds from fail to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum FailGuard {
    #[default]
    None,
    First,
    Second,
}

impl FailGuard {
    pub const ALL: [FailGuard; 3] = [FailGuard::None, FailGuard::First, FailGuard::Second];

    pub fn index(self) -> usize {
        match self {
            FailGuard::None => 0,
            FailGuard::First => 1,
            FailGuard::Second => 2,
        }
    }

    /// One more failure, saturating at `Second`
    pub fn bump(self) -> Self {
        match self {
            FailGuard::None => FailGuard::First,
            FailGuard::First | FailGuard::Second => FailGuard::Second,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FailGuard::None => "보정 없음",
            FailGuard::First => "1회 보정",
            FailGuard::Second => "2회 보정",
        }
    }
}

/// Anything other than 1 or 2 means no guard
impl From<u8> for FailGuard {
    fn from(value: u8) -> Self {
        match value {
            1 => FailGuard::First,
            2 => FailGuard::Second,
            _ => FailGuard::None,
        }
    }
}

impl From<FailGuard> for u8 {
    fn from(guard: FailGuard) -> Self {
        guard.index() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Success,
    Keep,
    Fail,
    Break,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::Success, Outcome::Keep, Outcome::Fail, Outcome::Break];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "성공",
            Outcome::Keep => "유지",
            Outcome::Fail => "실패",
            Outcome::Break => "파괴",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome chances in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prob {
    pub success: u32,
    pub keep: u32,
    pub fail: u32,
    #[serde(rename = "break")]
    pub destroy: u32,
}

impl Prob {
    pub fn total(&self) -> u32 {
        self.success + self.keep + self.fail + self.destroy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineState {
    pub level: u8,
    pub fail_guard: FailGuard,
}

impl RefineState {
    pub fn new(level: i64, fail_guard: FailGuard) -> Self {
        Self {
            level: clamp_level(level),
            fail_guard,
        }
    }

    /// Same state with the level forced back into range
    pub fn clamped(self) -> Self {
        Self::new(i64::from(self.level), self.fail_guard)
    }
}

/// Resource cost of one attempt at a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefineCost {
    pub stone: u32,
    pub catalyst: u32,
    pub rion: u32,
    pub gold: u64,
    /// Composite terra-equivalent of the four resources above
    pub terra: f64,
}

/// One resolved attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefineAttempt {
    pub prev: RefineState,
    pub next: RefineState,
    pub outcome: Outcome,
    pub prob: Prob,
    /// Uniform draw in `[0, 100)`
    pub roll: f64,
}

pub fn get_prob(level: i64, guard: FailGuard) -> Prob {
    let lvl = clamp_level(level) as usize;
    let g = guard.index();
    Prob {
        success: SUCCESS[lvl],
        keep: KEEP[g][lvl],
        fail: FAIL[g][lvl],
        destroy: BREAK[lvl],
    }
}

/// Map a roll onto the cumulative success/keep/fail/break bands
pub fn classify_roll(prob: &Prob, roll: f64) -> Outcome {
    let success = f64::from(prob.success);
    let keep = success + f64::from(prob.keep);
    let fail = keep + f64::from(prob.fail);

    if roll < success {
        Outcome::Success
    } else if roll < keep {
        Outcome::Keep
    } else if roll < fail {
        Outcome::Fail
    } else {
        Outcome::Break
    }
}

pub fn transition(state: RefineState, outcome: Outcome) -> RefineState {
    let level = i64::from(state.level);
    match outcome {
        Outcome::Success => RefineState::new(level + 1, FailGuard::None),
        Outcome::Fail => RefineState::new(level - 1, state.fail_guard.bump()),
        Outcome::Break => RefineState::default(),
        Outcome::Keep => state,
    }
}

/// Resolve one attempt against a known roll
pub fn attempt_with_roll(prev: RefineState, roll: f64) -> RefineAttempt {
    let prev = prev.clamped();
    let prob = get_prob(i64::from(prev.level), prev.fail_guard);
    let outcome = classify_roll(&prob, roll);
    RefineAttempt {
        prev,
        next: transition(prev, outcome),
        outcome,
        prob,
        roll,
    }
}

/// Resolve one attempt drawing the roll from `rng`
pub fn refine_attempt<R: Rng + ?Sized>(prev: RefineState, rng: &mut R) -> RefineAttempt {
    let roll = rng.gen::<f64>() * 100.0;
    attempt_with_roll(prev, roll)
}

pub fn get_refine_cost(level: i64) -> RefineCost {
    let lvl = clamp_level(level) as usize;
    let (stone, catalyst, rion, gold) = (STONE[lvl], CATALYST[lvl], RION[lvl], GOLD[lvl]);
    RefineCost {
        stone,
        catalyst,
        rion,
        gold,
        terra: f64::from(stone) * TERRA_PER_STONE
            + f64::from(catalyst) * TERRA_PER_CATALYST
            + f64::from(rion) * TERRA_PER_RION
            + gold as f64 / GOLD_PER_TERRA,
    }
}

/// Result of [`calc`]: the next state plus the cost paid for the attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalcResult {
    pub next: RefineState,
    pub cost: RefineCost,
}

/// One attempt from `(begin_level, guard)` with its cost at `begin_level`
pub fn calc<R: Rng + ?Sized>(begin_level: i64, guard: FailGuard, rng: &mut R) -> CalcResult {
    let begin = clamp_level(begin_level);
    let attempt = refine_attempt(RefineState::new(i64::from(begin), guard), rng);
    CalcResult {
        next: attempt.next,
        cost: get_refine_cost(i64::from(begin)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_cost_at_level_three() {
        let cost = get_refine_cost(3);
        assert_eq!((cost.stone, cost.catalyst, cost.rion, cost.gold), (157, 3, 4, 10_427_000));
        let expected = 157.0 * 400.0 + 3.0 * 70_000.0 + 4.0 * 10_000.0 + 10_427_000.0 / 200.0;
        assert!((cost.terra - expected).abs() < 1e-9);
        assert!((cost.terra - 364_935.0).abs() < 1e-9);
    }

    #[test]
    fn test_prob_at_level_one() {
        assert_eq!(
            get_prob(1, FailGuard::None),
            Prob { success: 30, keep: 40, fail: 30, destroy: 0 }
        );
        assert_eq!(
            get_prob(1, FailGuard::First),
            Prob { success: 30, keep: 50, fail: 20, destroy: 0 }
        );
    }

    #[test]
    fn test_out_of_range_inputs_clamp() {
        assert_eq!(clamp_level(-5), 0);
        assert_eq!(clamp_level(42), 9);
        assert_eq!(get_prob(-1, FailGuard::None), get_prob(0, FailGuard::None));
        assert_eq!(get_refine_cost(100), get_refine_cost(9));
        assert_eq!(FailGuard::from(7), FailGuard::None);
    }

    #[test]
    fn test_classify_band_edges() {
        let prob = get_prob(3, FailGuard::None); // 20 / 45 / 30 / 5
        assert_eq!(classify_roll(&prob, 0.0), Outcome::Success);
        assert_eq!(classify_roll(&prob, 19.999), Outcome::Success);
        assert_eq!(classify_roll(&prob, 20.0), Outcome::Keep);
        assert_eq!(classify_roll(&prob, 65.0), Outcome::Fail);
        assert_eq!(classify_roll(&prob, 95.0), Outcome::Break);
        assert_eq!(classify_roll(&prob, 99.999), Outcome::Break);
    }

    #[test]
    fn test_transitions() {
        let s = RefineState::new(4, FailGuard::First);
        assert_eq!(transition(s, Outcome::Success), RefineState::new(5, FailGuard::None));
        assert_eq!(transition(s, Outcome::Fail), RefineState::new(3, FailGuard::Second));
        assert_eq!(transition(s, Outcome::Break), RefineState::new(0, FailGuard::None));
        assert_eq!(transition(s, Outcome::Keep), s);

        let top = RefineState::new(9, FailGuard::None);
        assert_eq!(transition(top, Outcome::Success).level, 9);
        let bottom = RefineState::new(0, FailGuard::Second);
        assert_eq!(transition(bottom, Outcome::Fail), bottom);
    }

    #[test]
    fn test_same_seed_same_attempts() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut state = RefineState::default();
            (0..50)
                .map(|_| {
                    let attempt = refine_attempt(state, &mut rng);
                    state = attempt.next;
                    attempt
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_state_serde_shape() {
        let json = serde_json::to_value(RefineState::new(2, FailGuard::First)).unwrap();
        assert_eq!(json, serde_json::json!({ "level": 2, "failGuard": 1 }));
        let prob = serde_json::to_value(get_prob(9, FailGuard::None)).unwrap();
        assert_eq!(prob["break"], 70);
    }

    proptest! {
        #[test]
        fn prop_probabilities_sum_to_hundred(level in -20i64..30, guard in 0u8..5) {
            prop_assert_eq!(get_prob(level, FailGuard::from(guard)).total(), 100);
        }

        #[test]
        fn prop_states_stay_in_bounds(
            level in 0i64..10,
            guard in 0u8..3,
            rolls in proptest::collection::vec(0.0f64..100.0, 1..40),
        ) {
            let mut state = RefineState::new(level, FailGuard::from(guard));
            for roll in rolls {
                let attempt = attempt_with_roll(state, roll);
                prop_assert!(attempt.next.level <= MAX_LEVEL);
                prop_assert!(attempt.next.fail_guard.index() <= 2);
                state = attempt.next;
            }
        }
    }
}
