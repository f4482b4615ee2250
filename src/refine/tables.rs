//! Fixed per-level probability and cost tables
//!
//! Every table is indexed by refine level 0..=9. Probabilities are whole
//! percent; for any level and guard the four outcomes sum to 100.

pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 9;
pub const LEVELS: usize = MAX_LEVEL as usize + 1;

pub const SUCCESS: [u32; LEVELS] = [45, 30, 20, 20, 17, 15, 10, 7, 3, 1];

/// Keep chance, one row per guard level
pub const KEEP: [[u32; LEVELS]; 3] = [
    [55, 40, 50, 45, 44, 42, 60, 53, 37, 29],
    [55, 50, 60, 55, 54, 52, 60, 53, 37, 29],
    [55, 70, 80, 75, 74, 72, 60, 53, 37, 29],
];

/// Fail chance, one row per guard level
pub const FAIL: [[u32; LEVELS]; 3] = [
    [0, 30, 30, 30, 30, 30, 0, 0, 0, 0],
    [0, 20, 20, 20, 20, 20, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

pub const BREAK: [u32; LEVELS] = [0, 0, 0, 5, 9, 13, 30, 40, 60, 70];

pub const STONE: [u32; LEVELS] = [99, 116, 135, 157, 177, 200, 220, 240, 260, 280];
pub const CATALYST: [u32; LEVELS] = [2, 2, 2, 3, 3, 3, 4, 4, 4, 5];
pub const RION: [u32; LEVELS] = [3, 3, 4, 4, 5, 5, 6, 6, 7, 7];
pub const GOLD: [u64; LEVELS] = [
    6_200_000, 7_502_000, 8_900_700, 10_427_000, 12_254_000, 13_979_000, 15_806_000, 17_781_000,
    19_881_000, 22_136_000,
];

/// Terra-equivalent weights for stone, catalyst, rion and gold
pub const TERRA_PER_STONE: f64 = 400.0;
pub const TERRA_PER_CATALYST: f64 = 70_000.0;
pub const TERRA_PER_RION: f64 = 10_000.0;
pub const GOLD_PER_TERRA: f64 = 200.0;
