//! Gearsmith - equipment catalog, loadout and refine toolkit
//!
//! Loads the static game data, infers item parts, keeps a 12-slot loadout in
//! sync with a saved name list, aggregates effect text and simulates
//! refinement.

pub mod catalog;
pub mod core;
pub mod effects;
pub mod loadout;
pub mod refine;
pub mod roster;
