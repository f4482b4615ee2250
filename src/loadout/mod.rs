//! Equipment loadouts: weapon eligibility and slot selection

pub mod eligibility;
pub mod selection;

pub use eligibility::{eligible_weapons, is_weapon_eligible};
pub use selection::{emit_names, hydrate, Hydration, SlotMap, SlotSelection, SyncPhase};
