//! Saved characters and damage records
//!
//! Documents live in user-scoped collections (`users/{uid}/crew`,
//! `users/{uid}/records`) of an external document store.

pub mod schema;
pub mod service;
pub mod store;

pub use schema::{
    format_damage_eok, normalize_int_option, parse_eok_damage, CrewDoc, CrewSnapshot, DamageRecord, Document,
    Enhancements, NewCrew, NewDamageRecord,
};
pub use service::Roster;
pub use store::{user_collection, DocumentStore, MemoryStore, StoredDoc};
