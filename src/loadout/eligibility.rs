//! Which weapons a job can equip
//!
//! Source tagging is inconsistent, so matching is deliberately loose: a
//! weapon's `available` tag only has to appear inside the job's group, the
//! group without its qualifier, or the job name.

use crate::catalog::model::{Character, Weapon};

pub fn is_weapon_eligible(weapon: &Weapon, character: &Character) -> bool {
    let available = weapon.available.as_str();
    character.group.contains(available)
        || character.base_group().contains(available)
        || character.job.contains(available)
}

/// Weapons usable by a character; every weapon when no character is chosen
pub fn eligible_weapons<'a>(weapons: &'a [Weapon], character: Option<&Character>) -> Vec<&'a Weapon> {
    match character {
        Some(character) => weapons
            .iter()
            .filter(|w| is_weapon_eligible(w, character))
            .collect(),
        None => weapons.iter().collect(),
    }
}
