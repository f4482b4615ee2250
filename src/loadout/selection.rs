//! Slot selection state machine
//!
//! Keeps twelve named slots in sync with an external, flat list of equipped
//! names (the shape the roster stores). Hydration maps names onto slots;
//! edits emit a new name list. Names that can't be placed are carried in
//! `unassigned` and re-emitted verbatim so a stale save never loses data.
//!
//! Emission is impossible before the first hydration: an empty selection
//! would otherwise overwrite the caller's saved list.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashSet;

use crate::catalog::loader::CatalogBundle;
use crate::catalog::model::{Equipment, Weapon};
use crate::core::error::{GearError, Result};
use crate::core::types::SlotId;
use crate::loadout::eligibility::eligible_weapons;

/// Slot contents, iterated in canonical slot order
pub type SlotMap = BTreeMap<SlotId, Equipment>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No usable catalog yet
    Uninitialized,
    /// Catalog attached, waiting for the external value
    Hydrating,
    /// Hydrated at least once; edits emit
    Steady,
}

/// Result of mapping an external value onto slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hydration {
    pub slots: SlotMap,
    pub unassigned: Vec<String>,
}

/// Map names onto slots, weapon match first, then items by inferred part
///
/// The first name claiming a slot wins. A repeat of an already placed name
/// is skipped; any other name that can't be placed goes to `unassigned`.
pub fn hydrate(catalog: &CatalogBundle, job: &str, value: &[String]) -> Hydration {
    let eligible = eligible_weapons(&catalog.weapons, catalog.character(job));

    let mut slots = SlotMap::new();
    let mut placed: AHashSet<&str> = AHashSet::new();
    let mut unassigned = Vec::new();

    for name in value.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if placed.contains(name) {
            continue;
        }

        let weapon = eligible
            .iter()
            .find(|w| w.name == name)
            .copied()
            .or_else(|| catalog.weapon(name));

        let (slot, equipment) = if let Some(weapon) = weapon {
            (SlotId::Weapon, Equipment::Weapon(weapon.clone()))
        } else if let Some(item) = catalog.item(name) {
            (item.part.slot(), Equipment::Item(item.clone()))
        } else {
            unassigned.push(name.to_string());
            continue;
        };

        if slots.contains_key(&slot) {
            unassigned.push(name.to_string());
        } else {
            slots.insert(slot, equipment);
            placed.insert(name);
        }
    }

    Hydration { slots, unassigned }
}

/// Flatten slots back into a name list: slot order, then unassigned names
pub fn emit_names(slots: &SlotMap, unassigned: &[String]) -> Vec<String> {
    slots
        .values()
        .map(|e| e.name().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .chain(unassigned.iter().cloned())
        .collect()
}

/// Loadout editor bound to one job and one external name list
#[derive(Debug, Clone)]
pub struct SlotSelection {
    catalog: Arc<CatalogBundle>,
    job: String,
    phase: SyncPhase,
    /// Replaced wholesale on every change
    slots: Arc<SlotMap>,
    unassigned: Arc<Vec<String>>,
    /// Last external value seen or emitted; `None` until one arrives
    value: Option<Vec<String>>,
}

impl SlotSelection {
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            catalog: Arc::new(CatalogBundle::default()),
            job: job.into(),
            phase: SyncPhase::Uninitialized,
            slots: Arc::new(SlotMap::new()),
            unassigned: Arc::new(Vec::new()),
            value: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn slots(&self) -> Arc<SlotMap> {
        Arc::clone(&self.slots)
    }

    pub fn get(&self, slot: SlotId) -> Option<&Equipment> {
        self.slots.get(&slot)
    }

    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    pub fn catalog(&self) -> &CatalogBundle {
        &self.catalog
    }

    /// Provide the loaded catalog. An empty catalog leaves the state alone.
    pub fn attach_catalog(&mut self, catalog: Arc<CatalogBundle>) {
        if catalog.is_empty() {
            return;
        }
        self.catalog = catalog;
        match self.value.clone() {
            Some(value) => self.rehydrate(&value),
            None => self.phase = SyncPhase::Hydrating,
        }
    }

    /// Accept a new external value and re-map it onto the slots
    pub fn sync_from_value(&mut self, value: &[String]) {
        self.value = Some(value.to_vec());
        if self.phase != SyncPhase::Uninitialized {
            self.rehydrate(value);
        }
    }

    /// Switch job; weapon eligibility changes, so slots are re-derived
    pub fn set_job(&mut self, job: impl Into<String>) {
        self.job = job.into();
        if self.phase == SyncPhase::Steady {
            if let Some(value) = self.value.clone() {
                self.rehydrate(&value);
            }
        }
    }

    /// Put `equipment` into `slot`, returning the new name list if it changed
    pub fn select_item(&mut self, slot: SlotId, equipment: Equipment) -> Result<Option<Vec<String>>> {
        let fits = match (&equipment, slot.def().part) {
            (Equipment::Weapon(_), None) => true,
            (Equipment::Item(item), Some(part)) => item.part == part,
            _ => false,
        };
        if !fits {
            return Err(GearError::InvalidInput(format!(
                "{} does not fit the {} slot",
                equipment.name(),
                slot.def().label
            )));
        }

        let mut next = SlotMap::clone(&self.slots);
        next.insert(slot, equipment);
        self.slots = Arc::new(next);
        Ok(self.emit())
    }

    /// Empty `slot`, returning the new name list if it changed
    pub fn clear_slot(&mut self, slot: SlotId) -> Option<Vec<String>> {
        if !self.slots.contains_key(&slot) {
            return self.emit();
        }
        let mut next = SlotMap::clone(&self.slots);
        next.remove(&slot);
        self.slots = Arc::new(next);
        self.emit()
    }

    /// What can go into `slot`: eligible weapons, or items of the slot's part
    pub fn candidates(&self, slot: SlotId) -> Vec<Equipment> {
        match slot.def().part {
            None => self
                .eligible_weapons()
                .into_iter()
                .cloned()
                .map(Equipment::Weapon)
                .collect(),
            Some(part) => self
                .catalog
                .items_for_part(part)
                .filter(|i| !i.name().is_empty())
                .cloned()
                .map(Equipment::Item)
                .collect(),
        }
    }

    pub fn eligible_weapons(&self) -> Vec<&Weapon> {
        eligible_weapons(&self.catalog.weapons, self.catalog.character(&self.job))
    }

    /// Effect text of everything equipped, in slot order
    pub fn equipped_effects(&self) -> Vec<&str> {
        self.slots.values().map(Equipment::effect).collect()
    }

    fn rehydrate(&mut self, value: &[String]) {
        let hydration = hydrate(&self.catalog, &self.job, value);
        if !hydration.unassigned.is_empty() {
            tracing::debug!(unassigned = ?hydration.unassigned, "names left out of slots");
        }
        self.slots = Arc::new(hydration.slots);
        self.unassigned = Arc::new(hydration.unassigned);
        self.phase = SyncPhase::Steady;
    }

    fn emit(&mut self) -> Option<Vec<String>> {
        if self.phase != SyncPhase::Steady {
            return None;
        }
        let next = emit_names(&self.slots, &self.unassigned);
        if self.value.as_deref() == Some(next.as_slice()) {
            return None;
        }
        self.value = Some(next.clone());
        Some(next)
    }
}
