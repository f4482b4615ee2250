//! Set bonuses unlocked by equipping 3 or 5 pieces of one set

use ahash::AHashMap;
use serde::Serialize;

use crate::catalog::model::Item;
use crate::effects::parser::set_header;
use crate::loadout::selection::SlotMap;

/// Piece counts that unlock a bonus segment
pub const SET_TIERS: [u32; 2] = [3, 5];

/// One unlocked `[N]세트효과` segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSegment {
    pub tier: u32,
    pub text: String,
}

/// A set with at least one unlocked segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSetBonus {
    pub set_id: String,
    pub equipped: usize,
    pub segments: Vec<SetSegment>,
}

impl ActiveSetBonus {
    /// Segment bodies joined for the aggregation engine
    pub fn effect_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lines following the `[tier]세트효과` header up to the next header
///
/// Only tiers 3 and 5 open a segment; any other numbered header closes the
/// current one. Returns `None` when the segment is missing or blank.
pub fn extract_segment(set_effect: &str, tier: u32) -> Option<String> {
    let mut open: Option<u32> = None;
    let mut lines = Vec::new();

    for raw in set_effect.lines() {
        let line = raw.trim();
        if let Ok((_, header)) = set_header(line) {
            open = header.filter(|n| SET_TIERS.contains(n));
            continue;
        }
        if open == Some(tier) && !line.is_empty() {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Resolve unlocked segments for everything equipped in `slots`
///
/// Set text comes from an equipped member when it has any, otherwise from
/// the first catalog item of the same set. Output follows the slot order in
/// which each set was first seen.
pub fn resolve_set_bonuses(slots: &SlotMap, items: &[Item]) -> Vec<ActiveSetBonus> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    let mut texts: AHashMap<&str, &str> = AHashMap::new();

    for item in slots.values().filter_map(|e| e.as_item()) {
        let set_id = item.raw.set_id.trim();
        if set_id.is_empty() {
            continue;
        }
        let count = counts.entry(set_id).or_insert(0);
        if *count == 0 {
            order.push(set_id);
        }
        *count += 1;
        if !item.raw.set_effect.trim().is_empty() {
            texts.entry(set_id).or_insert(item.raw.set_effect.as_str());
        }
    }

    order
        .into_iter()
        .filter_map(|set_id| {
            let equipped = counts.get(set_id).copied().unwrap_or(0);
            if equipped < SET_TIERS[0] as usize {
                return None;
            }
            let text = texts.get(set_id).copied().or_else(|| {
                items
                    .iter()
                    .filter(|i| i.raw.set_id.trim() == set_id)
                    .map(|i| i.raw.set_effect.as_str())
                    .find(|t| !t.trim().is_empty())
            })?;

            let segments: Vec<SetSegment> = SET_TIERS
                .iter()
                .filter(|&&tier| equipped >= tier as usize)
                .filter_map(|&tier| extract_segment(text, tier).map(|text| SetSegment { tier, text }))
                .collect();

            if segments.is_empty() {
                None
            } else {
                Some(ActiveSetBonus {
                    set_id: set_id.to_string(),
                    equipped,
                    segments,
                })
            }
        })
        .collect()
}
