//! Effect text parsing, set bonuses and aggregation
//!
//! `parser` classifies single lines, `aggregate` sums them across sources,
//! and `set_bonus` decides which set segments join the aggregation.

pub mod aggregate;
pub mod parser;
pub mod set_bonus;

pub use aggregate::{aggregate_effects, group_thousands, EffectSummary, StatKey, StatTotal};
pub use parser::{classify_line, EffectLine};
pub use set_bonus::{extract_segment, resolve_set_bonuses, ActiveSetBonus, SetSegment, SET_TIERS};

use crate::catalog::model::Item;
use crate::loadout::selection::SlotMap;

/// Aggregate a whole loadout
///
/// Sources are fed in slot order, then unlocked set segments, then any
/// free-text extras (unique options typed in by the user).
pub fn summarize_loadout<'a, I>(slots: &SlotMap, items: &[Item], extras: I) -> EffectSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = EffectSummary::new();
    for equipment in slots.values() {
        summary.add_text(equipment.effect());
    }
    for bonus in resolve_set_bonuses(slots, items) {
        for segment in &bonus.segments {
            summary.add_text(&segment.text);
        }
    }
    for extra in extras {
        summary.add_text(extra);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Equipment, RawItem, Weapon};
    use crate::core::types::{ItemType, Part, SlotId};

    fn armor(name: &str, effect: &str, part: Part) -> Item {
        Item::new(
            RawItem {
                name: name.into(),
                item_type: ItemType::Armor,
                effect: effect.into(),
                set_id: "S1".into(),
                set_effect: "[3]세트효과\n항마력 +1,000\n[5]세트효과\n항마력 +2,000".into(),
                ..RawItem::default()
            },
            part,
        )
    }

    #[test]
    fn test_summarize_loadout() {
        let mut slots = SlotMap::new();
        slots.insert(SlotId::Top, Equipment::Item(armor("상의", "항마력 +100", Part::Top)));
        slots.insert(SlotId::Bottom, Equipment::Item(armor("하의", "항마력 +100", Part::Bottom)));
        slots.insert(SlotId::Belt, Equipment::Item(armor("벨트", "화상 데미지 10% 증가", Part::Belt)));
        slots.insert(
            SlotId::Weapon,
            Equipment::Weapon(Weapon {
                name: "검".into(),
                effect: "항마력 +50\n공격 시 화상 부여".into(),
                ..Weapon::default()
            }),
        );

        let summary = summarize_loadout(&slots, &[], ["화상 데미지 +5%"]);
        assert_eq!(summary.get("항마력", false), Some(1_250));
        assert_eq!(summary.get("화상 데미지", true), Some(15));
        assert_eq!(summary.others(), ["공격 시 화상 부여".to_string()]);
    }
}
