//! Free-text search over the catalog

use crate::catalog::model::{Item, Weapon};
use crate::core::types::ItemType;

/// Collapse whitespace runs, trim, lower-case
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Classify a free-form type string into a category tag
pub fn item_category(type_text: &str) -> Option<ItemType> {
    let t = type_text.trim();
    if t.is_empty() {
        None
    } else if t.contains("방어구") {
        Some(ItemType::Armor)
    } else if t.contains("악세") {
        Some(ItemType::Accessory)
    } else if t.contains("특수") {
        Some(ItemType::Special)
    } else {
        None
    }
}

/// Filter items by category and query
///
/// Queries shorter than `min_query_len` characters (after normalization)
/// don't filter at all.
pub fn search_items<'a>(
    items: &'a [Item],
    query: &str,
    category: Option<ItemType>,
    min_query_len: usize,
) -> Vec<&'a Item> {
    let query = normalize_text(query);
    let filter_text = query.chars().count() >= min_query_len;

    items
        .iter()
        .filter(|i| category.map_or(true, |c| item_category(i.raw.item_type.label()) == Some(c)))
        .filter(|i| {
            if !filter_text {
                return true;
            }
            let raw = &i.raw;
            let hay = format!(
                "{} {} {} {} {}",
                raw.name,
                raw.item_type.label(),
                raw.set_id,
                raw.effect,
                raw.set_effect
            );
            normalize_text(&hay).contains(&query)
        })
        .collect()
}

pub fn search_weapons<'a>(weapons: &'a [Weapon], query: &str, min_query_len: usize) -> Vec<&'a Weapon> {
    let query = normalize_text(query);
    if query.chars().count() < min_query_len {
        return weapons.iter().collect();
    }

    weapons
        .iter()
        .filter(|w| {
            let hay = format!(
                "{} {} {} {} {}",
                w.name, w.weapon_type, w.available, w.basic_info, w.effect
            );
            normalize_text(&hay).contains(&query)
        })
        .collect()
}
