//! Game data records as they appear in the static JSON files

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::types::{ItemType, Part};

/// A job (character class) entry from `character.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    #[serde(deserialize_with = "lenient_text")]
    pub job: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: String,
    /// Job group, possibly with a parenthetical qualifier like `귀검사(남)`
    #[serde(deserialize_with = "lenient_text")]
    pub group: String,
}

impl Character {
    /// Group with any parenthetical qualifier removed
    pub fn base_group(&self) -> String {
        strip_parenthetical(&self.group)
    }
}

/// Read any JSON scalar as text; `null`, arrays and objects read as empty
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Unknown or non-text type tags read as `ItemType::Other`
fn lenient_item_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemType, D::Error> {
    let text = lenient_text(deserializer)?;
    Ok(ItemType::ALL
        .into_iter()
        .find(|t| t.label() == text)
        .unwrap_or(ItemType::Other))
}

/// Remove the first `(...)` span, extending to the last closing paren
pub(crate) fn strip_parenthetical(text: &str) -> String {
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..open]);
            out.push_str(&text[close + 1..]);
            out
        }
        _ => text.to_string(),
    }
}

/// An item from `item.json`. The data carries no part field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_item_type")]
    pub item_type: ItemType,
    #[serde(deserialize_with = "lenient_text")]
    pub effect: String,
    #[serde(deserialize_with = "lenient_text")]
    pub set_id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub set_effect: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: String,
}

/// A raw item with its inferred part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(flatten)]
    pub raw: RawItem,
    pub part: Part,
}

impl Item {
    pub fn new(raw: RawItem, part: Part) -> Self {
        Self { raw, part }
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub weapon_type: String,
    /// Free-text eligibility tag matched loosely against job and group
    #[serde(deserialize_with = "lenient_text")]
    pub available: String,
    #[serde(deserialize_with = "lenient_text")]
    pub basic_info: String,
    #[serde(deserialize_with = "lenient_text")]
    pub effect: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: String,
}

/// Legacy set-effect record from `set.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentSet {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub prefix: String,
    #[serde(deserialize_with = "lenient_text")]
    pub set_effect: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub set_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: String,
}

/// Pick the unprefixed set record with the given type and name
pub fn base_set<'a>(sets: &'a [EquipmentSet], set_type: ItemType, name: &str) -> Option<&'a EquipmentSet> {
    sets.iter()
        .find(|s| s.set_type == set_type.label() && s.name == name && s.prefix.is_empty())
}

/// Anything that can occupy a loadout slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Equipment {
    Item(Item),
    Weapon(Weapon),
}

impl Equipment {
    pub fn name(&self) -> &str {
        match self {
            Equipment::Item(item) => item.name(),
            Equipment::Weapon(weapon) => &weapon.name,
        }
    }

    pub fn effect(&self) -> &str {
        match self {
            Equipment::Item(item) => &item.raw.effect,
            Equipment::Weapon(weapon) => &weapon.effect,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Equipment::Item(item) => Some(item),
            Equipment::Weapon(_) => None,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Equipment::Weapon(weapon) => Some(weapon),
            Equipment::Item(_) => None,
        }
    }
}

impl From<Item> for Equipment {
    fn from(item: Item) -> Self {
        Equipment::Item(item)
    }
}

impl From<Weapon> for Equipment {
    fn from(weapon: Weapon) -> Self {
        Equipment::Weapon(weapon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_group_strips_qualifier() {
        let c = Character {
            job: "웨펀마스터".into(),
            image: String::new(),
            group: "귀검사(남)".into(),
        };
        assert_eq!(c.base_group(), "귀검사");
    }

    #[test]
    fn test_strip_parenthetical_without_parens() {
        assert_eq!(strip_parenthetical("격투가"), "격투가");
        assert_eq!(strip_parenthetical("a)b(c"), "a)b(c");
    }

    #[test]
    fn test_raw_item_tolerates_missing_fields() {
        let raw: RawItem = serde_json::from_str(r#"{"name":"고대의 부츠","type":"방어구"}"#).unwrap();
        assert_eq!(raw.name, "고대의 부츠");
        assert_eq!(raw.item_type, ItemType::Armor);
        assert!(raw.set_id.is_empty());
    }

    #[test]
    fn test_raw_item_reads_scalars_as_text() {
        let raw: RawItem = serde_json::from_str(
            r#"{"name":"고대의 팔찌","type":"악세사리","set_id":12,"image":1021,"effect":null}"#,
        )
        .unwrap();
        assert_eq!(raw.item_type, ItemType::Accessory);
        assert_eq!(raw.set_id, "12");
        assert_eq!(raw.image, "1021");
        assert!(raw.effect.is_empty());

        let odd: RawItem = serde_json::from_str(r#"{"name":"x","type":5}"#).unwrap();
        assert_eq!(odd.item_type, ItemType::Other);
    }

    #[test]
    fn test_equipment_is_tagged_by_kind() {
        let weapon = Equipment::Weapon(Weapon {
            name: "흑검".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&weapon).unwrap();
        assert_eq!(json["kind"], "weapon");
        assert_eq!(weapon.name(), "흑검");
        assert!(weapon.as_item().is_none());
    }

    #[test]
    fn test_base_set_requires_empty_prefix() {
        let sets = vec![
            EquipmentSet {
                name: "용맹".into(),
                prefix: "고대".into(),
                set_type: "방어구".into(),
                ..Default::default()
            },
            EquipmentSet {
                name: "용맹".into(),
                set_type: "방어구".into(),
                set_effect: "[3]세트효과".into(),
                ..Default::default()
            },
        ];
        let found = base_set(&sets, ItemType::Armor, "용맹").unwrap();
        assert!(found.prefix.is_empty());
        assert!(base_set(&sets, ItemType::Special, "용맹").is_none());
    }
}
