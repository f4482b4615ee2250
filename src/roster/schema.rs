//! Persisted crew and damage-record documents
//!
//! Documents come back from the store as loose JSON objects. Every reader
//! here is lenient: wrong types fall back to defaults or `None` instead of
//! failing the whole listing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::effects::aggregate::group_thousands;

pub type Document = Map<String, Value>;

pub const ENHANCE_RANGE: (i64, i64) = (0, 20);
pub const REFINE_RANGE: (i64, i64) = (0, 10);

/// One 억, the unit damage is entered in
pub const EOK: u64 = 100_000_000;
/// Decimal places accepted after the 억 value
const EOK_FRACTION_DIGITS: usize = 7;

/// Read an integer option from a number or numeric string
///
/// Values are truncated toward zero; anything missing, unparsable or outside
/// `min..=max` yields `fallback`.
pub fn normalize_int_option(value: Option<&Value>, min: i64, max: i64, fallback: i64) -> i64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n.filter(|n| n.is_finite()).map(f64::trunc) {
        Some(n) if n >= min as f64 && n <= max as f64 => n as i64,
        _ => fallback,
    }
}

fn text<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

fn owned_text(doc: &Document, key: &str) -> Option<String> {
    text(doc, key).map(str::to_string)
}

fn trimmed(doc: &Document, key: &str) -> String {
    text(doc, key).map(str::trim).unwrap_or_default().to_string()
}

fn string_list(doc: &Document, key: &str) -> Option<Vec<String>> {
    doc.get(key).and_then(Value::as_array).map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn finite_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// A number, or a string like `"1,234,567"`
fn grouped_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        other => finite_number(other),
    }
}

/// Enhancement and refine levels shared by crew documents and snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancements {
    pub weapon_enhance: i64,
    pub armor_acc_special_enhance: i64,
    pub weapon_refine: i64,
    pub support_refine: i64,
}

impl Enhancements {
    pub fn from_doc(doc: &Document) -> Self {
        let (emin, emax) = ENHANCE_RANGE;
        let (rmin, rmax) = REFINE_RANGE;
        Self {
            weapon_enhance: normalize_int_option(doc.get("weaponEnhance"), emin, emax, 0),
            armor_acc_special_enhance: normalize_int_option(doc.get("armorAccSpecialEnhance"), emin, emax, 0),
            weapon_refine: normalize_int_option(doc.get("weaponRefine"), rmin, rmax, 0),
            support_refine: normalize_int_option(doc.get("supportRefine"), rmin, rmax, 0),
        }
    }

    /// Same values forced into range
    pub fn normalized(self) -> Self {
        let clamp = |v: i64, (min, max): (i64, i64)| if (min..=max).contains(&v) { v } else { 0 };
        Self {
            weapon_enhance: clamp(self.weapon_enhance, ENHANCE_RANGE),
            armor_acc_special_enhance: clamp(self.armor_acc_special_enhance, ENHANCE_RANGE),
            weapon_refine: clamp(self.weapon_refine, REFINE_RANGE),
            support_refine: clamp(self.support_refine, REFINE_RANGE),
        }
    }
}

/// A stored character
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewDoc {
    pub doc_id: String,
    pub id: String,
    pub job: String,
    pub order: f64,
    pub equipped_items: Option<Vec<String>>,
    pub skill_code: Option<String>,
    #[serde(flatten)]
    pub enhancements: Enhancements,
    pub creature: Option<String>,
    pub aura: Option<String>,
    pub artifact: Option<String>,
    pub title: Option<String>,
    pub avatar: Option<String>,
}

impl CrewDoc {
    /// Parse a listing entry; `index` stands in for a missing `order`
    ///
    /// Returns `None` when `id` or `job` is blank.
    pub fn from_doc(doc_id: &str, doc: &Document, index: usize) -> Option<Self> {
        let id = trimmed(doc, "id");
        let job = trimmed(doc, "job");
        if id.is_empty() || job.is_empty() {
            return None;
        }
        Some(Self {
            doc_id: doc_id.to_string(),
            id,
            job,
            order: finite_number(doc.get("order")).unwrap_or(index as f64),
            equipped_items: string_list(doc, "equippedItems"),
            skill_code: owned_text(doc, "skillCode"),
            enhancements: Enhancements::from_doc(doc),
            creature: owned_text(doc, "creature"),
            aura: owned_text(doc, "aura"),
            artifact: owned_text(doc, "artifact"),
            title: owned_text(doc, "title"),
            avatar: owned_text(doc, "avatar"),
        })
    }
}

/// Copy of a crew document frozen onto a damage record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewSnapshot {
    pub id: String,
    pub job: String,
    pub equipped_items: Option<Vec<String>>,
    pub skill_rune: Option<String>,
    pub antimagic_power: Option<f64>,
    pub creature: Option<String>,
    pub aura: Option<String>,
    pub artifact: Option<String>,
    pub title: Option<String>,
    pub avatar: Option<String>,
    pub weapon_avatar: Option<String>,
    #[serde(flatten)]
    pub enhancements: Enhancements,
}

impl CrewSnapshot {
    /// Snapshot a crew or stored-snapshot object; `None` without `id` and `job`
    pub fn from_doc(doc: &Document) -> Option<Self> {
        let id = trimmed(doc, "id");
        let job = trimmed(doc, "job");
        if id.is_empty() || job.is_empty() {
            return None;
        }
        Some(Self {
            id,
            job,
            equipped_items: string_list(doc, "equippedItems"),
            skill_rune: owned_text(doc, "skillRune"),
            antimagic_power: grouped_number(doc.get("antimagicPower")),
            creature: owned_text(doc, "creature"),
            aura: owned_text(doc, "aura"),
            artifact: owned_text(doc, "artifact"),
            title: owned_text(doc, "title"),
            avatar: owned_text(doc, "avatar"),
            weapon_avatar: owned_text(doc, "weaponAvatar"),
            enhancements: Enhancements::from_doc(doc),
        })
    }
}

/// A stored damage measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRecord {
    pub doc_id: String,
    pub damage: f64,
    pub crew_doc_id: String,
    pub crew_id: String,
    pub crew_job: String,
    pub crew_snapshot: Option<CrewSnapshot>,
    pub memo: Option<String>,
    pub created_at: Option<u64>,
}

impl DamageRecord {
    /// Parse a listing entry; records without damage or crew identity are dropped
    pub fn from_doc(doc_id: &str, doc: &Document) -> Option<Self> {
        let damage = finite_number(doc.get("damage")).unwrap_or(0.0);
        let crew_id = owned_text(doc, "crewId").unwrap_or_default();
        let crew_job = owned_text(doc, "crewJob").unwrap_or_default();
        if damage <= 0.0 || crew_id.is_empty() || crew_job.is_empty() {
            return None;
        }
        Some(Self {
            doc_id: doc_id.to_string(),
            damage,
            crew_doc_id: owned_text(doc, "crewDocId").unwrap_or_default(),
            crew_id,
            crew_job,
            crew_snapshot: doc
                .get("crewSnapshot")
                .and_then(Value::as_object)
                .and_then(CrewSnapshot::from_doc),
            memo: text(doc, "memo")
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string),
            created_at: doc.get("createdAt").and_then(Value::as_u64),
        })
    }

    /// Damage rendered in whole 억, e.g. `1,234 億`
    pub fn damage_label(&self) -> String {
        format_damage_eok(self.damage)
    }
}

/// A damage record about to be written
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDamageRecord {
    pub damage: u64,
    pub crew_doc_id: String,
    pub crew_id: String,
    pub crew_job: String,
    pub crew_snapshot: Option<CrewSnapshot>,
    pub memo: Option<String>,
}

impl NewDamageRecord {
    /// Trim the memo and cut it to `memo_max_len` characters
    pub fn build(
        damage: u64,
        crew: &CrewDoc,
        crew_snapshot: Option<CrewSnapshot>,
        memo: &str,
        memo_max_len: usize,
    ) -> Self {
        let memo: String = memo.trim().chars().take(memo_max_len).collect();
        Self {
            damage,
            crew_doc_id: crew.doc_id.clone(),
            crew_id: crew.id.clone(),
            crew_job: crew.job.clone(),
            crew_snapshot,
            memo: (!memo.is_empty()).then_some(memo),
        }
    }
}

/// A character about to be created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCrew {
    pub id: String,
    pub job: String,
    pub equipped_items: Vec<String>,
    pub skill_code: String,
    pub enhancements: Enhancements,
    pub creature: String,
    pub aura: String,
    pub artifact: String,
    pub title: String,
    pub avatar: String,
}

fn non_blank(value: &str) -> Value {
    let value = value.trim();
    if value.is_empty() {
        Value::Null
    } else {
        Value::String(value.to_string())
    }
}

impl NewCrew {
    /// Document fields for a new crew entry; blank text becomes `null`
    pub fn to_document(&self, order: u64) -> Document {
        let mut doc = Document::new();
        doc.insert("id".into(), Value::String(self.id.trim().to_string()));
        doc.insert("job".into(), Value::String(self.job.trim().to_string()));
        doc.insert("order".into(), Value::from(order));
        doc.insert(
            "equippedItems".into(),
            if self.equipped_items.is_empty() {
                Value::Null
            } else {
                Value::from(self.equipped_items.clone())
            },
        );
        doc.insert("skillCode".into(), non_blank(&self.skill_code));
        doc.extend(loadout_fields(None, self.enhancements).into_iter().filter(|(k, _)| k != "equippedItems"));
        doc.insert("creature".into(), non_blank(&self.creature));
        doc.insert("aura".into(), non_blank(&self.aura));
        doc.insert("artifact".into(), non_blank(&self.artifact));
        doc.insert("title".into(), non_blank(&self.title));
        doc.insert("avatar".into(), non_blank(&self.avatar));
        doc
    }
}

/// Fields rewritten together when a loadout is saved
pub fn loadout_fields(equipped_items: Option<&[String]>, enhancements: Enhancements) -> Document {
    let e = enhancements.normalized();
    let mut doc = Document::new();
    doc.insert(
        "equippedItems".into(),
        equipped_items.map_or(Value::Null, |items| Value::from(items.to_vec())),
    );
    doc.insert("weaponEnhance".into(), Value::from(e.weapon_enhance));
    doc.insert("armorAccSpecialEnhance".into(), Value::from(e.armor_acc_special_enhance));
    doc.insert("weaponRefine".into(), Value::from(e.weapon_refine));
    doc.insert("supportRefine".into(), Value::from(e.support_refine));
    doc
}

/// Parse damage typed in 억 units, e.g. `1.2` for 1억 2천만
///
/// Up to seven decimal places are accepted, so the smallest step is 10.
/// Commas are ignored. Returns `None` for anything else, including zero.
pub fn parse_eok_damage(raw: &str) -> Option<u64> {
    let cleaned = raw.replace(',', "");
    let trimmed = cleaned.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty()
        || !all_digits(whole)
        || !all_digits(fraction)
        || fraction.len() > EOK_FRACTION_DIGITS
        || (trimmed.contains('.') && fraction.is_empty())
    {
        return None;
    }

    let whole: u64 = whole.parse().ok()?;
    let padded = format!("{fraction:0<width$}", width = EOK_FRACTION_DIGITS);
    let fraction: u64 = padded.parse().ok()?;
    let step = EOK / 10u64.pow(EOK_FRACTION_DIGITS as u32);
    let damage = whole.checked_mul(EOK)?.checked_add(fraction * step)?;
    (damage > 0).then_some(damage)
}

/// Whole 억 with thousands separators
pub fn format_damage_eok(damage: f64) -> String {
    let eok = damage / EOK as f64;
    let whole = if eok.is_finite() { eok.trunc() as i64 } else { 0 };
    format!("{} 億", group_thousands(whole))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_normalize_int_option() {
        assert_eq!(normalize_int_option(Some(&json!(12)), 0, 20, 0), 12);
        assert_eq!(normalize_int_option(Some(&json!(12.9)), 0, 20, 0), 12);
        assert_eq!(normalize_int_option(Some(&json!(" 7 ")), 0, 20, 0), 7);
        assert_eq!(normalize_int_option(Some(&json!(21)), 0, 20, 3), 3);
        assert_eq!(normalize_int_option(Some(&json!(-1)), 0, 20, 3), 3);
        assert_eq!(normalize_int_option(Some(&json!("abc")), 0, 20, 3), 3);
        assert_eq!(normalize_int_option(Some(&json!("")), 0, 20, 3), 3);
        assert_eq!(normalize_int_option(Some(&json!(null)), 0, 20, 3), 3);
        assert_eq!(normalize_int_option(None, 0, 20, 3), 3);
    }

    #[test]
    fn test_crew_doc_parsing() {
        let d = doc(json!({
            "id": " 검신 ",
            "job": "웨펀마스터",
            "equippedItems": ["a", 3, "b"],
            "weaponEnhance": "15",
            "weaponRefine": 11,
            "creature": "펫",
            "aura": 5
        }));
        let crew = CrewDoc::from_doc("d1", &d, 4).unwrap();
        assert_eq!(crew.id, "검신");
        assert_eq!(crew.order, 4.0);
        assert_eq!(crew.equipped_items, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(crew.enhancements.weapon_enhance, 15);
        assert_eq!(crew.enhancements.weapon_refine, 0);
        assert_eq!(crew.creature.as_deref(), Some("펫"));
        assert_eq!(crew.aura, None);

        assert!(CrewDoc::from_doc("d2", &doc(json!({ "id": "x", "job": " " })), 0).is_none());
    }

    #[test]
    fn test_snapshot_antimagic_power() {
        let base = json!({ "id": "a", "job": "b" });
        let mut d = doc(base.clone());
        d.insert("antimagicPower".into(), json!("12,345"));
        assert_eq!(CrewSnapshot::from_doc(&d).unwrap().antimagic_power, Some(12_345.0));
        d.insert("antimagicPower".into(), json!(900));
        assert_eq!(CrewSnapshot::from_doc(&d).unwrap().antimagic_power, Some(900.0));
        d.insert("antimagicPower".into(), json!("많음"));
        assert_eq!(CrewSnapshot::from_doc(&d).unwrap().antimagic_power, None);
        assert!(CrewSnapshot::from_doc(&doc(json!({ "id": "a" }))).is_none());
    }

    #[test]
    fn test_damage_record_filtering() {
        let ok = doc(json!({
            "damage": 150_000_000u64,
            "crewId": "a",
            "crewJob": "b",
            "memo": "  ",
            "crewSnapshot": { "id": "a", "job": "b", "weaponEnhance": 12 }
        }));
        let record = DamageRecord::from_doc("r1", &ok).unwrap();
        assert_eq!(record.memo, None);
        assert_eq!(record.crew_snapshot.as_ref().unwrap().enhancements.weapon_enhance, 12);
        assert_eq!(record.damage_label(), "1 億");

        for bad in [
            json!({ "damage": 0, "crewId": "a", "crewJob": "b" }),
            json!({ "damage": "100", "crewId": "a", "crewJob": "b" }),
            json!({ "damage": 100, "crewId": "", "crewJob": "b" }),
            json!({ "damage": 100, "crewId": "a" }),
        ] {
            assert!(DamageRecord::from_doc("r", &doc(bad)).is_none());
        }
    }

    #[test]
    fn test_new_record_memo_is_trimmed_and_cut() {
        let crew = CrewDoc::from_doc("d1", &doc(json!({ "id": "a", "job": "b" })), 0).unwrap();
        let long = format!("  {}  ", "가".repeat(40));
        let record = NewDamageRecord::build(10, &crew, None, &long, 30);
        assert_eq!(record.memo.as_ref().map(|m| m.chars().count()), Some(30));
        assert_eq!(NewDamageRecord::build(10, &crew, None, "   ", 30).memo, None);
        assert_eq!(record.crew_doc_id, "d1");
    }

    #[test]
    fn test_parse_eok_damage() {
        assert_eq!(parse_eok_damage("1"), Some(100_000_000));
        assert_eq!(parse_eok_damage("1.2"), Some(120_000_000));
        assert_eq!(parse_eok_damage("1.02"), Some(102_000_000));
        assert_eq!(parse_eok_damage("1.003"), Some(100_300_000));
        assert_eq!(parse_eok_damage("1.0000001"), Some(100_000_010));
        assert_eq!(parse_eok_damage("4,123.321"), Some(412_332_100_000));
        assert_eq!(parse_eok_damage("1.00000001"), None);
        assert_eq!(parse_eok_damage("1."), None);
        assert_eq!(parse_eok_damage("-1"), None);
        assert_eq!(parse_eok_damage("0"), None);
        assert_eq!(parse_eok_damage(""), None);
    }

    #[test]
    fn test_format_damage_eok() {
        assert_eq!(format_damage_eok(412_332_100_000.0), "4,123 億");
        assert_eq!(format_damage_eok(99_999_999.0), "0 億");
    }

    #[test]
    fn test_new_crew_document() {
        let crew = NewCrew {
            id: " a ".into(),
            job: "b".into(),
            enhancements: Enhancements {
                weapon_enhance: 25,
                ..Enhancements::default()
            },
            aura: "  ".into(),
            ..NewCrew::default()
        };
        let d = crew.to_document(7);
        assert_eq!(d["id"], json!("a"));
        assert_eq!(d["order"], json!(7));
        assert_eq!(d["equippedItems"], Value::Null);
        assert_eq!(d["weaponEnhance"], json!(0));
        assert_eq!(d["aura"], Value::Null);
    }
}
