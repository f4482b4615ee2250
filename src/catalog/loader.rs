//! Fetch the static JSON files and build the catalog bundle
//!
//! Payloads that are not JSON arrays degrade to empty collections, and
//! individual malformed entries are skipped, so missing data in one file
//! never blocks the others.

use std::future::Future;
use std::path::PathBuf;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::model::{Character, EquipmentSet, Item, Weapon};
use crate::catalog::parts::derive_items_with_parts;
use crate::core::config::GearConfig;
use crate::core::error::CatalogError;
use crate::core::types::Part;

pub const CHARACTER_RESOURCE: &str = "character.json";
pub const ITEM_RESOURCE: &str = "item.json";
pub const WEAPON_RESOURCE: &str = "weapon.json";
pub const SET_RESOURCE: &str = "set.json";

/// Somewhere the JSON data files can be read from
pub trait CatalogSource: Send + Sync {
    /// Fetch one resource (e.g. `item.json`) as parsed JSON
    fn fetch_json(&self, resource: &str) -> impl Future<Output = Result<Value, CatalogError>> + Send;
}

/// Reads the data files over HTTP relative to a base URL
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GearConfig) -> Self {
        Self::new(config.data_base_url.clone())
    }

    fn url_for(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

impl CatalogSource for HttpSource {
    async fn fetch_json(&self, resource: &str) -> Result<Value, CatalogError> {
        let response = self
            .client
            .get(self.url_for(resource))
            .send()
            .await
            .map_err(|e| CatalogError::Transport {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| CatalogError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

/// Reads the data files from a local directory
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CatalogSource for DirSource {
    async fn fetch_json(&self, resource: &str) -> Result<Value, CatalogError> {
        let path = self.root.join(resource);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::Status {
                    resource: resource.to_string(),
                    status: 404,
                }
            } else {
                CatalogError::Transport {
                    resource: resource.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| CatalogError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

/// Immutable result of one catalog load
#[derive(Debug, Clone, Default)]
pub struct CatalogBundle {
    pub characters: Vec<Character>,
    pub items: Vec<Item>,
    pub weapons: Vec<Weapon>,
}

impl CatalogBundle {
    /// Build a bundle from raw payloads, deriving item parts
    pub fn from_payloads(characters: Value, items: Value, weapons: Value) -> Self {
        let characters: Vec<Character> = array_of(characters);
        let raw_items = array_of(items);
        let weapons: Vec<Weapon> = array_of(weapons);

        Self {
            characters: characters.into_iter().filter(|c| !c.job.is_empty()).collect(),
            items: derive_items_with_parts(raw_items)
                .into_iter()
                .filter(|i| !i.name().is_empty())
                .collect(),
            weapons: weapons.into_iter().filter(|w| !w.name.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.weapons.is_empty()
    }

    pub fn character(&self, job: &str) -> Option<&Character> {
        if job.is_empty() {
            return None;
        }
        self.characters.iter().find(|c| c.job == job)
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name() == name)
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name == name)
    }

    pub fn items_for_part(&self, part: Part) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.part == part)
    }

    /// First non-empty set-effect text recorded for a set id
    pub fn set_effect(&self, set_id: &str) -> Option<&str> {
        self.items
            .iter()
            .filter(|i| i.raw.set_id == set_id)
            .map(|i| i.raw.set_effect.as_str())
            .find(|text| !text.trim().is_empty())
    }
}

/// Decode a JSON array leniently: non-arrays are empty, bad entries skipped
pub fn array_of<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Fetch characters, items and weapons concurrently and build a bundle
pub async fn load_catalog<S: CatalogSource>(source: &S) -> Result<CatalogBundle, CatalogError> {
    let (characters, items, weapons) = tokio::try_join!(
        source.fetch_json(CHARACTER_RESOURCE),
        source.fetch_json(ITEM_RESOURCE),
        source.fetch_json(WEAPON_RESOURCE),
    )?;

    let bundle = CatalogBundle::from_payloads(characters, items, weapons);
    tracing::info!(
        characters = bundle.characters.len(),
        items = bundle.items.len(),
        weapons = bundle.weapons.len(),
        "catalog loaded"
    );
    Ok(bundle)
}

/// Fetch the legacy `set.json` records, keeping only named ones
pub async fn load_sets<S: CatalogSource>(source: &S) -> Result<Vec<EquipmentSet>, CatalogError> {
    let sets: Vec<EquipmentSet> = array_of(source.fetch_json(SET_RESOURCE).await?);
    Ok(sets.into_iter().filter(|s| !s.name.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_array_payloads_degrade_to_empty() {
        let bundle = CatalogBundle::from_payloads(json!({"job": "x"}), json!(null), json!("oops"));
        assert!(bundle.characters.is_empty());
        assert!(bundle.items.is_empty());
        assert!(bundle.weapons.is_empty());
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_filters_unnamed_entries() {
        let bundle = CatalogBundle::from_payloads(
            json!([{"job": "런처", "group": "거너(여)"}, {"job": ""}, 7]),
            json!([{"name": "", "type": "방어구"}, {"name": "반지", "type": "악세사리", "set_id": "r"}]),
            json!([{"name": "핸드캐넌", "available": "런처"}, {"type": "둔기"}]),
        );
        assert_eq!(bundle.characters.len(), 1);
        assert_eq!(bundle.items.len(), 1);
        assert_eq!(bundle.weapons.len(), 1);
        assert!(bundle.character("런처").is_some());
        assert!(bundle.character("").is_none());
    }

    #[test]
    fn test_numeric_fields_keep_whole_group() {
        let bundle = CatalogBundle::from_payloads(
            json!([{"job": "런처", "group": "거너(여)", "image": 3}]),
            json!([
                {"name": "a 팔찌", "type": "악세사리", "set_id": "acc", "image": 1021},
                {"name": "a 목걸이", "type": "악세사리", "set_id": "acc", "image": "n.png"},
                {"name": "a 반지", "type": "악세사리", "set_id": "acc", "image": null}
            ]),
            json!([{"name": "핸드캐넌", "available": "런처", "basic_info": 120}]),
        );
        assert_eq!(bundle.items.len(), 3);
        assert_eq!(bundle.item("a 팔찌").unwrap().part, Part::Bracelet);
        assert_eq!(bundle.item("a 팔찌").unwrap().raw.image, "1021");
        assert_eq!(bundle.item("a 목걸이").unwrap().part, Part::Necklace);
        assert_eq!(bundle.item("a 반지").unwrap().part, Part::Ring);
        assert!(bundle.item("a 반지").unwrap().raw.image.is_empty());
        assert_eq!(bundle.character("런처").unwrap().image, "3");
        assert_eq!(bundle.weapon("핸드캐넌").unwrap().basic_info, "120");
    }

    #[test]
    fn test_set_effect_skips_blank_text() {
        let bundle = CatalogBundle::from_payloads(
            json!([]),
            json!([
                {"name": "a", "type": "특수장비", "set_id": "s", "set_effect": "  "},
                {"name": "b", "type": "특수장비", "set_id": "s", "set_effect": "[3]세트효과\n힘 +10"}
            ]),
            json!([]),
        );
        assert_eq!(bundle.set_effect("s"), Some("[3]세트효과\n힘 +10"));
        assert_eq!(bundle.set_effect("missing"), None);
    }

    #[test]
    fn test_http_source_joins_urls() {
        let source = HttpSource::new("https://example.org/data/");
        assert_eq!(source.url_for(ITEM_RESOURCE), "https://example.org/data/item.json");
    }
}
