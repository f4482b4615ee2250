//! Game data catalog: records, part inference, loading and caching

pub mod cache;
pub mod images;
pub mod loader;
pub mod model;
pub mod parts;
pub mod search;

pub use cache::{CacheState, CatalogCache};
pub use images::ImagePaths;
pub use loader::{load_catalog, load_sets, CatalogBundle, CatalogSource, DirSource, HttpSource};
pub use model::{base_set, Character, Equipment, EquipmentSet, Item, RawItem, Weapon};
pub use parts::{assign_parts_for_group, derive_items_with_parts, score_part};
