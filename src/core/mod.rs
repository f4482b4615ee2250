pub mod config;
pub mod error;
pub mod types;

pub use config::GearConfig;
pub use error::{CatalogError, GearError, Result, StoreError};
pub use types::{ItemType, Part, SlotDef, SlotId};
