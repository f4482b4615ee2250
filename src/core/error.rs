use thiserror::Error;

/// Failure while loading the static game data.
///
/// Cloneable so a single in-flight load can hand the same error to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{resource} 로딩 실패 ({status})")]
    Status { resource: String, status: u16 },

    #[error("{resource} request failed: {message}")]
    Transport { resource: String, message: String },

    #[error("{resource} is not valid JSON: {message}")]
    Decode { resource: String, message: String },

    #[error("catalog load was abandoned before it settled")]
    Abandoned,
}

impl CatalogError {
    /// Resource the failure belongs to, if any
    pub fn resource(&self) -> Option<&str> {
        match self {
            CatalogError::Status { resource, .. }
            | CatalogError::Transport { resource, .. }
            | CatalogError::Decode { resource, .. } => Some(resource),
            CatalogError::Abandoned => None,
        }
    }
}

/// Failure reported by a document store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document not found: {collection}/{doc_id}")]
    NotFound { collection: String, doc_id: String },

    #[error("document is not an object: {0}")]
    NotAnObject(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum GearError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GearError>;
