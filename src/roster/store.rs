//! Document store seam for user-scoped collections
//!
//! The hosted database is an external collaborator; this trait is the whole
//! surface the roster needs from it. `MemoryStore` backs tests and offline
//! use.

use std::future::Future;
use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use uuid::Uuid;

use crate::core::error::StoreError;
use crate::roster::schema::Document;

/// A document together with its store-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDoc {
    pub id: String,
    pub data: Document,
}

pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in insertion order
    fn list(&self, collection: &str) -> impl Future<Output = Result<Vec<StoredDoc>, StoreError>> + Send;

    fn get(&self, collection: &str, doc_id: &str)
        -> impl Future<Output = Result<Option<StoredDoc>, StoreError>> + Send;

    /// Insert a new document and return its id
    fn add(&self, collection: &str, data: Document) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Merge `fields` into an existing document in one write
    fn update(
        &self,
        collection: &str,
        doc_id: &str,
        fields: Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, collection: &str, doc_id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: DocumentStore> DocumentStore for Arc<T> {
    fn list(&self, collection: &str) -> impl Future<Output = Result<Vec<StoredDoc>, StoreError>> + Send {
        (**self).list(collection)
    }

    fn get(&self, collection: &str, doc_id: &str)
        -> impl Future<Output = Result<Option<StoredDoc>, StoreError>> + Send {
        (**self).get(collection, doc_id)
    }

    fn add(&self, collection: &str, data: Document) -> impl Future<Output = Result<String, StoreError>> + Send {
        (**self).add(collection, data)
    }

    fn update(
        &self,
        collection: &str,
        doc_id: &str,
        fields: Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).update(collection, doc_id, fields)
    }

    fn delete(&self, collection: &str, doc_id: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).delete(collection, doc_id)
    }
}

/// `users/{uid}/{name}`
pub fn user_collection(uid: &str, name: &str) -> String {
    format!("users/{uid}/{name}")
}

/// In-process store keyed by collection path
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<AHashMap<String, Vec<StoredDoc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<T>(&self, f: impl FnOnce(&mut AHashMap<String, Vec<StoredDoc>>) -> T) -> T {
        let mut guard = self.collections.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }

    fn not_found(collection: &str, doc_id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            doc_id: doc_id.to_string(),
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<StoredDoc>, StoreError> {
        Ok(self.with_collections(|c| c.get(collection).cloned().unwrap_or_default()))
    }

    async fn get(&self, collection: &str, doc_id: &str) -> Result<Option<StoredDoc>, StoreError> {
        Ok(self.with_collections(|c| {
            c.get(collection)
                .and_then(|docs| docs.iter().find(|d| d.id == doc_id))
                .cloned()
        }))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.with_collections(|c| {
            c.entry(collection.to_string()).or_default().push(StoredDoc {
                id: id.clone(),
                data,
            })
        });
        Ok(id)
    }

    async fn update(&self, collection: &str, doc_id: &str, fields: Document) -> Result<(), StoreError> {
        self.with_collections(|c| {
            let doc = c
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == doc_id))
                .ok_or_else(|| Self::not_found(collection, doc_id))?;
            doc.data.extend(fields);
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> Result<(), StoreError> {
        self.with_collections(|c| {
            let docs = c
                .get_mut(collection)
                .ok_or_else(|| Self::not_found(collection, doc_id))?;
            let before = docs.len();
            docs.retain(|d| d.id != doc_id);
            if docs.len() == before {
                return Err(Self::not_found(collection, doc_id));
            }
            Ok(())
        })
    }
}
