//! Crew and damage-record operations for one signed-in user

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::{info, warn};

use crate::core::error::{GearError, Result, StoreError};
use crate::roster::schema::{
    loadout_fields, CrewDoc, CrewSnapshot, DamageRecord, Document, Enhancements, NewCrew, NewDamageRecord,
};
use crate::roster::store::{user_collection, DocumentStore};

pub const CREW_COLLECTION: &str = "crew";
pub const RECORDS_COLLECTION: &str = "records";

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A user's crew list and damage records on top of a document store
pub struct Roster<S> {
    store: S,
    uid: String,
    memo_max_len: usize,
}

impl<S: DocumentStore> Roster<S> {
    pub fn new(store: S, uid: impl Into<String>, memo_max_len: usize) -> Self {
        Self {
            store,
            uid: uid.into(),
            memo_max_len,
        }
    }

    /// Roster using the global config's memo limit
    pub fn with_config(store: S, uid: impl Into<String>) -> Self {
        Self::new(store, uid, crate::core::config::config().memo_max_len)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn crew_path(&self) -> String {
        user_collection(&self.uid, CREW_COLLECTION)
    }

    fn records_path(&self) -> String {
        user_collection(&self.uid, RECORDS_COLLECTION)
    }

    /// Valid crew entries sorted by `order`
    pub async fn load_crew(&self) -> Result<Vec<CrewDoc>> {
        let docs = self.store.list(&self.crew_path()).await?;
        let mut crew: Vec<CrewDoc> = docs
            .iter()
            .enumerate()
            .filter_map(|(i, d)| CrewDoc::from_doc(&d.id, &d.data, i))
            .collect();
        crew.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(Ordering::Equal));
        Ok(crew)
    }

    pub async fn create_crew(&self, crew: &NewCrew) -> Result<String> {
        if crew.id.trim().is_empty() {
            return Err(GearError::InvalidInput("아이디는 필수입니다.".into()));
        }
        if crew.job.trim().is_empty() {
            return Err(GearError::InvalidInput("직업은 필수입니다.".into()));
        }
        let mut doc = crew.to_document(now_millis());
        doc.insert("createdAt".into(), Value::from(now_millis()));
        let doc_id = self.store.add(&self.crew_path(), doc).await?;
        info!(doc_id = %doc_id, job = %crew.job.trim(), "crew created");
        Ok(doc_id)
    }

    /// Save equipped items and the four enhancement levels in one write
    pub async fn update_loadout(
        &self,
        crew_doc_id: &str,
        equipped_items: Option<&[String]>,
        enhancements: Enhancements,
    ) -> Result<()> {
        let fields = loadout_fields(equipped_items, enhancements);
        self.store.update(&self.crew_path(), crew_doc_id, fields).await?;
        Ok(())
    }

    /// Store a damage measurement with a snapshot of the crew as it is now
    ///
    /// A crew document that cannot be read or lacks identity is recorded
    /// without a snapshot rather than failing the write.
    pub async fn record_damage(&self, crew: &CrewDoc, damage: u64, memo: &str) -> Result<String> {
        if damage == 0 {
            return Err(GearError::InvalidInput("damage must be positive".into()));
        }

        let snapshot = match self.store.get(&self.crew_path(), &crew.doc_id).await {
            Ok(doc) => doc.and_then(|d| CrewSnapshot::from_doc(&d.data)),
            Err(e) => {
                warn!(error = %e, crew = %crew.doc_id, "crew snapshot unavailable");
                None
            }
        };

        let record = NewDamageRecord::build(damage, crew, snapshot, memo, self.memo_max_len);
        let mut doc = match serde_json::to_value(&record)? {
            Value::Object(map) => map,
            other => return Err(StoreError::NotAnObject(other.to_string()).into()),
        };
        doc.insert("createdAt".into(), Value::from(now_millis()));
        let doc_id = self.store.add(&self.records_path(), doc).await?;
        info!(doc_id = %doc_id, damage, "damage recorded");
        Ok(doc_id)
    }

    /// Valid records, newest first
    pub async fn load_records(&self) -> Result<Vec<DamageRecord>> {
        let docs = self.store.list(&self.records_path()).await?;
        let mut records: Vec<DamageRecord> = docs
            .iter()
            .rev()
            .filter_map(|d| DamageRecord::from_doc(&d.id, &d.data))
            .collect();
        // stable: equal timestamps keep the reversed insertion order
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Records for one crew entry, newest first
    pub async fn records_for(&self, crew_doc_id: &str) -> Result<Vec<DamageRecord>> {
        let mut records = self.load_records().await?;
        records.retain(|r| r.crew_doc_id == crew_doc_id);
        Ok(records)
    }

    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.store.delete(&self.records_path(), record_id).await?;
        Ok(())
    }

    /// Raw crew document, for callers that need fields outside `CrewDoc`
    pub async fn crew_document(&self, crew_doc_id: &str) -> Result<Document> {
        self.store
            .get(&self.crew_path(), crew_doc_id)
            .await?
            .map(|d| d.data)
            .ok_or_else(|| {
                StoreError::NotFound {
                    collection: self.crew_path(),
                    doc_id: crew_doc_id.to_string(),
                }
                .into()
            })
    }
}
