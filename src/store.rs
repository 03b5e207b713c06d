use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::{document::ArticleMeta, error::Result};

const DOCUMENTS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("documents");
const VECTORS: TableDefinition<u64, &[u8]> = TableDefinition::new("vectors");

/// Vector entry header: 4 bytes dimension (u32 LE).
const HEADER_SIZE: usize = 4;

/// A document persisted alongside its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub meta: ArticleMeta,
    pub content: String,
    /// Content hash used to skip re-embedding unchanged documents.
    pub fingerprint: u64,
}

/// A stored document together with its embedding vector.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub doc_id: u64,
    pub document: StoredDocument,
    pub vector: Vec<f32>,
}

/// Persistent store of embedded documents, keyed by document ID.
///
/// Two redb tables: `documents` holds the JSON-serialized
/// [`StoredDocument`], `vectors` holds the embedding as a 4-byte dimension
/// header followed by f32 LE values.
pub struct VectorDb {
    db: Database,
}

impl VectorDb {
    /// Open or create a vector store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        txn.open_table(DOCUMENTS)?;
        txn.open_table(VECTORS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or replace a document and its embedding in one transaction.
    pub fn upsert(
        &self,
        doc_id: u64,
        document: &StoredDocument,
        vector: &[f32],
    ) -> Result<()> {
        let doc_bytes = serde_json::to_vec(document)?;
        let byte_len = HEADER_SIZE + std::mem::size_of_val(vector);

        let txn = self.db.begin_write()?;
        {
            let mut docs = txn.open_table(DOCUMENTS)?;
            docs.insert(doc_id, doc_bytes.as_slice())?;

            let mut vectors = txn.open_table(VECTORS)?;
            let mut guard = vectors.insert_reserve(doc_id, byte_len)?;
            let dest = guard.as_mut();
            dest[0..HEADER_SIZE]
                .copy_from_slice(&(vector.len() as u32).to_le_bytes());
            dest[HEADER_SIZE..].copy_from_slice(bytemuck::cast_slice(vector));
        }
        txn.commit()?;
        Ok(())
    }

    /// Fingerprint of the stored document, or None if absent.
    pub fn fingerprint(&self, doc_id: u64) -> Result<Option<u64>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;

        let Some(guard) = table.get(doc_id)? else {
            return Ok(None);
        };
        let document: StoredDocument = serde_json::from_slice(guard.value())?;
        Ok(Some(document.fingerprint))
    }

    /// Fetch every record whose metadata `source` matches any of the
    /// requested sources (OR filter). Returned in ascending doc-id order.
    pub fn fetch_by_sources(
        &self,
        sources: &[String],
    ) -> Result<Vec<StoredRecord>> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin_read()?;
        let docs = txn.open_table(DOCUMENTS)?;
        let vectors = txn.open_table(VECTORS)?;

        let mut records = Vec::new();
        for entry in docs.iter()? {
            let (key, value) = entry?;
            let doc_id = key.value();
            let document: StoredDocument =
                serde_json::from_slice(value.value())?;
            if !sources.contains(&document.meta.source) {
                continue;
            }

            let Some(guard) = vectors.get(doc_id)? else {
                continue;
            };
            if let Some(vector) = decode_vector(guard.value()) {
                records.push(StoredRecord {
                    doc_id,
                    document,
                    vector,
                });
            }
        }
        Ok(records)
    }

    /// All stored document IDs.
    pub fn list_ids(&self) -> Result<Vec<u64>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            ids.push(key.value());
        }
        Ok(ids)
    }

    /// Remove documents and vectors in a single transaction.
    pub fn batch_remove(&self, doc_ids: &[u64]) -> Result<()> {
        if doc_ids.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin_write()?;
        {
            let mut docs = txn.open_table(DOCUMENTS)?;
            let mut vectors = txn.open_table(VECTORS)?;
            for &doc_id in doc_ids {
                docs.remove(doc_id)?;
                vectors.remove(doc_id)?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

impl std::fmt::Debug for VectorDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorDb").finish_non_exhaustive()
    }
}

fn decode_vector(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() < HEADER_SIZE {
        return None;
    }
    let dimension =
        u32::from_le_bytes(bytes[0..HEADER_SIZE].try_into().ok()?) as usize;
    if bytes.len() != HEADER_SIZE + dimension * 4 {
        return None;
    }
    Some(bytemuck::cast_slice(&bytes[HEADER_SIZE..]).to_vec())
}
