//! sled-backed document store.

use std::path::Path;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DocStoreError, DocStoreResult};
use crate::metrics::record_operation;
use crate::types::{Record, Stored};

/// Handle to the document database. Cheap to clone.
#[derive(Clone)]
pub struct DocumentStore {
    db: sled::Db,
}

impl DocumentStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> DocStoreResult<Self> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        info!(path = %path.display(), "Opened document store");
        Ok(Self { db })
    }

    /// Open a throwaway store that is deleted on drop.
    pub fn temporary() -> DocStoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn tree<T: Record>(&self) -> DocStoreResult<sled::Tree> {
        Ok(self.db.open_tree(T::COLLECTION)?)
    }

    /// Generate a 24-hex-digit document ID. IDs sort in insertion order.
    fn next_id(&self) -> DocStoreResult<String> {
        let seq = self.db.generate_id()?;
        let salt = Uuid::new_v4().simple().to_string();
        Ok(format!("{:016x}{}", seq, &salt[..8]))
    }

    /// Validate and insert a record under a fresh ID.
    pub fn insert<T: Record>(&self, record: T) -> DocStoreResult<Stored<T>> {
        let result = self.insert_inner(record);
        record_operation(T::COLLECTION, "insert", result.is_ok());
        result
    }

    fn insert_inner<T: Record>(&self, record: T) -> DocStoreResult<Stored<T>> {
        record.validate()?;

        let id = self.next_id()?;
        let bytes = serde_json::to_vec(&record)?;
        self.tree::<T>()?.insert(id.as_bytes(), bytes)?;

        debug!(collection = T::COLLECTION, id = %id, "Inserted document");
        Ok(Stored { id, record })
    }

    /// Fetch a document by ID. Unknown and malformed IDs both yield `None`.
    pub fn get<T: Record>(&self, id: &str) -> DocStoreResult<Option<Stored<T>>> {
        let result = match self.tree::<T>()?.get(id.as_bytes())? {
            Some(bytes) => decode::<T>(id, &bytes).map(Some),
            None => Ok(None),
        };
        record_operation(T::COLLECTION, "get", result.is_ok());
        result
    }

    /// All documents in the collection, in insertion order.
    pub fn list<T: Record>(&self) -> DocStoreResult<Vec<Stored<T>>> {
        self.filter::<T, _>(|_| true)
    }

    /// Documents matching `predicate`, in insertion order.
    pub fn filter<T, F>(&self, predicate: F) -> DocStoreResult<Vec<Stored<T>>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        let result = self.scan(predicate, usize::MAX);
        record_operation(T::COLLECTION, "list", result.is_ok());
        result
    }

    /// First document matching `predicate`.
    pub fn find_one<T, F>(&self, predicate: F) -> DocStoreResult<Option<Stored<T>>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        let result = self.scan(predicate, 1).map(|mut docs| docs.pop());
        record_operation(T::COLLECTION, "find_one", result.is_ok());
        result
    }

    fn scan<T, F>(&self, predicate: F, limit: usize) -> DocStoreResult<Vec<Stored<T>>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        let mut out = Vec::new();
        for entry in self.tree::<T>()?.iter() {
            if out.len() >= limit {
                break;
            }
            let (key, value) = entry?;
            let id = String::from_utf8_lossy(&key).into_owned();
            let doc = decode::<T>(&id, &value)?;
            if predicate(&doc.record) {
                out.push(doc);
            }
        }
        Ok(out)
    }

    /// Remove a document. Returns whether it existed.
    pub fn remove<T: Record>(&self, id: &str) -> DocStoreResult<bool> {
        let removed = self.tree::<T>()?.remove(id.as_bytes())?.is_some();
        record_operation(T::COLLECTION, "remove", true);
        Ok(removed)
    }

    /// Flush pending writes to disk.
    pub async fn flush(&self) -> DocStoreResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}

fn decode<T: Record>(id: &str, bytes: &[u8]) -> DocStoreResult<Stored<T>> {
    let record = serde_json::from_slice::<T>(bytes).map_err(|e| DocStoreError::Malformed {
        collection: T::COLLECTION,
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Stored {
        id: id.to_string(),
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdminRecord;

    fn admin(email: &str) -> AdminRecord {
        AdminRecord {
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[test]
    fn test_insert_get_list() {
        let store = DocumentStore::temporary().unwrap();
        let first = store.insert(admin("a@x.com")).unwrap();
        let second = store.insert(admin("b@x.com")).unwrap();
        assert_eq!(first.id.len(), 24);
        assert_ne!(first.id, second.id);

        let fetched = store.get::<AdminRecord>(&first.id).unwrap().unwrap();
        assert_eq!(fetched, first);

        let all = store.list::<AdminRecord>().unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn test_invalid_record_not_persisted() {
        let store = DocumentStore::temporary().unwrap();
        let err = store.insert(admin("not-an-email")).unwrap_err();
        assert!(matches!(err, DocStoreError::Validation(_)));
        assert!(store.list::<AdminRecord>().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id_is_none() {
        let store = DocumentStore::temporary().unwrap();
        assert!(store.get::<AdminRecord>("zzz").unwrap().is_none());
    }

    #[test]
    fn test_malformed_document_rejected_on_read() {
        let store = DocumentStore::temporary().unwrap();
        store
            .db
            .open_tree(AdminRecord::COLLECTION)
            .unwrap()
            .insert("bad", br#"{"email": 42}"#.to_vec())
            .unwrap();
        let err = store.get::<AdminRecord>("bad").unwrap_err();
        assert!(matches!(err, DocStoreError::Malformed { .. }));
    }

    #[test]
    fn test_find_one_and_remove() {
        let store = DocumentStore::temporary().unwrap();
        let doc = store.insert(admin("a@x.com")).unwrap();
        let found = store
            .find_one::<AdminRecord, _>(|a| a.email == "a@x.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, doc.id);

        assert!(store.remove::<AdminRecord>(&doc.id).unwrap());
        assert!(!store.remove::<AdminRecord>(&doc.id).unwrap());
    }

    #[test]
    fn test_reopen_keeps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = DocumentStore::open(dir.path().join("db")).unwrap();
            let id = store.insert(admin("a@x.com")).unwrap().id;
            store.db.flush().unwrap();
            id
        };
        let store = DocumentStore::open(dir.path().join("db")).unwrap();
        assert!(store.get::<AdminRecord>(&id).unwrap().is_some());
    }
}
