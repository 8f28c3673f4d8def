//! Owned in-memory record collections.
//!
//! One [`Store`] holds every record of a single kind, in insertion order.
//! Records are looked up by their key: a synthetic sequential id for
//! accounts, languages and transactions, a business field for branches and
//! users.

use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Synthetic record identifier, unique within one store.
pub type RecordId = u64;

/// Who created and last changed a record, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl Audit {
    pub fn created(actor: &str, at: DateTime<Utc>) -> Self {
        Audit {
            created_at: Some(at),
            created_by: Some(actor.to_string()),
            modified_at: None,
            modified_by: None,
        }
    }

    /// Records a modification.
    pub fn touch(&mut self, actor: &str, at: DateTime<Utc>) {
        self.modified_at = Some(at);
        self.modified_by = Some(actor.to_string());
    }
}

/// A record that can live in a [`Store`].
pub trait Record: Clone {
    type Key: PartialEq + Clone + fmt::Display;

    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn key(&self) -> Self::Key;

    /// Soft-deleted records are kept but hidden from [`Store::list`].
    fn is_deleted(&self) -> bool {
        false
    }
}

/// A partial update shallow-merged over an existing record.
///
/// Fields left as `None` keep their current value.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

/// Collection of records of one kind.
#[derive(Debug, Clone)]
pub struct Store<T> {
    records: Vec<T>,
    next_id: RecordId,
}

impl<T: Record> Store<T> {
    /// Creates an empty store; the first allocated id is 1.
    pub fn new() -> Self {
        Store {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// The id the next created record will receive.
    ///
    /// Ids only ever grow, so an id freed by a delete is never handed out
    /// again.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    /// Number of records, including soft-deleted ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Live records in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &T> {
        self.records.iter().filter(|r| !r.is_deleted())
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.records.iter().find(|r| &r.key() == key)
    }

    fn position(&self, key: &T::Key) -> Result<usize> {
        self.records
            .iter()
            .position(|r| &r.key() == key)
            .ok_or_else(|| LedgerError::NotFound {
                kind: T::KIND,
                key: key.to_string(),
            })
    }

    fn ensure_unique(&self, key: &T::Key, skip: Option<usize>) -> Result<()> {
        let taken = self
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| Some(i) != skip && &r.key() == key);
        if taken {
            return Err(LedgerError::DuplicateKey {
                kind: T::KIND,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Creates a record under a freshly allocated id.
    pub fn create_with<F>(&mut self, build: F) -> &T
    where
        F: FnOnce(RecordId) -> T,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(build(id));
        debug!("Created {} {}", T::KIND, id);
        // Safety: a record was pushed on the line above
        self.records.last().expect("record just pushed")
    }

    /// Inserts a record keyed by a business field.
    ///
    /// Fails if another record already uses the same key.
    pub fn insert(&mut self, record: T) -> Result<&T> {
        self.ensure_unique(&record.key(), None)?;
        debug!("Created {} '{}'", T::KIND, record.key());
        self.records.push(record);
        // Safety: a record was pushed on the line above
        Ok(self.records.last().expect("record just pushed"))
    }

    /// Applies `change` to the record with `key`.
    ///
    /// The change runs on a copy and is only written back if it succeeds
    /// and does not collide with another record's key.
    pub fn update<F>(&mut self, key: &T::Key, change: F) -> Result<&T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let pos = self.position(key)?;
        let mut updated = self.records[pos].clone();
        change(&mut updated)?;

        let new_key = updated.key();
        if &new_key != key {
            self.ensure_unique(&new_key, Some(pos))?;
        }

        self.records[pos] = updated;
        debug!("Updated {} '{}'", T::KIND, new_key);
        Ok(&self.records[pos])
    }

    /// Applies `change` to every record at once.
    pub fn update_all<F>(&mut self, mut change: F)
    where
        F: FnMut(&mut T),
    {
        for record in &mut self.records {
            change(record);
        }
    }

    /// Removes the record with `key` and returns it.
    pub fn delete(&mut self, key: &T::Key) -> Result<T> {
        let pos = self.position(key)?;
        debug!("Deleted {} '{}'", T::KIND, key);
        Ok(self.records.remove(pos))
    }
}

impl<T: Record<Key = RecordId>> Store<T> {
    /// Appends a batch of records that already carry their ids.
    ///
    /// Ids are expected to start at [`Store::next_id`]; the counter moves
    /// past the batch.
    pub fn extend(&mut self, batch: Vec<T>) {
        if let Some(max) = batch.iter().map(|r| r.key()).max() {
            self.next_id = self.next_id.max(max + 1);
        }
        debug!("Appended {} {} record(s)", batch.len(), T::KIND);
        self.records.extend(batch);
    }
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: RecordId,
        label: String,
        hidden: bool,
    }

    impl Record for Item {
        type Key = RecordId;
        const KIND: &'static str = "Item";

        fn key(&self) -> RecordId {
            self.id
        }

        fn is_deleted(&self) -> bool {
            self.hidden
        }
    }

    #[derive(Debug, Clone)]
    struct Named(String);

    impl Record for Named {
        type Key = String;
        const KIND: &'static str = "Named";

        fn key(&self) -> String {
            self.0.clone()
        }
    }

    fn item(id: RecordId, label: &str) -> Item {
        Item {
            id,
            label: label.to_string(),
            hidden: false,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = Store::new();
        assert_eq!(store.create_with(|id| item(id, "a")).id, 1);
        assert_eq!(store.create_with(|id| item(id, "b")).id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));
        store.create_with(|id| item(id, "b"));
        store.delete(&2).unwrap();
        assert_eq!(store.create_with(|id| item(id, "c")).id, 3);
    }

    #[test]
    fn test_update_changes_in_place() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));
        store.create_with(|id| item(id, "b"));

        store
            .update(&1, |r| {
                r.label = "z".into();
                Ok(())
            })
            .unwrap();

        let labels: Vec<_> = store.list().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["z", "b"]);
    }

    #[test]
    fn test_failed_update_leaves_record_untouched() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));

        let result = store.update(&1, |r| {
            r.label = "changed".into();
            Err(LedgerError::InvalidCredentials)
        });

        assert!(result.is_err());
        assert_eq!(store.get(&1).unwrap().label, "a");
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let mut store: Store<Item> = Store::new();
        assert!(matches!(
            store.delete(&7),
            Err(LedgerError::NotFound { kind: "Item", .. })
        ));
        assert!(store.update(&7, |_| Ok(())).is_err());
    }

    #[test]
    fn test_insert_rejects_duplicate_natural_key() {
        let mut store = Store::new();
        store.insert(Named("Lux".into())).unwrap();
        assert!(matches!(
            store.insert(Named("Lux".into())),
            Err(LedgerError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_rename_onto_existing_key_is_rejected() {
        let mut store = Store::new();
        store.insert(Named("A".into())).unwrap();
        store.insert(Named("B".into())).unwrap();

        let result = store.update(&"B".to_string(), |r| {
            r.0 = "A".into();
            Ok(())
        });
        assert!(matches!(result, Err(LedgerError::DuplicateKey { .. })));

        store
            .update(&"B".to_string(), |r| {
                r.0 = "C".into();
                Ok(())
            })
            .unwrap();
        assert!(store.get(&"C".to_string()).is_some());
    }

    #[test]
    fn test_list_hides_soft_deleted() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));
        store.create_with(|id| Item {
            hidden: true,
            ..item(id, "b")
        });
        assert_eq!(store.list().count(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_extend_moves_counter_past_batch() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));
        let first = store.next_id();
        store.extend(vec![item(first, "b"), item(first + 1, "c")]);
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.create_with(|id| item(id, "d")).id, 4);
    }

    #[test]
    fn test_update_all() {
        let mut store = Store::new();
        store.create_with(|id| item(id, "a"));
        store.create_with(|id| item(id, "b"));
        store.update_all(|r| r.label.push('!'));
        let labels: Vec<_> = store.list().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec!["a!", "b!"]);
    }
}
