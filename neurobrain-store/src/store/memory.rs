use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    AttributeDefinition, KeyElement, KeyValueStore, PutOutput, ScanOutput, ScanRequest,
    TableDescription, ACTIVE_STATUS,
};
use crate::error::{StoreError, StoreResult};
use crate::item::Item;

#[derive(Debug)]
struct MemoryTable {
    key_attribute: String,
    status: String,
    created_at: DateTime<Utc>,
    // Keyed by primary key value, so a second put replaces the first
    items: BTreeMap<String, Item>,
    // Primary key value -> error returned instead of writing
    rejections: HashMap<String, StoreError>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: BTreeMap<String, MemoryTable>,
    put_attempts: usize,
}

/// In-process store for tests and dry runs.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::create_table`]
    pub fn with_table(self, name: &str, key_attribute: &str) -> Self {
        self.create_table(name, key_attribute);
        self
    }

    /// Create an empty, active table keyed on `key_attribute`
    pub fn create_table(&self, name: &str, key_attribute: &str) {
        self.lock().tables.insert(
            name.to_string(),
            MemoryTable {
                key_attribute: key_attribute.to_string(),
                status: ACTIVE_STATUS.to_string(),
                created_at: Utc::now(),
                items: BTreeMap::new(),
                rejections: HashMap::new(),
            },
        );
    }

    pub fn drop_table(&self, name: &str) {
        self.lock().tables.remove(name);
    }

    /// Override the status `describe_table` reports, e.g. `CREATING`
    pub fn set_status(&self, table: &str, status: &str) {
        if let Some(t) = self.lock().tables.get_mut(table) {
            t.status = status.to_string();
        }
    }

    /// Make every put of the item with this key fail with `error`
    pub fn reject_key(&self, table: &str, key: &str, error: StoreError) {
        if let Some(t) = self.lock().tables.get_mut(table) {
            t.rejections.insert(key.to_string(), error);
        }
    }

    /// Snapshot of a table's items in key order
    pub fn items(&self, table: &str) -> Vec<Item> {
        self.lock()
            .tables
            .get(table)
            .map(|t| t.items.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of put_item calls seen, successful or not
    pub fn put_attempts(&self) -> usize {
        self.lock().put_attempts
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread must not wedge the other assertions
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn not_found(table: &str) -> StoreError {
    StoreError::TableNotFound(format!("Requested resource not found: Table: {} not found", table))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put_item(&self, table: &str, item: Item) -> StoreResult<PutOutput> {
        let mut state = self.lock();
        state.put_attempts += 1;

        let t = state.tables.get_mut(table).ok_or_else(|| not_found(table))?;
        let key = item
            .get(&t.key_attribute)
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| StoreError::Service {
                code: "ValidationException".to_string(),
                message: format!("Missing the key {} in the item", t.key_attribute),
            })?;

        if let Some(error) = t.rejections.get(&key) {
            return Err(error.clone());
        }

        t.items.insert(key, item);
        Ok(PutOutput {
            consumed_capacity: Some(1.0),
        })
    }

    async fn scan(&self, table: &str, request: ScanRequest) -> StoreResult<ScanOutput> {
        let state = self.lock();
        let t = state.tables.get(table).ok_or_else(|| not_found(table))?;

        // Like DynamoDB, the limit caps items evaluated before the filter runs
        let evaluated = match request.limit {
            Some(limit) => limit.max(0) as usize,
            None => t.items.len(),
        };
        let matched: Vec<Item> = t
            .items
            .values()
            .take(evaluated)
            .filter(|item| request.filter.as_ref().map_or(true, |f| f.matches(item)))
            .cloned()
            .collect();

        let count = matched.len();
        Ok(ScanOutput {
            items: if request.count_only { Vec::new() } else { matched },
            count,
            consumed_capacity: Some(0.5),
        })
    }

    async fn describe_table(&self, table: &str) -> StoreResult<TableDescription> {
        let state = self.lock();
        let t = state.tables.get(table).ok_or_else(|| not_found(table))?;

        Ok(TableDescription {
            name: table.to_string(),
            status: t.status.clone(),
            item_count: Some(t.items.len() as i64),
            creation_date: Some(t.created_at),
            key_schema: vec![KeyElement {
                attribute_name: t.key_attribute.clone(),
                key_type: "HASH".to_string(),
            }],
            attribute_definitions: vec![AttributeDefinition {
                attribute_name: t.key_attribute.clone(),
                attribute_type: "S".to_string(),
            }],
            global_secondary_indexes: Vec::new(),
            local_secondary_indexes: Vec::new(),
        })
    }

    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock().tables.keys().cloned().collect())
    }
}
