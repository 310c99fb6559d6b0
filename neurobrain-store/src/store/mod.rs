mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::item::Item;

/// Status a table must report before seeding writes to it
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Key-value store the seed and inspection tools talk to
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write a single item, replacing any item with the same key
    async fn put_item(&self, table: &str, item: Item) -> StoreResult<PutOutput>;

    /// Read items from a table
    async fn scan(&self, table: &str, request: ScanRequest) -> StoreResult<ScanOutput>;

    /// Describe a table's schema and status
    async fn describe_table(&self, table: &str) -> StoreResult<TableDescription>;

    /// Names of every table visible to the caller
    async fn list_tables(&self) -> StoreResult<Vec<String>>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOutput {
    /// Capacity units consumed, when the store reports them
    pub consumed_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanFilter {
    /// String attribute starts with the prefix
    BeginsWith { attribute: String, prefix: String },
}

impl ScanFilter {
    pub fn begins_with(attribute: impl Into<String>, prefix: impl Into<String>) -> Self {
        ScanFilter::BeginsWith {
            attribute: attribute.into(),
            prefix: prefix.into(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ScanFilter::BeginsWith { attribute, prefix } => item
                .get(attribute)
                .and_then(|value| value.as_str())
                .map(|value| value.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRequest {
    pub filter: Option<ScanFilter>,
    /// Maximum number of items to evaluate
    pub limit: Option<i32>,
    /// Return only the count, no items
    pub count_only: bool,
}

impl ScanRequest {
    pub fn limit(limit: i32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn count() -> Self {
        Self {
            count_only: true,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: ScanFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    pub items: Vec<Item>,
    pub count: usize,
    pub consumed_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyElement {
    pub attribute_name: String,
    /// HASH or RANGE
    pub key_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub attribute_name: String,
    /// S, N or B
    pub attribute_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescription {
    pub index_name: String,
    pub key_schema: Vec<KeyElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDescription {
    pub name: String,
    pub status: String,
    pub item_count: Option<i64>,
    pub creation_date: Option<DateTime<Utc>>,
    pub key_schema: Vec<KeyElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub global_secondary_indexes: Vec<IndexDescription>,
    pub local_secondary_indexes: Vec<IndexDescription>,
}

impl TableDescription {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }

    /// Attribute holding the partition key
    pub fn hash_key(&self) -> Option<&str> {
        self.key_schema
            .iter()
            .find(|key| key.key_type == "HASH")
            .map(|key| key.attribute_name.as_str())
    }
}
