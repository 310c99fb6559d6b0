//! Read-only helpers for checking what a seeding run left behind.

use std::fmt;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::item::{note_attrs, Item};
use crate::store::{IndexDescription, KeyValueStore, ScanFilter, ScanOutput, ScanRequest, TableDescription};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone)]
pub struct TableInspector {
    store: Arc<dyn KeyValueStore>,
}

impl TableInspector {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn describe(&self, table: &str) -> StoreResult<TableDescription> {
        self.store.describe_table(table).await
    }

    /// Describe every table, keeping per-table failures next to the name
    pub async fn list_all(&self) -> StoreResult<Vec<(String, StoreResult<TableDescription>)>> {
        let names = self.store.list_tables().await?;
        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let description = self.store.describe_table(&name).await;
            if let Err(e) = &description {
                tracing::warn!("Could not describe table {}: {}", name, e);
            }
            tables.push((name, description));
        }
        Ok(tables)
    }

    /// First `limit` rows of a table
    pub async fn sample(&self, table: &str, limit: i32) -> StoreResult<ScanOutput> {
        self.store.scan(table, ScanRequest::limit(limit)).await
    }

    /// Number of rows, via a count-only scan
    pub async fn count(&self, table: &str) -> StoreResult<usize> {
        Ok(self.store.scan(table, ScanRequest::count()).await?.count)
    }

    /// Rows whose string `attribute` starts with `prefix`, evaluating at most
    /// `limit` rows
    pub async fn find_by_prefix(
        &self,
        table: &str,
        attribute: &str,
        prefix: &str,
        limit: i32,
    ) -> StoreResult<Vec<Item>> {
        let request = ScanRequest::limit(limit).with_filter(ScanFilter::begins_with(attribute, prefix));
        Ok(self.store.scan(table, request).await?.items)
    }
}

/// Human-readable rendering of a table description
pub struct TableReport<'a>(pub &'a TableDescription);

fn write_indexes(f: &mut fmt::Formatter<'_>, title: &str, indexes: &[IndexDescription]) -> fmt::Result {
    if indexes.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{}:", title)?;
    for index in indexes {
        writeln!(f, "  {}:", index.index_name)?;
        for key in &index.key_schema {
            writeln!(f, "    {} ({})", key.attribute_name, key.key_type)?;
        }
    }
    Ok(())
}

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        writeln!(f, "Status: {}", table.status)?;
        match table.item_count {
            Some(count) => writeln!(f, "Item Count: {}", count)?,
            None => writeln!(f, "Item Count: {}", NOT_AVAILABLE)?,
        }
        match table.creation_date {
            Some(date) => writeln!(f, "Creation Date: {}", date.to_rfc3339())?,
            None => writeln!(f, "Creation Date: {}", NOT_AVAILABLE)?,
        }

        writeln!(f)?;
        writeln!(f, "Key Schema:")?;
        for key in &table.key_schema {
            writeln!(f, "  {} ({})", key.attribute_name, key.key_type)?;
        }

        writeln!(f)?;
        writeln!(f, "Attribute Definitions:")?;
        for attr in &table.attribute_definitions {
            writeln!(f, "  {} ({})", attr.attribute_name, attr.attribute_type)?;
        }

        write_indexes(f, "Global Secondary Indexes", &table.global_secondary_indexes)?;
        write_indexes(f, "Local Secondary Indexes", &table.local_secondary_indexes)
    }
}

/// The handful of Note fields worth eyeballing after a seed run
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSummary {
    pub note_id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
    pub format: String,
    pub tags: Vec<String>,
}

impl NoteSummary {
    pub fn from_item(item: &Item) -> Self {
        let text = |name: &str| {
            item.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        Self {
            note_id: text(note_attrs::NOTE_ID),
            user_id: text(note_attrs::USER_ID),
            title: text(note_attrs::TITLE),
            created_at: item
                .get(note_attrs::CREATED_AT)
                .and_then(|v| v.as_number())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            format: text(note_attrs::FORMAT),
            tags: item
                .get(note_attrs::TAGS)
                .and_then(|v| v.as_string_set())
                .map(|tags| tags.to_vec())
                .unwrap_or_else(|| vec![NOT_AVAILABLE.to_string()]),
        }
    }
}

impl fmt::Display for NoteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  NoteId: {}", self.note_id)?;
        writeln!(f, "  UserId: {}", self.user_id)?;
        writeln!(f, "  Title: {}", self.title)?;
        writeln!(f, "  CreatedAt: {}", self.created_at)?;
        writeln!(f, "  Format: {}", self.format)?;
        write!(f, "  Tags: {}", self.tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::AttrValue;
    use crate::error::StoreError;
    use crate::store::{KeyElement, MemoryStore, PutOutput};

    fn note_item(id: &str, title: &str) -> Item {
        let mut item = Item::new();
        item.insert("NoteId".to_string(), AttrValue::string(id));
        item.insert("Title".to_string(), AttrValue::string(title));
        item
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new().with_table("Notes", "NoteId");
        for (id, title) in [("note-user-001-000", "One"), ("note-user-002-000", "Two"), ("manual-1", "Three")] {
            store.put_item("Notes", note_item(id, title)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_count_and_sample() {
        let store = seeded_store().await;
        let inspector = TableInspector::new(Arc::new(store));

        assert_eq!(inspector.count("Notes").await.unwrap(), 3);
        let sample = inspector.sample("Notes", 2).await.unwrap();
        assert_eq!(sample.items.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_prefix() {
        let store = seeded_store().await;
        let inspector = TableInspector::new(Arc::new(store));

        let found = inspector
            .find_by_prefix("Notes", "NoteId", "note-user-", 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|item| item["NoteId"].as_str().unwrap().starts_with("note-user-")));
    }

    #[tokio::test]
    async fn test_list_all_keeps_going() {
        let store = MemoryStore::new().with_table("Atoms", "atom_id").with_table("Notes", "NoteId");
        let inspector = TableInspector::new(Arc::new(store));

        let tables = inspector.list_all().await.unwrap();
        assert_eq!(tables.len(), 2);
        assert!(tables.iter().all(|(_, d)| d.is_ok()));
    }

    /// Lists a table that vanishes before it can be described
    struct StaleListing {
        inner: MemoryStore,
        stale: &'static str,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for StaleListing {
        async fn put_item(&self, table: &str, item: Item) -> StoreResult<PutOutput> {
            self.inner.put_item(table, item).await
        }

        async fn scan(&self, table: &str, request: ScanRequest) -> StoreResult<ScanOutput> {
            self.inner.scan(table, request).await
        }

        async fn describe_table(&self, table: &str) -> StoreResult<TableDescription> {
            self.inner.describe_table(table).await
        }

        async fn list_tables(&self) -> StoreResult<Vec<String>> {
            let mut names = self.inner.list_tables().await?;
            names.insert(1, self.stale.to_string());
            Ok(names)
        }
    }

    #[tokio::test]
    async fn test_list_all_keeps_describe_failures() {
        let store = StaleListing {
            inner: MemoryStore::new().with_table("Atoms", "atom_id").with_table("Notes", "NoteId"),
            stale: "Dropped",
        };
        let inspector = TableInspector::new(Arc::new(store));

        let tables = inspector.list_all().await.unwrap();

        let names: Vec<&str> = tables.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Atoms", "Dropped", "Notes"]);
        assert_eq!(tables[0].1.as_ref().unwrap().name, "Atoms");
        assert!(matches!(tables[1].1, Err(StoreError::TableNotFound(_))));
        assert_eq!(tables[2].1.as_ref().unwrap().name, "Notes");
    }

    #[tokio::test]
    async fn test_describe_missing_table() {
        let inspector = TableInspector::new(Arc::new(MemoryStore::new()));
        assert!(inspector.describe("Notes").await.is_err());
    }

    #[test]
    fn test_table_report_rendering() {
        let description = TableDescription {
            name: "Notes".to_string(),
            status: "ACTIVE".to_string(),
            item_count: None,
            creation_date: None,
            key_schema: vec![KeyElement {
                attribute_name: "NoteId".to_string(),
                key_type: "HASH".to_string(),
            }],
            attribute_definitions: vec![],
            global_secondary_indexes: vec![IndexDescription {
                index_name: "UserIdIndex".to_string(),
                key_schema: vec![KeyElement {
                    attribute_name: "UserId".to_string(),
                    key_type: "HASH".to_string(),
                }],
            }],
            local_secondary_indexes: vec![],
        };

        let text = TableReport(&description).to_string();
        assert!(text.contains("Item Count: N/A"));
        assert!(text.contains("  NoteId (HASH)"));
        assert!(text.contains("Global Secondary Indexes:\n  UserIdIndex:\n    UserId (HASH)"));
        assert!(!text.contains("Local Secondary Indexes"));
    }

    #[test]
    fn test_note_summary_fills_missing_fields() {
        let summary = NoteSummary::from_item(&note_item("note-1", "Title"));
        assert_eq!(summary.note_id, "note-1");
        assert_eq!(summary.created_at, "N/A");
        assert_eq!(summary.tags, vec!["N/A".to_string()]);
        assert!(summary.to_string().contains("  Title: Title"));
    }
}
