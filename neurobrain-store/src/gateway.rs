//! Best-effort sequential writes with an explicit outcome per record.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{SeedError, StoreError};
use crate::item::{item_to_json, Record};
use crate::store::KeyValueStore;

/// What happened to one record of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteStatus {
    Written { capacity_units: Option<f64> },
    Failed(StoreError),
    /// Not attempted because the table disappeared mid-batch
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub key: String,
    pub status: WriteStatus,
}

impl RecordOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self.status, WriteStatus::Written { .. })
    }
}

/// Result of writing one batch to one table
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub table: String,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            outcomes: Vec::new(),
        }
    }

    /// Records handed to the gateway
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Records a write was actually sent for
    pub fn attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status != WriteStatus::Skipped)
            .count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &StoreError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            WriteStatus::Failed(err) => Some((o.key.as_str(), err)),
            _ => None,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded() == self.total()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully added {} out of {} items to the {} table",
            self.succeeded(),
            self.total(),
            self.table
        )?;
        let skipped = self.total() - self.attempted();
        if skipped > 0 {
            write!(f, " ({} skipped)", skipped)?;
        }
        Ok(())
    }
}

/// Writes records one at a time, logging and recording failures without
/// aborting the batch
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
    throttle_delay: Duration,
    progress_every: usize,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            throttle_delay: Duration::from_secs(1),
            progress_every: 10,
        }
    }

    /// Pause after a throughput-exceeded error; the record is not retried
    pub fn with_throttle_delay(mut self, delay: Duration) -> Self {
        self.throttle_delay = delay;
        self
    }

    /// Log progress every `every` successful writes (0 disables)
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub async fn write_all<R: Record>(&self, table: &str, records: &[R]) -> BatchReport {
        tracing::info!("Adding {} items to table '{}'...", records.len(), table);

        let mut report = BatchReport::new(table);
        let mut table_missing = false;
        let mut written = 0;

        for (i, record) in records.iter().enumerate() {
            let key = record.key();
            if table_missing {
                report.outcomes.push(RecordOutcome {
                    key,
                    status: WriteStatus::Skipped,
                });
                continue;
            }

            tracing::debug!("Adding item {}/{}: {}", i + 1, records.len(), key);
            let status = match self.store.put_item(table, record.to_item()).await {
                Ok(output) => {
                    match output.consumed_capacity {
                        Some(units) => tracing::debug!("  Consumed capacity: {} units", units),
                        None => tracing::debug!("  Consumed capacity: N/A"),
                    }
                    WriteStatus::Written {
                        capacity_units: output.consumed_capacity,
                    }
                }
                Err(err) => {
                    self.log_failure(table, &key, &err, &item_to_json(&record.to_item()));
                    match &err {
                        StoreError::ThroughputExceeded { .. } => {
                            tokio::time::sleep(self.throttle_delay).await;
                        }
                        StoreError::TableNotFound(_) => table_missing = true,
                        _ => {}
                    }
                    WriteStatus::Failed(err)
                }
            };

            let outcome = RecordOutcome { key, status };
            if outcome.is_written() {
                written += 1;
                if self.progress_every > 0 && written % self.progress_every == 0 {
                    tracing::info!("Added {} items to '{}' so far...", written, table);
                }
            }
            report.outcomes.push(outcome);
        }

        tracing::info!("{}", report);
        report
    }

    fn log_failure(&self, table: &str, key: &str, err: &StoreError, dump: &str) {
        match err {
            StoreError::ConditionalCheckFailed(_) => {
                tracing::warn!("Conditional check failed for {}: {}", key, err);
            }
            StoreError::ThroughputExceeded { .. } => {
                tracing::warn!(
                    "Provisioned throughput exceeded for {}: {} (pausing {:?})",
                    key,
                    err,
                    self.throttle_delay
                );
            }
            StoreError::TableNotFound(_) => {
                tracing::error!("Table {} not found: {}; skipping remaining items", table, err);
            }
            _ => {
                tracing::error!("Error adding {}: {}", key, err);
                if let Some(code) = err.code() {
                    tracing::error!("  Error code: {}", code);
                }
                tracing::error!("  Item that caused the error:\n{}", dump);
            }
        }
    }
}

/// Check that every table exists and is ACTIVE before anything is written
pub async fn verify_tables(store: &dyn KeyValueStore, tables: &[&str]) -> Result<(), SeedError> {
    tracing::info!("Checking available tables...");
    let available = store.list_tables().await?;
    tracing::info!("Found {} tables:", available.len());
    for table in &available {
        tracing::info!("- {}", table);
    }

    let missing: Vec<String> = tables
        .iter()
        .filter(|t| !available.iter().any(|a| a == *t))
        .map(|t| t.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SeedError::MissingTables(missing));
    }

    tracing::info!("Verifying table status...");
    for table in tables {
        let description = store.describe_table(table).await?;
        if !description.is_active() {
            return Err(SeedError::InactiveTable {
                table: table.to_string(),
                status: description.status,
            });
        }
        tracing::info!("- {} is active", table);
    }

    Ok(())
}
