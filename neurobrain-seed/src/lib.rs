//! Shared setup for the seeding and inspection binaries.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use neurobrain_store::config::Tables;
use neurobrain_store::{DynamoStore, KeyValueStore, MemoryStore, Record, Settings};
use neurobrain_types::{Atom, Note, ReviewResponse, ReviewSession, User};

/// Empty in-memory copies of every configured table
pub fn dry_run_store(tables: &Tables) -> MemoryStore {
    MemoryStore::new()
        .with_table(&tables.users, User::KEY_ATTRIBUTE)
        .with_table(&tables.notes, Note::KEY_ATTRIBUTE)
        .with_table(&tables.atoms, Atom::KEY_ATTRIBUTE)
        .with_table(&tables.review_sessions, ReviewSession::KEY_ATTRIBUTE)
        .with_table(&tables.review_responses, ReviewResponse::KEY_ATTRIBUTE)
}

/// DynamoDB client from settings, or an in-memory store for `--dry-run`
pub async fn open_store(settings: &Settings, dry_run: bool) -> Arc<dyn KeyValueStore> {
    if dry_run {
        tracing::info!("Dry run: writing to an in-memory store");
        return Arc::new(dry_run_store(&settings.tables));
    }
    tracing::info!(
        "Using region {} ({})",
        settings.aws.region,
        settings.aws.endpoint_url.as_deref().unwrap_or("default endpoint")
    );
    Arc::new(DynamoStore::connect(&settings.aws).await)
}

/// Seeded generator when a seed is given, entropy otherwise
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::info!("Using random seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Table, id prefix and row limit an inspection tool works on
#[derive(Debug, Clone, PartialEq)]
pub struct InspectTarget {
    pub table: String,
    pub prefix: String,
    pub limit: i32,
}

impl InspectTarget {
    /// Command-line values win; anything unset falls back to the settings
    pub fn resolve(
        settings: &Settings,
        table: Option<String>,
        prefix: Option<String>,
        limit: Option<i32>,
    ) -> Self {
        Self {
            table: table.unwrap_or_else(|| settings.tables.notes.clone()),
            prefix: prefix.unwrap_or_else(|| settings.inspect.note_prefix.clone()),
            limit: limit.unwrap_or(settings.inspect.sample_limit),
        }
    }
}

/// Load settings and install logging; the common first step of every tool
pub fn bootstrap() -> Result<Settings> {
    neurobrain_store::logging::init();
    Settings::new().context("Failed to load settings")
}
