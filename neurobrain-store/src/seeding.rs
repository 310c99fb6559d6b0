//! End-to-end seeding runs: verify tables, generate, write, report.

use chrono::Utc;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::SeedError;
use crate::gateway::{verify_tables, BatchReport, PersistenceGateway};
use crate::generator::RecordGenerator;
use crate::store::KeyValueStore;

/// Per-table results of a seeding run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub batches: Vec<BatchReport>,
}

impl SeedReport {
    pub fn batch(&self, table: &str) -> Option<&BatchReport> {
        self.batches.iter().find(|b| b.table == table)
    }

    pub fn is_complete(&self) -> bool {
        self.batches.iter().all(BatchReport::is_complete)
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for batch in &self.batches {
            writeln!(f, "- {}", batch)?;
        }
        if !self.is_complete() {
            write!(f, "Some items failed to be added. Please check the error messages above.")?;
        }
        Ok(())
    }
}

pub struct Seeder {
    store: Arc<dyn KeyValueStore>,
    gateway: PersistenceGateway,
    settings: Settings,
}

impl Seeder {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: Settings) -> Self {
        let gateway = PersistenceGateway::new(store.clone())
            .with_throttle_delay(settings.seed.throttle_delay())
            .with_progress_every(settings.seed.progress_every);
        Self {
            store,
            gateway,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Users, then their notes, then atoms linked to those notes.
    ///
    /// Aborts before writing anything if a table is missing or not active.
    pub async fn seed_dataset<R: Rng>(&self, rng: R) -> Result<SeedReport, SeedError> {
        let tables = &self.settings.tables;
        let seed = &self.settings.seed;

        verify_tables(self.store.as_ref(), &tables.dataset()).await?;

        let mut generator = RecordGenerator::new(rng, Utc::now());

        tracing::info!("Generating {} users...", seed.users);
        let users = generator.users(seed.users);

        tracing::info!("Generating {} notes...", users.len() * seed.notes_per_user);
        let notes = generator.notes(&users, seed.notes_per_user);

        tracing::info!("Generating {} atoms...", users.len() * seed.atoms_per_user);
        let atoms = generator.atoms(&users, &notes, seed.atoms_per_user);
        tracing::info!(
            "Generated {} users, {} notes, {} atoms",
            users.len(),
            notes.len(),
            atoms.len()
        );

        let report = SeedReport {
            batches: vec![
                self.gateway.write_all(&tables.users, &users).await,
                self.gateway.write_all(&tables.notes, &notes).await,
                self.gateway.write_all(&tables.atoms, &atoms).await,
            ],
        };

        tracing::info!("Sample data generation completed");
        Ok(report)
    }

    /// Atoms for the configured standalone user, with placeholder note links
    pub async fn seed_standalone_atoms<R: Rng>(&self, rng: R) -> Result<SeedReport, SeedError> {
        let seed = &self.settings.seed;
        let table = &self.settings.tables.atoms;

        verify_tables(self.store.as_ref(), &[table.as_str()]).await?;

        tracing::info!("Generating {} sample atoms...", seed.standalone_atoms);
        let mut generator = RecordGenerator::new(rng, Utc::now());
        let atoms = generator.standalone_atoms(&seed.standalone_user_id, seed.standalone_atoms);

        Ok(SeedReport {
            batches: vec![self.gateway.write_all(table, &atoms).await],
        })
    }

    /// The fixed review session and review response records
    pub async fn seed_review_fixtures(&self) -> SeedReport {
        let tables = &self.settings.tables;
        let (session, response) = RecordGenerator::new(rand::thread_rng(), Utc::now()).review_fixtures();

        let report = SeedReport {
            batches: vec![
                self.gateway.write_all(&tables.review_sessions, &[session]).await,
                self.gateway.write_all(&tables.review_responses, &[response]).await,
            ],
        };
        tracing::info!("Sample review data initialization completed");
        report
    }
}
