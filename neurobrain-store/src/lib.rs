// Library exports for neurobrain-store
// The seed binaries and the integration tests use these modules

pub mod config;
pub mod error;
pub mod gateway;
pub mod generator;
pub mod inspector;
pub mod item;
pub mod logging;
pub mod lorem;
pub mod seeding;
pub mod store;

pub use config::Settings;
pub use error::{SeedError, StoreError, StoreResult};
pub use gateway::{BatchReport, PersistenceGateway, RecordOutcome, WriteStatus};
pub use generator::RecordGenerator;
pub use inspector::TableInspector;
pub use item::{AttrValue, Item, Record};
pub use seeding::{SeedReport, Seeder};
pub use store::{DynamoStore, KeyValueStore, MemoryStore};
