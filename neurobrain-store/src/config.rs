use config::{Config, ConfigBuilder, ConfigError, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Aws {
    pub region: String,
    /// Custom endpoint, e.g. a local DynamoDB
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Named credentials profile; the default provider chain is used otherwise
    #[serde(default)]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tables {
    pub users: String,
    pub notes: String,
    pub atoms: String,
    pub review_sessions: String,
    pub review_responses: String,
}

impl Tables {
    /// Tables the dataset seeder writes to, in write order
    pub fn dataset(&self) -> [&str; 3] {
        [&self.users, &self.notes, &self.atoms]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
    pub users: usize,
    pub notes_per_user: usize,
    pub atoms_per_user: usize,
    pub standalone_user_id: String,
    pub standalone_atoms: usize,
    /// Fixed seed for reproducible datasets
    #[serde(default)]
    pub rng_seed: Option<u64>,
    pub throttle_delay_ms: u64,
    pub progress_every: usize,
}

impl Seed {
    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Inspect {
    pub sample_limit: i32,
    pub note_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub aws: Aws,
    pub tables: Tables,
    pub seed: Seed,
    pub inspect: Inspect,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // 1. Try to load from settings.toml (optional)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in neurobrain-seed directory (for development)
        let dev_path = PathBuf::from("neurobrain-seed").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        // 2. Override with environment variables (highest priority)
        // AWS_REGION wins over the older AWS_DEFAULT_REGION
        if let Ok(region) = std::env::var("AWS_DEFAULT_REGION") {
            builder = builder.set_override("aws.region", region)?;
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            builder = builder.set_override("aws.region", region)?;
        }
        if let Ok(endpoint) = std::env::var("DYNAMODB_ENDPOINT") {
            builder = builder.set_override("aws.endpoint_url", endpoint)?;
        }
        if let Ok(profile) = std::env::var("AWS_PROFILE") {
            builder = builder.set_override("aws.profile", profile)?;
        }
        if let Ok(seed) = std::env::var("NEUROBRAIN_SEED") {
            builder = builder.set_override("seed.rng_seed", seed)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Built-in defaults only, ignoring files and the environment
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("aws.region", "ap-southeast-1")?
            .set_default("tables.users", "User")?
            .set_default("tables.notes", "Notes")?
            .set_default("tables.atoms", "Atoms")?
            .set_default("tables.review_sessions", "ReviewSessions")?
            .set_default("tables.review_responses", "ReviewResponses")?
            .set_default("seed.users", 20)?
            .set_default("seed.notes_per_user", 1)?
            .set_default("seed.atoms_per_user", 1)?
            .set_default("seed.standalone_user_id", "sample-user-1")?
            .set_default("seed.standalone_atoms", 10)?
            .set_default("seed.throttle_delay_ms", 1000)?
            .set_default("seed.progress_every", 10)?
            .set_default("inspect.sample_limit", 5)?
            .set_default("inspect.note_prefix", "note-user-")
    }
}
