use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::enums::{AtomType, NoteFormat, SourceType};

/// Ease factor every new atom starts with
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Longest seed interval, reached by the easiest possible atom
pub const MAX_SEED_INTERVAL_DAYS: f64 = 30.0;

/// Timestamp layout used for every string-typed date in the tables
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

// Custom serde module so JSON dumps match the stored timestamp layout
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub username: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: String,
    /// Owning user; not enforced by the store
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub format: NoteFormat,
    pub tags: BTreeSet<String>,
    /// Seconds since the Unix epoch
    pub created_at: i64,
    pub updated_at: i64,
    pub is_archived: bool,
    pub source_type: SourceType,
    #[serde(default)]
    pub source_url: Option<String>,
    pub quality_score: f64,
    pub knowledge_density: f64,
    pub word_count: u32,
    pub atom_count: u32,
}

/// A single reviewable unit of knowledge derived from a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub atom_id: Uuid,
    pub user_id: String,
    pub note_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub atom_type: AtomType,
    pub importance_score: f64,
    pub difficulty_score: f64,
    /// Days between reviews
    pub current_interval: i64,
    pub ease_factor: f64,
    pub review_count: u32,
    #[serde(with = "datetime_format")]
    pub next_review_date: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub last_review_date: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub updated_at: DateTime<Utc>,
    pub tags: BTreeSet<String>,
}

impl Atom {
    /// Days until the first review for an atom of the given difficulty.
    ///
    /// `round((1 - difficulty) * 30) + 1`, so harder atoms come back sooner.
    pub fn due_days(difficulty: f64) -> i64 {
        ((1.0 - difficulty) * MAX_SEED_INTERVAL_DAYS).round() as i64 + 1
    }

    /// Review date derived from the difficulty, ignoring any override
    pub fn scheduled_review_date(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(Self::due_days(self.difficulty_score))
    }

    /// Whether the next review is strictly before `now`
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date < now
    }

    /// Whether the atom carries simulated review history
    pub fn has_been_reviewed(&self) -> bool {
        self.review_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSession {
    pub session_id: String,
    #[serde(with = "datetime_format")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub response_id: String,
    #[serde(with = "datetime_format")]
    pub timestamp: DateTime<Utc>,
}
