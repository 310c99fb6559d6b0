//! Attribute-value encoding at the store boundary.
//!
//! Records travel to the store as [`Item`]s: maps from attribute name to a
//! single-key typed wrapper such as `{"S": "text"}` or `{"SS": ["a", "b"]}`.
//! Nothing outside this module and the store backends looks at [`AttrValue`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use neurobrain_types::{format_timestamp, Atom, Note, ReviewResponse, ReviewSession, User};

/// A typed attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    #[serde(rename = "S")]
    S(String),
    /// Numbers travel as their decimal string
    #[serde(rename = "N")]
    N(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "SS")]
    Ss(Vec<String>),
}

impl AttrValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttrValue::S(value.into())
    }

    pub fn number(value: impl ToString) -> Self {
        AttrValue::N(value.to_string())
    }

    pub fn string_set(values: &BTreeSet<String>) -> Self {
        AttrValue::Ss(values.iter().cloned().collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&str> {
        match self {
            AttrValue::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string_set(&self) -> Option<&[String]> {
        match self {
            AttrValue::Ss(values) => Some(values),
            _ => None,
        }
    }

    /// Short type tag, as used in attribute definitions
    pub fn type_tag(&self) -> &'static str {
        match self {
            AttrValue::S(_) => "S",
            AttrValue::N(_) => "N",
            AttrValue::Bool(_) => "BOOL",
            AttrValue::Ss(_) => "SS",
        }
    }
}

pub type Item = BTreeMap<String, AttrValue>;

/// Pretty JSON dump of an item in its wire shape
pub fn item_to_json(item: &Item) -> String {
    serde_json::to_string_pretty(item).unwrap_or_else(|e| format!("<unprintable item: {}>", e))
}

/// A record that can be written to a table
pub trait Record {
    /// Attribute holding the primary key
    const KEY_ATTRIBUTE: &'static str;

    /// Primary key value, used in logs and outcome reports
    fn key(&self) -> String;

    fn to_item(&self) -> Item;
}

// The User and Notes tables were created with PascalCase attribute names,
// the Atoms table with snake_case ones.

pub mod user_attrs {
    pub const USER_ID: &str = "UserId";
    pub const EMAIL: &str = "Email";
    pub const USERNAME: &str = "Username";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const IS_ACTIVE: &str = "IsActive";
    pub const IMAGE: &str = "Image";
}

pub mod note_attrs {
    pub const NOTE_ID: &str = "NoteId";
    pub const USER_ID: &str = "UserId";
    pub const TITLE: &str = "Title";
    pub const CONTENT: &str = "Content";
    pub const FORMAT: &str = "Format";
    pub const TAGS: &str = "Tags";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const UPDATED_AT: &str = "UpdatedAt";
    pub const IS_ARCHIVED: &str = "IsArchived";
    pub const SOURCE_TYPE: &str = "SourceType";
    pub const SOURCE_URL: &str = "SourceUrl";
    pub const QUALITY_SCORE: &str = "QualityScore";
    pub const KNOWLEDGE_DENSITY: &str = "KnowledgeDensity";
    pub const WORD_COUNT: &str = "WordCount";
    pub const ATOM_COUNT: &str = "AtomCount";
}

pub mod atom_attrs {
    pub const ATOM_ID: &str = "atom_id";
    pub const USER_ID: &str = "user_id";
    pub const NOTE_ID: &str = "note_id";
    pub const CONTENT: &str = "content";
    pub const TYPE: &str = "type";
    pub const IMPORTANCE_SCORE: &str = "importance_score";
    pub const DIFFICULTY_SCORE: &str = "difficulty_score";
    pub const CURRENT_INTERVAL: &str = "current_interval";
    pub const EASE_FACTOR: &str = "ease_factor";
    pub const REVIEW_COUNT: &str = "review_count";
    pub const NEXT_REVIEW_DATE: &str = "next_review_date";
    pub const LAST_REVIEW_DATE: &str = "last_review_date";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const TAGS: &str = "tags";
}

fn put(item: &mut Item, name: &str, value: AttrValue) {
    item.insert(name.to_string(), value);
}

impl Record for User {
    const KEY_ATTRIBUTE: &'static str = user_attrs::USER_ID;

    fn key(&self) -> String {
        self.user_id.clone()
    }

    fn to_item(&self) -> Item {
        use user_attrs::*;
        let mut item = Item::new();
        put(&mut item, USER_ID, AttrValue::string(&self.user_id));
        put(&mut item, EMAIL, AttrValue::string(&self.email));
        put(&mut item, USERNAME, AttrValue::string(&self.username));
        put(&mut item, CREATED_AT, AttrValue::string(format_timestamp(&self.created_at)));
        put(&mut item, IS_ACTIVE, AttrValue::Bool(self.is_active));
        put(&mut item, IMAGE, AttrValue::string(&self.image_url));
        item
    }
}

impl Record for Note {
    const KEY_ATTRIBUTE: &'static str = note_attrs::NOTE_ID;

    fn key(&self) -> String {
        self.note_id.clone()
    }

    fn to_item(&self) -> Item {
        use note_attrs::*;
        let mut item = Item::new();
        put(&mut item, NOTE_ID, AttrValue::string(&self.note_id));
        put(&mut item, USER_ID, AttrValue::string(&self.user_id));
        put(&mut item, TITLE, AttrValue::string(&self.title));
        put(&mut item, CONTENT, AttrValue::string(&self.content));
        put(&mut item, FORMAT, AttrValue::string(self.format.as_str()));
        put(&mut item, TAGS, AttrValue::string_set(&self.tags));
        put(&mut item, CREATED_AT, AttrValue::number(self.created_at));
        put(&mut item, UPDATED_AT, AttrValue::number(self.updated_at));
        put(&mut item, IS_ARCHIVED, AttrValue::Bool(self.is_archived));
        put(&mut item, SOURCE_TYPE, AttrValue::string(self.source_type.as_str()));
        if let Some(url) = &self.source_url {
            put(&mut item, SOURCE_URL, AttrValue::string(url));
        }
        put(&mut item, QUALITY_SCORE, AttrValue::number(self.quality_score));
        put(&mut item, KNOWLEDGE_DENSITY, AttrValue::number(self.knowledge_density));
        put(&mut item, WORD_COUNT, AttrValue::number(self.word_count));
        put(&mut item, ATOM_COUNT, AttrValue::number(self.atom_count));
        item
    }
}

impl Record for Atom {
    const KEY_ATTRIBUTE: &'static str = atom_attrs::ATOM_ID;

    fn key(&self) -> String {
        self.atom_id.to_string()
    }

    fn to_item(&self) -> Item {
        use atom_attrs::*;
        let mut item = Item::new();
        put(&mut item, ATOM_ID, AttrValue::string(self.atom_id.to_string()));
        put(&mut item, USER_ID, AttrValue::string(&self.user_id));
        put(&mut item, NOTE_ID, AttrValue::string(&self.note_id));
        put(&mut item, CONTENT, AttrValue::string(&self.content));
        put(&mut item, TYPE, AttrValue::string(self.atom_type.as_str()));
        put(&mut item, IMPORTANCE_SCORE, AttrValue::number(self.importance_score));
        put(&mut item, DIFFICULTY_SCORE, AttrValue::number(self.difficulty_score));
        put(&mut item, CURRENT_INTERVAL, AttrValue::number(self.current_interval));
        put(&mut item, EASE_FACTOR, AttrValue::number(self.ease_factor));
        put(&mut item, REVIEW_COUNT, AttrValue::number(self.review_count));
        put(&mut item, NEXT_REVIEW_DATE, AttrValue::string(format_timestamp(&self.next_review_date)));
        put(&mut item, LAST_REVIEW_DATE, AttrValue::string(format_timestamp(&self.last_review_date)));
        put(&mut item, CREATED_AT, AttrValue::string(format_timestamp(&self.created_at)));
        put(&mut item, UPDATED_AT, AttrValue::string(format_timestamp(&self.updated_at)));
        put(&mut item, TAGS, AttrValue::string_set(&self.tags));
        item
    }
}

impl Record for ReviewSession {
    const KEY_ATTRIBUTE: &'static str = "session_id";

    fn key(&self) -> String {
        self.session_id.clone()
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        put(&mut item, Self::KEY_ATTRIBUTE, AttrValue::string(&self.session_id));
        put(&mut item, "timestamp", AttrValue::string(format_timestamp(&self.timestamp)));
        item
    }
}

impl Record for ReviewResponse {
    const KEY_ATTRIBUTE: &'static str = "response_id";

    fn key(&self) -> String {
        self.response_id.clone()
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        put(&mut item, Self::KEY_ATTRIBUTE, AttrValue::string(&self.response_id));
        put(&mut item, "timestamp", AttrValue::string(format_timestamp(&self.timestamp)));
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use neurobrain_types::{AtomType, NoteFormat, SourceType, DEFAULT_EASE_FACTOR};
    use uuid::Uuid;

    fn sample_note(source_url: Option<&str>) -> Note {
        Note {
            note_id: "note-user-001-000".to_string(),
            user_id: "user-001".to_string(),
            title: "Memory palace basics.".to_string(),
            content: "Body".to_string(),
            format: NoteFormat::Cornell,
            tags: BTreeSet::from(["memory".to_string(), "recall".to_string()]),
            created_at: 1_709_294_400,
            updated_at: 1_709_294_400,
            is_archived: false,
            source_type: SourceType::Web,
            source_url: source_url.map(str::to_string),
            quality_score: 0.75,
            knowledge_density: 0.4,
            word_count: 120,
            atom_count: 3,
        }
    }

    #[test]
    fn test_wire_shape_uses_single_key_wrappers() {
        let mut item = Item::new();
        item.insert("a".to_string(), AttrValue::string("text"));
        item.insert("b".to_string(), AttrValue::number(123));
        item.insert("c".to_string(), AttrValue::Bool(true));
        item.insert("d".to_string(), AttrValue::Ss(vec!["x".to_string(), "y".to_string()]));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "a": {"S": "text"},
                "b": {"N": "123"},
                "c": {"BOOL": true},
                "d": {"SS": ["x", "y"]},
            })
        );
    }

    #[test]
    fn test_note_item_uses_pascal_case_and_numeric_epochs() {
        let item = sample_note(Some("https://example.com/notes/note-user-001-000")).to_item();
        assert_eq!(item[note_attrs::NOTE_ID].as_str(), Some("note-user-001-000"));
        assert_eq!(item[note_attrs::CREATED_AT].as_number(), Some("1709294400"));
        assert_eq!(item[note_attrs::FORMAT].as_str(), Some("cornell"));
        assert_eq!(item[note_attrs::QUALITY_SCORE].as_number(), Some("0.75"));
        assert_eq!(item[note_attrs::IS_ARCHIVED].as_bool(), Some(false));
        assert_eq!(
            item[note_attrs::TAGS].as_string_set(),
            Some(&["memory".to_string(), "recall".to_string()][..])
        );
    }

    #[test]
    fn test_note_without_source_url_omits_attribute() {
        let item = sample_note(None).to_item();
        assert!(!item.contains_key(note_attrs::SOURCE_URL));
        assert_eq!(item.len(), 14);
    }

    #[test]
    fn test_atom_item_uses_snake_case_and_iso_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let atom = Atom {
            atom_id: Uuid::nil(),
            user_id: "user-001".to_string(),
            note_id: "note-user-001-000".to_string(),
            content: "Sample Concept about Art 1 for user-001".to_string(),
            atom_type: AtomType::Concept,
            importance_score: 0.8,
            difficulty_score: 0.3,
            current_interval: 22,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            next_review_date: now + chrono::Duration::days(22),
            last_review_date: now,
            created_at: now,
            updated_at: now,
            tags: BTreeSet::from(["Art".to_string(), "concept".to_string()]),
        };

        let item = atom.to_item();
        assert_eq!(atom.key(), "00000000-0000-0000-0000-000000000000");
        assert_eq!(item[atom_attrs::TYPE].as_str(), Some("concept"));
        assert_eq!(item[atom_attrs::EASE_FACTOR].as_number(), Some("2.5"));
        assert_eq!(item[atom_attrs::NEXT_REVIEW_DATE].as_str(), Some("2024-03-23T12:00:00.000Z"));
        assert!(!item.contains_key("NextReviewDate"));
    }

    #[test]
    fn test_user_item() {
        let user = User {
            user_id: "user-007".to_string(),
            email: "quiet_otter@example.com".to_string(),
            username: "quiet_otter".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            is_active: true,
            image_url: "https://i.pravatar.cc/150?u=user-007".to_string(),
        };
        let item = user.to_item();
        assert_eq!(User::KEY_ATTRIBUTE, "UserId");
        assert_eq!(item[user_attrs::CREATED_AT].as_str(), Some("2024-01-02T03:04:05.000Z"));
        assert_eq!(item[user_attrs::IS_ACTIVE].type_tag(), "BOOL");
    }
}
