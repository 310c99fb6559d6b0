//! Synthetic users, notes and atoms with plausible field distributions.
//!
//! Randomness and the clock are injected so a run can be reproduced from a
//! seed, and tests can assert exact dates.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use uuid::Builder;

use neurobrain_types::{
    Atom, AtomType, Note, NoteFormat, ReviewResponse, ReviewSession, SourceType, User,
    DEFAULT_EASE_FACTOR,
};

use crate::lorem;

pub const SUBJECTS: [&str; 6] = ["Math", "Science", "History", "Programming", "Language", "Art"];

/// Tag set used when the random draw produces an unusable tag
pub const FALLBACK_TAG: &str = "sample";

pub const REVIEW_SESSION_ID: &str = "00000000-0000-0000-0000-000000000021";
pub const REVIEW_RESPONSE_ID: &str = "00000000-0000-0000-0000-000000000031";

/// Every atom whose per-user index is a multiple of this is made past due
pub const PAST_DUE_EVERY: usize = 3;
/// Every atom whose per-user index is a multiple of this gets review history
pub const REVIEWED_EVERY: usize = 4;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct RecordGenerator<R: Rng> {
    rng: R,
    now: DateTime<Utc>,
}

impl<R: Rng> RecordGenerator<R> {
    /// `now` is truncated to whole seconds so stored timestamps read back exactly
    pub fn new(rng: R, now: DateTime<Utc>) -> Self {
        let now = DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Self { rng, now }
    }

    /// The run time every generated record is stamped with
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Users `user-001` .. `user-<count>`
    pub fn users(&mut self, count: usize) -> Vec<User> {
        (1..=count)
            .map(|i| {
                let user_id = format!("user-{:03}", i);
                let username = lorem::username(&mut self.rng);
                User {
                    email: format!("{}@example.com", username),
                    image_url: format!("https://i.pravatar.cc/150?u={}", user_id),
                    user_id,
                    username,
                    created_at: self.now,
                    is_active: true,
                }
            })
            .collect()
    }

    /// `per_user` notes for each user
    pub fn notes(&mut self, users: &[User], per_user: usize) -> Vec<Note> {
        let mut notes = Vec::with_capacity(users.len() * per_user);
        for user in users {
            tracing::debug!("Creating notes for user {}", user.user_id);
            for i in 0..per_user {
                notes.push(self.note(&user.user_id, i));
            }
        }
        notes
    }

    fn note(&mut self, user_id: &str, index: usize) -> Note {
        let note_id = format!("note-{}-{:03}", user_id, index);
        let title = lorem::sentence(&mut self.rng, 4);
        let content = (0..3)
            .map(|_| lorem::paragraph(&mut self.rng, 5))
            .collect::<Vec<_>>()
            .join("\n\n");

        let tag_count = self.rng.gen_range(1..=4);
        let mut tags: BTreeSet<String> = lorem::words(&mut self.rng, tag_count).into_iter().collect();
        if tags.is_empty() || tags.iter().any(|tag| tag.is_empty()) {
            tags = BTreeSet::from([FALLBACK_TAG.to_string()]);
        }

        let source_url = if self.rng.gen::<f64>() > 0.3 {
            Some(format!("https://example.com/notes/{}", note_id))
        } else {
            None
        };
        let epoch = self.now.timestamp();

        Note {
            user_id: user_id.to_string(),
            title,
            content,
            format: *NoteFormat::ALL.choose(&mut self.rng).unwrap_or(&NoteFormat::Plain),
            tags,
            created_at: epoch,
            updated_at: epoch,
            is_archived: false,
            source_type: *SourceType::ALL.choose(&mut self.rng).unwrap_or(&SourceType::Manual),
            source_url,
            quality_score: round2(self.rng.gen_range(0.5..=1.0)),
            knowledge_density: round2(self.rng.gen_range(0.1..=0.9)),
            word_count: self.rng.gen_range(50..=500),
            atom_count: self.rng.gen_range(1..=10),
            note_id,
        }
    }

    /// `per_user` atoms for each user, each linked to one of that user's notes.
    ///
    /// Users without notes get no atoms.
    pub fn atoms(&mut self, users: &[User], notes: &[Note], per_user: usize) -> Vec<Atom> {
        let mut atoms = Vec::new();
        for user in users {
            let user_notes: Vec<&Note> = notes.iter().filter(|n| n.user_id == user.user_id).collect();
            if user_notes.is_empty() {
                tracing::debug!("Skipping atoms for {}: no notes", user.user_id);
                continue;
            }

            for i in 0..per_user {
                let note_id = user_notes
                    .choose(&mut self.rng)
                    .map(|note| note.note_id.clone())
                    .unwrap_or_default();
                let content_suffix = format!("{} for {}", i + 1, user.user_id);
                atoms.push(self.atom(&user.user_id, note_id, i, &content_suffix));
            }
        }
        atoms
    }

    /// `count` atoms for a single user, pointing at placeholder notes
    /// `note-0001` .. `note-<count>`
    pub fn standalone_atoms(&mut self, user_id: &str, count: usize) -> Vec<Atom> {
        (0..count)
            .map(|i| {
                let note_id = format!("note-{:04}", i + 1);
                let content_suffix = (i + 1).to_string();
                self.atom(user_id, note_id, i, &content_suffix)
            })
            .collect()
    }

    fn atom(&mut self, user_id: &str, note_id: String, index: usize, content_suffix: &str) -> Atom {
        let atom_type = *AtomType::ALL.choose(&mut self.rng).unwrap_or(&AtomType::Concept);
        let subject = *SUBJECTS.choose(&mut self.rng).unwrap_or(&SUBJECTS[0]);
        let difficulty = round2(self.rng.gen_range(0.1..=0.9));
        let importance = round2(self.rng.gen_range(0.3..=1.0));
        let due_days = Atom::due_days(difficulty);

        let tags = BTreeSet::from([
            subject.to_string(),
            atom_type.as_str().to_string(),
            format!("generated-{}", self.now.format("%Y%m%d")),
        ]);

        let mut atom = Atom {
            atom_id: Builder::from_random_bytes(self.rng.gen()).into_uuid(),
            user_id: user_id.to_string(),
            note_id,
            content: format!("Sample {} about {} {}", atom_type.title(), subject, content_suffix),
            atom_type,
            importance_score: importance,
            difficulty_score: difficulty,
            current_interval: due_days,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            next_review_date: self.now + Duration::days(due_days),
            last_review_date: self.now,
            created_at: self.now,
            updated_at: self.now,
            tags,
        };

        if index % PAST_DUE_EVERY == 0 {
            atom.next_review_date = self.now - Duration::days(self.rng.gen_range(1..=14));
        }
        if index % REVIEWED_EVERY == 0 {
            atom.review_count = self.rng.gen_range(1..=10);
            atom.last_review_date = self.now - Duration::days(self.rng.gen_range(1..=30));
        }

        atom
    }

    /// The fixed review session and response the review service expects to find
    pub fn review_fixtures(&self) -> (ReviewSession, ReviewResponse) {
        (
            ReviewSession {
                session_id: REVIEW_SESSION_ID.to_string(),
                timestamp: self.now,
            },
            ReviewResponse {
                response_id: REVIEW_RESPONSE_ID.to_string(),
                timestamp: self.now,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(seed: u64) -> RecordGenerator<StdRng> {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        RecordGenerator::new(StdRng::seed_from_u64(seed), now)
    }

    #[test]
    fn test_now_is_truncated_to_seconds() {
        let now = Utc.timestamp_opt(1_709_296_245, 123_456_789).unwrap();
        let gen = RecordGenerator::new(StdRng::seed_from_u64(1), now);
        assert_eq!(gen.now().timestamp_subsec_nanos(), 0);
        assert_eq!(gen.now().timestamp(), 1_709_296_245);
    }

    #[test]
    fn test_users_are_sequential() {
        let mut gen = generator(1);
        let users = gen.users(3);
        let ids: Vec<_> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, ["user-001", "user-002", "user-003"]);

        for user in &users {
            assert_eq!(user.email, format!("{}@example.com", user.username));
            assert_eq!(user.image_url, format!("https://i.pravatar.cc/150?u={}", user.user_id));
            assert!(user.is_active);
        }
    }

    #[test]
    fn test_notes_reference_their_user() {
        let mut gen = generator(2);
        let users = gen.users(2);
        let notes = gen.notes(&users, 3);

        assert_eq!(notes.len(), 6);
        assert_eq!(notes[0].note_id, "note-user-001-000");
        assert_eq!(notes[5].note_id, "note-user-002-002");
        for note in &notes {
            assert!(note.note_id.starts_with(&format!("note-{}-", note.user_id)));
            assert!(!note.tags.is_empty());
            assert!((0.5..=1.0).contains(&note.quality_score));
            assert!((0.1..=0.9).contains(&note.knowledge_density));
            assert!((50..=500).contains(&note.word_count));
            assert!((1..=10).contains(&note.atom_count));
            assert_eq!(note.content.split("\n\n").count(), 3);
            assert!(!note.is_archived);
            if let Some(url) = &note.source_url {
                assert_eq!(url, &format!("https://example.com/notes/{}", note.note_id));
            }
        }
    }

    #[test]
    fn test_atoms_skip_users_without_notes() {
        let mut gen = generator(3);
        let users = gen.users(3);
        let notes = gen.notes(&users[..1], 2);
        let atoms = gen.atoms(&users, &notes, 4);

        assert_eq!(atoms.len(), 4);
        assert!(atoms.iter().all(|a| a.user_id == "user-001"));
    }

    #[test]
    fn test_atoms_link_to_notes_of_same_user() {
        let mut gen = generator(4);
        let users = gen.users(5);
        let notes = gen.notes(&users, 2);
        let atoms = gen.atoms(&users, &notes, 3);

        assert_eq!(atoms.len(), 15);
        for atom in &atoms {
            assert!(notes
                .iter()
                .any(|n| n.note_id == atom.note_id && n.user_id == atom.user_id));
        }
    }

    #[test]
    fn test_perturbation_schedule() {
        let mut gen = generator(5);
        let now = gen.now();
        let atoms = gen.standalone_atoms("sample-user-1", 24);

        for (i, atom) in atoms.iter().enumerate() {
            if i % 3 == 0 {
                assert!(atom.is_past_due(now), "atom {} should be past due", i);
                let overdue = (now - atom.next_review_date).num_days();
                assert!((1..=14).contains(&overdue));
            } else {
                assert_eq!(atom.next_review_date, atom.scheduled_review_date());
                assert!(!atom.is_past_due(now));
            }

            if i % 4 == 0 {
                assert!((1..=10).contains(&atom.review_count), "atom {} should be reviewed", i);
                let since = (now - atom.last_review_date).num_days();
                assert!((1..=30).contains(&since));
            } else {
                assert_eq!(atom.review_count, 0);
                assert_eq!(atom.last_review_date, now);
            }
        }
    }

    #[test]
    fn test_single_atom_gets_both_perturbations() {
        let mut gen = generator(6);
        let now = gen.now();
        let users = gen.users(1);
        let notes = gen.notes(&users, 1);
        let atoms = gen.atoms(&users, &notes, 1);

        assert_eq!(users.len(), 1);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].user_id, users[0].user_id);
        assert_eq!(atoms.len(), 1);

        let atom = &atoms[0];
        assert_eq!(atom.note_id, notes[0].note_id);
        assert_eq!(atom.user_id, users[0].user_id);
        // Index 0 is a multiple of both 3 and 4
        assert!(atom.is_past_due(now));
        assert!(atom.review_count >= 1);
    }

    #[test]
    fn test_standalone_atoms_use_placeholder_notes() {
        let mut gen = generator(7);
        let atoms = gen.standalone_atoms("sample-user-1", 10);
        assert_eq!(atoms[0].note_id, "note-0001");
        assert_eq!(atoms[9].note_id, "note-0010");
        assert!(atoms[9].content.ends_with(" 10"));
        assert!(atoms.iter().all(|a| a.user_id == "sample-user-1"));
    }

    #[test]
    fn test_atom_tags_and_defaults() {
        let mut gen = generator(8);
        let atom = gen.standalone_atoms("u", 2).remove(1);
        assert!(atom.tags.contains("generated-20240301"));
        assert!(atom.tags.contains(atom.atom_type.as_str()));
        assert_eq!(atom.tags.len(), 3);
        assert_eq!(atom.ease_factor, 2.5);
        assert_eq!(atom.current_interval, Atom::due_days(atom.difficulty_score));
        assert!(atom.content.starts_with(&format!("Sample {} about ", atom.atom_type.title())));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = generator(42);
        let mut b = generator(42);
        let users_a = a.users(3);
        let users_b = b.users(3);
        assert_eq!(users_a, users_b);
        let notes_a = a.notes(&users_a, 2);
        let notes_b = b.notes(&users_b, 2);
        assert_eq!(notes_a, notes_b);
        assert_eq!(a.atoms(&users_a, &notes_a, 3), b.atoms(&users_b, &notes_b, 3));
        assert_eq!(a.standalone_atoms("u", 2), b.standalone_atoms("u", 2));
    }

    #[test]
    fn test_atom_ids_are_v4_and_distinct() {
        let atoms = generator(3).standalone_atoms("u", 20);
        let ids: BTreeSet<_> = atoms.iter().map(|a| a.atom_id).collect();
        assert_eq!(ids.len(), 20);
        assert!(atoms.iter().all(|a| a.atom_id.get_version_num() == 4));
    }

    #[test]
    fn test_review_fixtures() {
        let gen = generator(9);
        let (session, response) = gen.review_fixtures();
        assert_eq!(session.session_id, REVIEW_SESSION_ID);
        assert_eq!(response.response_id, REVIEW_RESPONSE_ID);
        assert_eq!(session.timestamp, gen.now());
    }

    proptest! {
        #[test]
        fn prop_atom_scores_and_schedule(seed in any::<u64>(), count in 1usize..40) {
            let mut gen = generator(seed);
            let now = gen.now();
            let atoms = gen.standalone_atoms("sample-user-1", count);

            prop_assert_eq!(atoms.len(), count);
            for (i, atom) in atoms.iter().enumerate() {
                prop_assert!((0.1..=0.9).contains(&atom.difficulty_score));
                prop_assert!((0.3..=1.0).contains(&atom.importance_score));
                prop_assert!(!atom.tags.is_empty());
                prop_assert_eq!(
                    atom.scheduled_review_date(),
                    atom.created_at + Duration::days(((1.0 - atom.difficulty_score) * 30.0).round() as i64 + 1)
                );
                prop_assert_eq!(atom.is_past_due(now), i % 3 == 0);
                prop_assert_eq!(atom.review_count >= 1, i % 4 == 0);
            }
        }

        #[test]
        fn prop_note_tags_never_empty(seed in any::<u64>(), per_user in 1usize..5) {
            let mut gen = generator(seed);
            let users = gen.users(2);
            for note in gen.notes(&users, per_user) {
                prop_assert!(!note.tags.is_empty());
                prop_assert!(note.tags.iter().all(|t| !t.is_empty()));
            }
        }
    }
}
