//! Small built-in vocabulary for synthetic usernames and note text.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "memory", "recall", "concept", "theory", "method", "signal", "pattern", "system",
    "review", "habit", "focus", "insight", "model", "record", "practice", "language",
    "history", "science", "number", "shape", "energy", "market", "design", "lesson",
    "network", "process", "principle", "question", "answer", "evidence", "context", "summary",
    "example", "detail", "outline", "source", "chapter", "lecture", "problem", "solution",
];

const ADJECTIVES: &[&str] = &[
    "quiet", "brave", "lucky", "swift", "clever", "gentle", "bright", "calm", "eager", "jolly",
];

const ANIMALS: &[&str] = &[
    "otter", "falcon", "badger", "heron", "lynx", "panda", "raven", "tiger", "koala", "whale",
];

/// A single lowercase word
pub fn word<R: Rng + ?Sized>(rng: &mut R) -> String {
    WORDS.choose(rng).copied().unwrap_or("note").to_string()
}

/// `count` random words
pub fn words<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count).map(|_| word(rng)).collect()
}

/// Username such as `swift_heron42`
pub fn username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("plain");
    let animal = ANIMALS.choose(rng).copied().unwrap_or("user");
    format!("{}_{}{}", adjective, animal, rng.gen_range(1..100))
}

/// Capitalized sentence of `word_count` words ending in a period
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, word_count: usize) -> String {
    let mut text = words(rng, word_count.max(1)).join(" ");
    if let Some(first) = text.get(0..1) {
        let upper = first.to_uppercase();
        text.replace_range(0..1, &upper);
    }
    text.push('.');
    text
}

/// `sentence_count` sentences of 4 to 10 words
pub fn paragraph<R: Rng + ?Sized>(rng: &mut R, sentence_count: usize) -> String {
    (0..sentence_count)
        .map(|_| {
            let length = rng.gen_range(4..=10);
            sentence(rng, length)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
