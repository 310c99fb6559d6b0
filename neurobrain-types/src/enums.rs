use serde::{Deserialize, Serialize};

/// Note-taking layout a note was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteFormat {
    Cornell,
    Zettelkasten,
    Mindmap,
    #[default]
    Plain,
}

impl NoteFormat {
    pub const ALL: [NoteFormat; 4] = [
        NoteFormat::Cornell,
        NoteFormat::Zettelkasten,
        NoteFormat::Mindmap,
        NoteFormat::Plain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteFormat::Cornell => "cornell",
            NoteFormat::Zettelkasten => "zettelkasten",
            NoteFormat::Mindmap => "mindmap",
            NoteFormat::Plain => "plain",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cornell" => Some(NoteFormat::Cornell),
            "zettelkasten" => Some(NoteFormat::Zettelkasten),
            "mindmap" => Some(NoteFormat::Mindmap),
            "plain" => Some(NoteFormat::Plain),
            _ => None,
        }
    }
}

/// Where the content of a note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Manual,
    Imported,
    Web,
    Pdf,
}

impl SourceType {
    pub const ALL: [SourceType; 4] = [
        SourceType::Manual,
        SourceType::Imported,
        SourceType::Web,
        SourceType::Pdf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Manual => "manual",
            SourceType::Imported => "imported",
            SourceType::Web => "web",
            SourceType::Pdf => "pdf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(SourceType::Manual),
            "imported" => Some(SourceType::Imported),
            "web" => Some(SourceType::Web),
            "pdf" => Some(SourceType::Pdf),
            _ => None,
        }
    }
}

/// Kind of knowledge an atom captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AtomType {
    #[default]
    Concept,
    Fact,
    Principle,
    Process,
}

impl AtomType {
    pub const ALL: [AtomType; 4] = [
        AtomType::Concept,
        AtomType::Fact,
        AtomType::Principle,
        AtomType::Process,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AtomType::Concept => "concept",
            AtomType::Fact => "fact",
            AtomType::Principle => "principle",
            AtomType::Process => "process",
        }
    }

    /// Name with a leading capital, used in generated atom content
    pub fn title(&self) -> &'static str {
        match self {
            AtomType::Concept => "Concept",
            AtomType::Fact => "Fact",
            AtomType::Principle => "Principle",
            AtomType::Process => "Process",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "concept" => Some(AtomType::Concept),
            "fact" => Some(AtomType::Fact),
            "principle" => Some(AtomType::Principle),
            "process" => Some(AtomType::Process),
            _ => None,
        }
    }
}
