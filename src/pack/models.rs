//! Core data structures produced by a package parse.
//!
//! Everything here is constructed once during a single parse invocation
//! and handed to the caller as an immutable value; nothing persists
//! between calls.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Classification of a round within a package.
///
/// `Final` is set only when the source round carries an explicit
/// `type="final"` marker. A round merely *named* "Final" stays `Regular`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    Regular,
    Final,
}

/// Resolved kind of a question, inferred from its content items.
///
/// Video outranks audio during inference; `Select` is forced by an
/// `answerType` param and overrides media classification entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Audio,
    Video,
    Select,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuestionKind::Text => write!(f, "text"),
            QuestionKind::Audio => write!(f, "audio"),
            QuestionKind::Video => write!(f, "video"),
            QuestionKind::Select => write!(f, "select"),
        }
    }
}

/// A resolved media asset: raw bytes plus a MIME type.
///
/// The bytes are shared behind an `Arc` so the same blob can sit in a
/// question's media slots and the parallel file-storage entry without
/// copying. Cloning a blob is a reference-count bump.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub data: Arc<Vec<u8>>,
    pub mime: String,
}

/// Media slots attached to one side (question or answer) of a question.
#[derive(Debug, Clone, Default)]
pub struct MediaSlots {
    pub image: Option<MediaBlob>,
    pub audio: Option<MediaBlob>,
    pub video: Option<MediaBlob>,
}

impl MediaSlots {
    /// Returns `true` when no slot holds a resolved asset.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.audio.is_none() && self.video.is_none()
    }
}

/// Marker for non-default question behavior (cat-in-bag, bet, secret,
/// auction). Carries host-facing rule text in `Question::special_description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Cat,
    Bet,
    Special,
    Auction,
}

/// One fully assembled question.
#[derive(Debug, Clone)]
pub struct Question {
    /// Unique within one parse result and stable across re-parses of the
    /// same archive. Restricted to `[A-Za-z0-9_-]`.
    pub id: String,
    pub round: String,
    pub category: String,
    pub score: u32,
    pub kind: QuestionKind,
    pub question_text: Option<String>,
    pub answer_text: Option<String>,
    /// Ordered `"key: text"` strings for select questions.
    pub answer_options: Option<Vec<String>>,
    pub special: Option<SpecialKind>,
    pub special_description: Option<String>,
    pub question_media: MediaSlots,
    pub answer_media: MediaSlots,
}

/// Named blob slots stored per question id, mirroring the question's
/// `question_media`/`answer_media`.
#[derive(Debug, Clone, Default)]
pub struct FileStorageEntry {
    pub question: MediaSlots,
    pub answer: MediaSlots,
}

impl FileStorageEntry {
    /// Returns `true` when neither side holds a resolved asset.
    pub fn is_empty(&self) -> bool {
        self.question.is_empty() && self.answer.is_empty()
    }
}

/// Package-level metadata from the root element.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub name: String,
    pub version: Option<String>,
    pub authors: Vec<String>,
}

/// The complete output of one package parse.
#[derive(Debug, Clone)]
pub struct PackageContents {
    /// Questions in source document order; never re-sorted.
    pub questions: Vec<Question>,
    /// Resolved media per question id. Only ids with at least one blob appear.
    pub file_storage: HashMap<String, FileStorageEntry>,
    /// Round name to kind, for the game runtime's round buckets.
    pub round_kinds: HashMap<String, RoundKind>,
    pub metadata: PackageMetadata,
}
