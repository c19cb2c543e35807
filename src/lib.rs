//! # quizpack-reader
//!
//! A reader for compressed quiz-package archives: a zip container holding
//! a `content.xml` question tree plus loosely-organized media assets.
//!
//! The package format has evolved across incompatible schema generations
//! and is produced by many independent authoring tools, so media paths in
//! the XML rarely match archive entries exactly. This crate normalizes all
//! of that into a round-ordered question list, a per-question blob map,
//! and a round-kind map ready for a game-runtime consumer.
pub mod pack;

// Re-export the main types for convenience
pub use pack::{
    parse_package,
    error::{PackageError, Result},
    models::{
        FileStorageEntry, MediaBlob, MediaSlots, PackageContents, PackageMetadata, Question,
        QuestionKind, RoundKind, SpecialKind,
    },
};
