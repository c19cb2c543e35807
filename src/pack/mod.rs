//! Quiz package parsing pipeline.
//!
//! One call to [`parse_package`] runs the whole pipeline over an
//! in-memory archive buffer:
//!
//! ```text
//! zip bytes
//!   -> archive:   entry map + root document        (archive::PackageArchive)
//!   -> index:     normalized path/basename tables  (index::NormalizedIndex)
//!   -> document:  rounds/themes/questions tree     (roxmltree)
//!   -> assembler: schema adapter -> content classifier
//!                 -> media resolver -> special classifier
//! ```
//!
//! The archive, index, and resolver form a per-call context threaded
//! explicitly through every stage; nothing is shared between parse
//! invocations, so independent packages can be parsed concurrently.

pub mod error;
pub mod models;

mod archive;
mod assembler;
mod content;
mod index;
mod resolver;
mod schema;
mod special;

use log::info;

use archive::PackageArchive;
use index::NormalizedIndex;

pub use error::{PackageError, Result};
pub use models::{
    FileStorageEntry, MediaBlob, MediaSlots, PackageContents, PackageMetadata, Question,
    QuestionKind, RoundKind, SpecialKind,
};

/// UTF-8 byte-order mark some authoring tools prepend to `content.xml`.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Parses a complete quiz package from an in-memory archive buffer.
///
/// Produces the ordered question list, the per-question blob storage map,
/// and the round-kind map consumed by the game runtime.
///
/// # Errors
/// Fails only when the buffer is not a readable zip container or the root
/// `content.xml` document is missing or unparsable. Every other
/// irregularity (unresolvable media, unknown schema shapes, malformed
/// scores) degrades to a default and the parse continues.
pub fn parse_package(bytes: &[u8]) -> Result<PackageContents> {
    info!("Parsing quiz package ({} bytes)", bytes.len());

    let archive = PackageArchive::open(bytes)?;
    let index = NormalizedIndex::build(&archive);

    let raw = archive.root_document();
    let raw = raw.strip_prefix(&UTF8_BOM).unwrap_or(raw);
    let text = String::from_utf8_lossy(raw);
    let doc = roxmltree::Document::parse(&text)
        .map_err(|e| PackageError::MalformedDocument(e.to_string()))?;

    let contents = assembler::assemble(&doc, &archive, &index);

    info!(
        "Package {:?} parsed: {} rounds, {} questions, {} media entries",
        contents.metadata.name,
        contents.round_kinds.len(),
        contents.questions.len(),
        contents.file_storage.len()
    );

    Ok(contents)
}
