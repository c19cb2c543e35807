//! Heuristic media resolution.
//!
//! References in package XML rarely name archive entries exactly. The
//! resolver expands a reference into an ordered candidate set, crosses it
//! with the conventional folder prefixes, and probes the pre-built index
//! through an explicit fallback chain: full path, then basename, then
//! loose containment. First hit wins. A miss is reported as `None`, never
//! an error.

use std::sync::Arc;

use log::trace;
use percent_encoding::utf8_percent_encode;
use unicode_normalization::UnicodeNormalization;

use crate::pack::archive::PackageArchive;
use crate::pack::index::{basename_of, percent_decoded, NormalizedIndex, PATH_ESCAPES};
use crate::pack::models::MediaBlob;

/// Asset kind a reference points at; selects the preferred folder prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Conventional folder name for this kind inside a package.
    fn folder(self) -> &'static str {
        match self {
            MediaKind::Image => "Images",
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
        }
    }
}

/// Read-only view over the archive and candidate index for one parse call.
pub(crate) struct MediaResolver<'a> {
    archive: &'a PackageArchive,
    index: &'a NormalizedIndex,
}

impl<'a> MediaResolver<'a> {
    pub fn new(archive: &'a PackageArchive, index: &'a NormalizedIndex) -> Self {
        Self { archive, index }
    }

    /// Resolves a textual reference to a blob, or `None` once the full
    /// candidate search is exhausted.
    pub fn resolve(&self, reference: &str, kind: MediaKind) -> Option<MediaBlob> {
        let candidates = candidate_forms(reference);
        let prefixes = [
            String::new(),
            format!("{}/", kind.folder()),
            "Images/".to_string(),
            "Audio/".to_string(),
            "Video/".to_string(),
            "Texts/".to_string(),
            format!("{}/", kind.folder().to_lowercase()),
        ];

        // Full-path probes over the candidate x prefix cross product.
        for candidate in &candidates {
            for prefix in &prefixes {
                let probe = format!("{}{}", prefix, candidate);
                if let Some(canonical) = self.index.lookup_path(&probe) {
                    trace!("Resolved {:?} via path probe {:?} -> {:?}", reference, probe, canonical);
                    return self.blob_for(canonical);
                }
            }
        }

        // Basename probes, using each candidate's own basename.
        for candidate in &candidates {
            let base = basename_of(candidate);
            if let Some(canonical) = self.index.lookup_basename(base) {
                trace!("Resolved {:?} via basename {:?} -> {:?}", reference, base, canonical);
                return self.blob_for(canonical);
            }
        }

        // Loose containment over indexed basenames, for transliteration
        // and typo drift.
        let trimmed = reference.trim();
        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if let Some(canonical) = self.index.lookup_basename_loose(basename_of(bare)) {
            trace!("Resolved {:?} via loose containment -> {:?}", reference, canonical);
            return self.blob_for(canonical);
        }

        None
    }

    fn blob_for(&self, canonical: &str) -> Option<MediaBlob> {
        let entry = self.archive.read_entry(canonical)?;
        Some(MediaBlob {
            data: Arc::clone(&entry.data),
            mime: mime_for_path(canonical).to_string(),
        })
    }
}

/// Expands a reference into its ordered candidate spellings. Exact forms
/// come first so the cheapest correct interpretation wins.
fn candidate_forms(reference: &str) -> Vec<String> {
    let mut forms = Vec::new();

    push_unique(&mut forms, reference.to_string());
    let trimmed = reference.trim();
    push_unique(&mut forms, trimmed.to_string());

    // A leading '@' marks an internal reference, not part of the name.
    let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
    push_unique(&mut forms, bare.to_string());
    push_unique(&mut forms, basename_of(bare).to_string());

    push_unique(&mut forms, bare.nfc().collect::<String>());
    push_unique(&mut forms, bare.nfd().collect::<String>());

    if let Some(decoded) = percent_decoded(bare) {
        push_unique(&mut forms, decoded);
    }
    push_unique(&mut forms, utf8_percent_encode(bare, PATH_ESCAPES).to_string());

    if let Ok(unescaped) = quick_xml::escape::unescape(bare) {
        push_unique(&mut forms, unescaped.into_owned());
    }

    if bare.contains('+') {
        push_unique(&mut forms, bare.replace('+', " "));
    }
    if bare.contains(' ') {
        push_unique(&mut forms, bare.replace(' ', "+"));
    }

    forms
}

fn push_unique(forms: &mut Vec<String>, form: String) {
    if !form.is_empty() && !forms.contains(&form) {
        forms.push(form);
    }
}

/// MIME type inferred from the resolved entry's file extension.
///
/// Zip entries declare no usable content type, so the extension is the
/// meaningful source; unknown extensions fall back to a generic binary type.
pub(crate) fn mime_for_path(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}
