//! Path normalization and the per-parse candidate index.
//!
//! Package authoring tools disagree about how media paths are written:
//! case, Unicode form, URL escaping, and `+`-for-space conventions all
//! drift between the XML references and the actual archive entries. The
//! index is built once per parse and covers those variants for every
//! entry, so the resolver can probe it directly instead of re-scanning
//! the archive on every reference.

use std::collections::HashMap;

use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use unicode_normalization::UnicodeNormalization;

use crate::pack::archive::PackageArchive;

/// Characters escaped when re-encoding a path the way URL-minded authoring
/// tools do: everything except alphanumerics and path punctuation.
pub(crate) const PATH_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'_')
    .remove(b'-');

/// Canonical text form used for every index key and probe:
/// trim, lowercase, Unicode NFC, collapse internal whitespace.
pub(crate) fn normalize(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let composed: String = lowered.as_str().nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Final path component, accepting both separator styles.
pub(crate) fn basename_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Percent-decoded copy of a path, when decoding changes it and yields
/// valid UTF-8.
pub(crate) fn percent_decoded(s: &str) -> Option<String> {
    if !s.contains('%') {
        return None;
    }
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
        .filter(|decoded| decoded != s)
}

/// Per-parse lookup tables over every archive entry.
///
/// Two maps: normalized full path to canonical path, and normalized
/// basename to canonical path. Built fresh per parse, never mutated
/// afterwards, so concurrent reads during question processing are safe.
pub(crate) struct NormalizedIndex {
    by_path: HashMap<String, String>,
    by_basename: HashMap<String, String>,
    /// `(normalized basename, canonical path)` in insertion order. Backs
    /// the loose containment fallback so its "first match" is deterministic.
    basenames: Vec<(String, String)>,
}

impl NormalizedIndex {
    /// Builds both lookup tables in one pass over the archive entries.
    pub fn build(archive: &PackageArchive) -> Self {
        let mut index = Self::empty();
        for path in archive.files() {
            index.insert_entry(path);
        }
        debug!(
            "Candidate index built: {} path keys, {} basename keys",
            index.by_path.len(),
            index.basenames.len()
        );
        index
    }

    fn empty() -> Self {
        Self {
            by_path: HashMap::new(),
            by_basename: HashMap::new(),
            basenames: Vec::new(),
        }
    }

    /// Indexes one canonical entry path under all of its accepted variants.
    /// First insertion wins, so earlier archive entries take precedence.
    fn insert_entry(&mut self, canonical: &str) {
        self.insert_path(normalize(canonical), canonical);
        if let Some(decoded) = percent_decoded(canonical) {
            self.insert_path(normalize(&decoded), canonical);
        }
        let reencoded = utf8_percent_encode(canonical, PATH_ESCAPES).to_string();
        if reencoded != canonical {
            self.insert_path(normalize(&reencoded), canonical);
        }

        let base = normalize(basename_of(canonical));
        if base.contains('+') {
            self.insert_basename(base.replace('+', " "), canonical);
        }
        if base.contains(' ') {
            self.insert_basename(base.replace(' ', "+"), canonical);
        }
        self.insert_basename(base, canonical);
    }

    fn insert_path(&mut self, key: String, canonical: &str) {
        self.by_path.entry(key).or_insert_with(|| canonical.to_string());
    }

    fn insert_basename(&mut self, key: String, canonical: &str) {
        if !self.by_basename.contains_key(&key) {
            self.by_basename.insert(key.clone(), canonical.to_string());
            self.basenames.push((key, canonical.to_string()));
        }
    }

    /// Probes the full-path table with an un-normalized candidate.
    pub fn lookup_path(&self, candidate: &str) -> Option<&str> {
        self.by_path.get(&normalize(candidate)).map(String::as_str)
    }

    /// Probes the basename table with an un-normalized candidate.
    pub fn lookup_basename(&self, candidate: &str) -> Option<&str> {
        self.by_basename.get(&normalize(candidate)).map(String::as_str)
    }

    /// Scans indexed basenames for substring containment in either
    /// direction. Loose fallback for transliteration and typo drift; only
    /// applied when the target is long enough to be distinctive.
    pub fn lookup_basename_loose(&self, target: &str) -> Option<&str> {
        let needle = normalize(target);
        if needle.chars().count() <= 5 {
            return None;
        }
        self.basenames
            .iter()
            .find(|(base, _)| base.contains(&needle) || needle.contains(base.as_str()))
            .map(|(_, canonical)| canonical.as_str())
    }
}
