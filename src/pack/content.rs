//! Reduction of a content-item list into one typed slot payload.

use log::warn;

use crate::pack::models::{MediaBlob, MediaSlots, QuestionKind};
use crate::pack::resolver::{MediaKind, MediaResolver};
use crate::pack::schema::{ContentItem, ContentKind};

/// The classified outcome of one content slot.
pub(crate) struct SlotPayload {
    pub kind: QuestionKind,
    pub text: Option<String>,
    pub media: MediaSlots,
}

/// Classifies an ordered item list into slot text plus at most one asset
/// per media slot.
///
/// Text and spoken items are newline-joined unless they carry a leading
/// `@` (an internal reference marker, not literal text). Only the first
/// item of each media kind counts. The inferred kind upgrades to `Audio`
/// when nothing stronger is set and to `Video` unconditionally; a
/// reference that fails to resolve still drives the kind, it only leaves
/// the media slot empty.
pub(crate) fn classify(items: &[ContentItem], resolver: &MediaResolver<'_>) -> SlotPayload {
    let mut kind = QuestionKind::Text;
    let mut text_parts: Vec<&str> = Vec::new();
    let mut media = MediaSlots::default();
    let (mut saw_image, mut saw_audio, mut saw_video) = (false, false, false);

    for item in items {
        match item.kind {
            ContentKind::Text | ContentKind::Say => {
                if !item.value.is_empty() && !item.value.starts_with('@') {
                    text_parts.push(&item.value);
                }
            }
            ContentKind::Image => {
                if !saw_image {
                    saw_image = true;
                    media.image = resolve_or_warn(resolver, &item.value, MediaKind::Image);
                }
            }
            ContentKind::Voice | ContentKind::Audio => {
                if !saw_audio {
                    saw_audio = true;
                    media.audio = resolve_or_warn(resolver, &item.value, MediaKind::Audio);
                    if kind == QuestionKind::Text {
                        kind = QuestionKind::Audio;
                    }
                }
            }
            ContentKind::Video => {
                if !saw_video {
                    saw_video = true;
                    media.video = resolve_or_warn(resolver, &item.value, MediaKind::Video);
                    // Video takes precedence over audio.
                    kind = QuestionKind::Video;
                }
            }
        }
    }

    SlotPayload {
        kind,
        text: if text_parts.is_empty() {
            None
        } else {
            Some(text_parts.join("\n"))
        },
        media,
    }
}

fn resolve_or_warn(
    resolver: &MediaResolver<'_>,
    reference: &str,
    kind: MediaKind,
) -> Option<MediaBlob> {
    let resolved = resolver.resolve(reference, kind);
    if resolved.is_none() {
        warn!("Media reference {:?} ({:?}) matches no archive entry", reference, kind);
    }
    resolved
}
