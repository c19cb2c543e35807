//! Schema-version-tolerant content extraction.
//!
//! Two incompatible generations of the package schema describe question
//! content. The modern shape attaches a `params` collection whose entries
//! carry typed `item` children; the legacy shape uses a `scenario`
//! sequence of `atom`s. The adapter decodes both into one ordered
//! `ContentItem` list so the rest of the pipeline never probes optional
//! fields itself.

use roxmltree::Node;

/// Which content slot of a question is being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentSlot {
    Question,
    Answer,
}

impl ContentSlot {
    /// Param name the modern shape uses for this slot.
    fn param_name(self) -> &'static str {
        match self {
            ContentSlot::Question => "question",
            ContentSlot::Answer => "answer",
        }
    }
}

/// Kind of one content unit, as declared in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentKind {
    Text,
    Say,
    Image,
    Voice,
    Audio,
    Video,
}

impl ContentKind {
    /// Maps a declared type string to a kind. Unknown or absent
    /// declarations degrade to `Text`.
    fn from_declared(raw: Option<&str>) -> Self {
        match raw.unwrap_or("").trim().to_lowercase().as_str() {
            "say" => ContentKind::Say,
            "image" => ContentKind::Image,
            "voice" => ContentKind::Voice,
            "audio" => ContentKind::Audio,
            "video" => ContentKind::Video,
            _ => ContentKind::Text,
        }
    }
}

/// One content unit from either schema shape.
#[derive(Debug, Clone)]
pub(crate) struct ContentItem {
    pub kind: ContentKind,
    pub value: String,
}

/// The content shape a question node offers for a slot.
enum ContentSource<'a, 'input> {
    /// Modern: the params collection entry named exactly as the slot.
    Params(Node<'a, 'input>),
    /// Legacy: the scenario/atom sequence. Question slot only.
    Scenario(Node<'a, 'input>),
    Absent,
}

/// Extracts the ordered content items for one slot of a question node.
///
/// The modern shape is probed first; the legacy scenario is the fallback
/// and never supplies an `answer` slot (legacy answer text lives in a
/// separate right-answer field handled by the assembler). Neither shape
/// present means the slot simply has no content.
pub(crate) fn slot_items(question: Node, slot: ContentSlot) -> Vec<ContentItem> {
    match content_source(question, slot) {
        ContentSource::Params(param) => element_children(param, "item")
            .map(|item| ContentItem {
                kind: ContentKind::from_declared(item.attribute("type")),
                value: text_of(item),
            })
            .collect(),
        ContentSource::Scenario(scenario) => element_children(scenario, "atom")
            .map(|atom| ContentItem {
                kind: ContentKind::from_declared(atom.attribute("type")),
                value: text_of(atom),
            })
            .collect(),
        ContentSource::Absent => Vec::new(),
    }
}

fn content_source<'a, 'i>(question: Node<'a, 'i>, slot: ContentSlot) -> ContentSource<'a, 'i> {
    if let Some(params) = element_child(question, "params") {
        if let Some(param) = element_children(params, "param")
            .find(|p| p.attribute("name") == Some(slot.param_name()))
        {
            return ContentSource::Params(param);
        }
    }
    if slot == ContentSlot::Question {
        if let Some(scenario) = element_child(question, "scenario") {
            return ContentSource::Scenario(scenario);
        }
    }
    ContentSource::Absent
}

/// First child element with the given tag name.
pub(crate) fn element_child<'a, 'i>(node: Node<'a, 'i>, name: &'static str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Child elements with the given tag name, in document order.
pub(crate) fn element_children<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// Trimmed text content of an element, or an empty string.
pub(crate) fn text_of(node: Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}
