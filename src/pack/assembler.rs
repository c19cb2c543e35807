//! Document walk: rounds, themes, questions, in source order.
//!
//! The assembler drives the schema adapter, content classifier, media
//! resolver, and special-type classifier per question and accumulates the
//! final output collections. Rounds are emitted in document order, never
//! re-sorted.

use std::collections::HashMap;

use log::{debug, warn};
use roxmltree::{Document, Node};

use crate::pack::archive::PackageArchive;
use crate::pack::content::classify;
use crate::pack::index::NormalizedIndex;
use crate::pack::models::{
    FileStorageEntry, PackageContents, PackageMetadata, Question, QuestionKind, RoundKind,
};
use crate::pack::resolver::MediaResolver;
use crate::pack::schema::{element_child, element_children, slot_items, text_of, ContentSlot};
use crate::pack::special::classify_special;

/// Attribute/element spellings accepted for a question's score.
const SCORE_SPELLINGS: &[&str] = &["price", "cost", "value"];

/// Explicit marker value that makes a round final. Name-based heuristics
/// are rejected; a round merely named "Final" stays regular.
const FINAL_MARKER: &str = "final";

/// Walks the parsed document and produces the package contents.
pub(crate) fn assemble(
    doc: &Document,
    archive: &PackageArchive,
    index: &NormalizedIndex,
) -> PackageContents {
    let resolver = MediaResolver::new(archive, index);
    let package = doc.root_element();

    let mut questions = Vec::new();
    let mut file_storage = HashMap::new();
    let mut round_kinds = HashMap::new();
    let mut counter = 0usize;

    let round_nodes: Vec<Node> = element_child(package, "rounds")
        .map(|rounds| element_children(rounds, "round").collect())
        .unwrap_or_default();

    for (round_index, round) in round_nodes.iter().enumerate() {
        let round_name = node_name(*round, "Round", round_index);
        let kind = if round.attribute("type") == Some(FINAL_MARKER) {
            RoundKind::Final
        } else {
            RoundKind::Regular
        };
        round_kinds.insert(round_name.clone(), kind);

        let theme_nodes: Vec<Node> = element_child(*round, "themes")
            .map(|themes| element_children(themes, "theme").collect())
            .unwrap_or_default();

        for (theme_index, theme) in theme_nodes.iter().enumerate() {
            let category = node_name(*theme, "Theme", theme_index);

            let question_nodes: Vec<Node> = element_child(*theme, "questions")
                .map(|qs| element_children(qs, "question").collect())
                .unwrap_or_default();

            for question_node in question_nodes {
                counter += 1;
                let question = build_question(
                    question_node,
                    &resolver,
                    &round_name,
                    &category,
                    counter,
                );

                let entry = FileStorageEntry {
                    question: question.question_media.clone(),
                    answer: question.answer_media.clone(),
                };
                if !entry.is_empty() {
                    file_storage.insert(question.id.clone(), entry);
                }
                questions.push(question);
            }
        }
    }

    debug!(
        "Assembled {} questions across {} rounds",
        questions.len(),
        round_kinds.len()
    );

    PackageContents {
        questions,
        file_storage,
        round_kinds,
        metadata: package_metadata(package),
    }
}

fn build_question(
    node: Node,
    resolver: &MediaResolver<'_>,
    round: &str,
    category: &str,
    counter: usize,
) -> Question {
    let score = question_score(node);
    let question_payload = classify(&slot_items(node, ContentSlot::Question), resolver);
    let answer_payload = classify(&slot_items(node, ContentSlot::Answer), resolver);

    let mut kind = question_payload.kind;
    let mut answer_options = None;
    if is_select(node) {
        // An explicit select answer type overrides media classification.
        kind = QuestionKind::Select;
        answer_options = select_options(node);
    }

    let special = classify_special(node);
    let answer_text = answer_payload.text.or_else(|| right_answer_text(node));

    Question {
        id: question_id(round, category, score, counter),
        round: round.to_string(),
        category: category.to_string(),
        score,
        kind,
        question_text: question_payload.text,
        answer_text,
        answer_options,
        special: special.as_ref().map(|s| s.kind),
        special_description: special.map(|s| s.description),
        question_media: question_payload.media,
        answer_media: answer_payload.media,
    }
}

/// Name attribute of a round/theme node, with a positional fallback for
/// unnamed nodes.
fn node_name(node: Node, noun: &str, index: usize) -> String {
    match node.attribute("name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{} {}", noun, index + 1),
    }
}

/// Score from the accepted attribute/element spellings; the first value
/// that parses as a non-negative integer wins. Defaults to 0.
fn question_score(question: Node) -> u32 {
    let mut malformed = None;
    for spelling in SCORE_SPELLINGS {
        let raw = question
            .attributes()
            .find(|a| a.name().eq_ignore_ascii_case(spelling))
            .map(|a| a.value().to_string())
            .or_else(|| {
                question
                    .children()
                    .find(|c| c.is_element() && c.tag_name().name().eq_ignore_ascii_case(spelling))
                    .map(text_of)
            });
        if let Some(raw) = raw {
            if let Ok(score) = raw.trim().parse::<u32>() {
                return score;
            }
            malformed.get_or_insert(raw);
        }
    }
    if let Some(raw) = malformed {
        warn!("Malformed question score {:?}, defaulting to 0", raw);
    }
    0
}

/// Finds `params/param[@name=...]` under a question node.
fn named_param<'a, 'i>(question: Node<'a, 'i>, name: &'static str) -> Option<Node<'a, 'i>> {
    element_child(question, "params")
        .and_then(|params| element_children(params, "param").find(|p| p.attribute("name") == Some(name)))
}

/// True when the modern `answerType` param declares a select question.
fn is_select(question: Node) -> bool {
    named_param(question, "answerType")
        .map(text_of)
        .is_some_and(|value| value == "select")
}

/// Expands the grouped `answerOptions` param into ordered `"key: text"`
/// strings. Option text is read directly, or from the first nested
/// content item when absent.
fn select_options(question: Node) -> Option<Vec<String>> {
    let group = named_param(question, "answerOptions")?;
    let options: Vec<String> = element_children(group, "param")
        .map(|option| {
            let key = option.attribute("name").unwrap_or("");
            let mut text = text_of(option);
            if text.is_empty() {
                if let Some(item) = element_child(option, "item") {
                    text = text_of(item);
                }
            }
            format!("{}: {}", key, text)
        })
        .collect();
    if options.is_empty() {
        None
    } else {
        Some(options)
    }
}

/// Joins the `right/answer` texts; the separate right-answer field legacy
/// packages use instead of an answer content slot.
fn right_answer_text(question: Node) -> Option<String> {
    let right = element_child(question, "right")?;
    let answers: Vec<String> = element_children(right, "answer")
        .map(text_of)
        .filter(|answer| !answer.is_empty())
        .collect();
    if answers.is_empty() {
        None
    } else {
        Some(answers.join("\n"))
    }
}

/// Builds a question id from round, category, score, and a per-package
/// counter, stripped to `[A-Za-z0-9_-]`. The counter keeps ids unique
/// after the strip and stable across re-parses of the same archive.
fn question_id(round: &str, category: &str, score: u32, counter: usize) -> String {
    format!("{}_{}_{}_{}", round, category, score, counter)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn package_metadata(package: Node) -> PackageMetadata {
    let name = match package.attribute("name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Untitled Package".to_string(),
    };
    let version = package.attribute("version").map(str::to_string);
    let authors = element_child(package, "info")
        .and_then(|info| element_child(info, "authors"))
        .map(|authors| {
            element_children(authors, "author")
                .map(text_of)
                .filter(|author| !author.is_empty())
                .collect()
        })
        .unwrap_or_default();

    PackageMetadata {
        name,
        version,
        authors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_node_of<'a, 'i>(doc: &'a Document<'i>) -> Node<'a, 'i> {
        doc.root()
            .descendants()
            .find(|n| n.has_tag_name("question"))
            .expect("question node")
    }

    #[test]
    fn score_accepts_multiple_spellings_and_cases() {
        for xml in [
            r#"<question price="100"/>"#,
            r#"<question Price="100"/>"#,
            r#"<question cost="100"/>"#,
            r#"<question value="100"/>"#,
            r#"<question><COST>100</COST></question>"#,
        ] {
            let doc = Document::parse(xml).expect("parse");
            assert_eq!(question_score(question_node_of(&doc)), 100, "for {}", xml);
        }
    }

    #[test]
    fn malformed_or_missing_score_defaults_to_zero() {
        for xml in [
            r#"<question price="lots"/>"#,
            r#"<question price="-100"/>"#,
            r#"<question/>"#,
        ] {
            let doc = Document::parse(xml).expect("parse");
            assert_eq!(question_score(question_node_of(&doc)), 0, "for {}", xml);
        }
    }

    #[test]
    fn malformed_first_spelling_falls_through_to_next() {
        let doc = Document::parse(r#"<question price="lots" cost="250"/>"#).expect("parse");
        assert_eq!(question_score(question_node_of(&doc)), 250);
    }

    #[test]
    fn question_ids_keep_only_safe_characters() {
        let id = question_id("Round 1", "Кошки & dogs", 100, 7);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        assert!(id.ends_with("_7"));
    }

    #[test]
    fn select_options_preserve_declared_order() {
        let doc = Document::parse(
            r#"<question price="100">
                 <params>
                   <param name="answerType">select</param>
                   <param name="answerOptions" type="group">
                     <param name="A" type="content"><item>Paris</item></param>
                     <param name="B">London</param>
                   </param>
                 </params>
               </question>"#,
        )
        .expect("parse");
        let question = question_node_of(&doc);

        assert!(is_select(question));
        let options = select_options(question).expect("options");
        assert_eq!(options, vec!["A: Paris".to_string(), "B: London".to_string()]);
    }
}
