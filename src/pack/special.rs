//! Special-round classification from a question's declared type name.
//!
//! A declared type marks a question for non-default play (cat-in-bag,
//! sponsored bet, secret hand-off, stake auction) and carries rule text
//! the host reads out. Unknown or absent names mean an ordinary question.

use roxmltree::Node;

use crate::pack::models::SpecialKind;
use crate::pack::schema::{element_child, element_children, text_of};

const BET_RULE: &str = "Sponsored question: played for free, a correct answer still scores.";
const AUCTION_RULE: &str = "Stake question: players bid and the highest bidder answers.";

/// Classification result: the marker plus host-facing rule text.
pub(crate) struct SpecialInfo {
    pub kind: SpecialKind,
    pub description: String,
}

/// Reads the declared type name case-insensitively and maps it to a
/// special-round marker.
///
/// The name comes from a nested `type` element's `name` attribute, or,
/// for legacy packages, from a `type` attribute directly on the question
/// node.
pub(crate) fn classify_special(question: Node) -> Option<SpecialInfo> {
    let type_element = element_child(question, "type");
    let declared = type_element
        .and_then(|t| t.attribute("name"))
        .or_else(|| question.attribute("type"))?;

    // Nested rule params hang off whichever node declared the type.
    let host = type_element.unwrap_or(question);

    match declared.to_lowercase().as_str() {
        "bagcat" | "cat" => Some(SpecialInfo {
            kind: SpecialKind::Cat,
            description: format!(
                "Theme: {}, Cost: {}",
                rule_param(question, host, "theme").unwrap_or_else(|| "?".to_string()),
                rule_param(question, host, "cost").unwrap_or_else(|| "?".to_string()),
            ),
        }),
        "sponsored" => Some(SpecialInfo {
            kind: SpecialKind::Bet,
            description: BET_RULE.to_string(),
        }),
        "secret" => Some(SpecialInfo {
            kind: SpecialKind::Special,
            description: secret_rule(question, host).to_string(),
        }),
        "stake" => Some(SpecialInfo {
            kind: SpecialKind::Auction,
            description: AUCTION_RULE.to_string(),
        }),
        _ => None,
    }
}

/// Looks up a rule parameter: nested `param` elements first (on the type
/// element or in the question's params collection), attributes on the
/// declaring node as the fallback.
fn rule_param(question: Node, host: Node, name: &'static str) -> Option<String> {
    element_children(host, "param")
        .chain(
            element_child(question, "params")
                .into_iter()
                .flat_map(|params| element_children(params, "param")),
        )
        .find(|p| p.attribute("name") == Some(name))
        .map(text_of)
        .filter(|value| !value.is_empty())
        .or_else(|| host.attribute(name).map(str::to_string))
}

fn secret_rule(question: Node, host: Node) -> &'static str {
    match rule_param(question, host, "selectionMode").as_deref() {
        Some("exceptCurrent") => "Secret question: give it to another player.",
        Some("current") => "Secret question: you play it yourself.",
        Some("any") => "Secret question: the holder chooses who plays it.",
        _ => "Secret question.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(xml: &str) -> Option<SpecialInfo> {
        let doc = roxmltree::Document::parse(xml).expect("parse");
        let question = doc
            .root()
            .descendants()
            .find(|n| n.has_tag_name("question"))
            .expect("question node");
        classify_special(question)
    }

    #[test]
    fn bagcat_reads_nested_params() {
        let info = classify(
            r#"<question price="0">
                 <type name="bagcat">
                   <param name="theme">Cats</param>
                   <param name="cost">500</param>
                 </type>
               </question>"#,
        )
        .expect("special");
        assert_eq!(info.kind, SpecialKind::Cat);
        assert!(info.description.contains("Cats"));
        assert!(info.description.contains("500"));
    }

    #[test]
    fn bagcat_falls_back_to_attributes() {
        let info = classify(
            r#"<question price="0">
                 <type name="cat" theme="Dogs" cost="300"/>
               </question>"#,
        )
        .expect("special");
        assert_eq!(info.kind, SpecialKind::Cat);
        assert!(info.description.contains("Dogs"));
        assert!(info.description.contains("300"));
    }

    #[test]
    fn secret_varies_by_selection_mode() {
        let give_away = classify(
            r#"<question price="0" type="secret">
                 <params><param name="selectionMode">exceptCurrent</param></params>
               </question>"#,
        )
        .expect("special");
        assert_eq!(give_away.kind, SpecialKind::Special);
        assert!(give_away.description.contains("another player"));

        let generic = classify(r#"<question price="0" type="secret"/>"#).expect("special");
        assert_eq!(generic.description, "Secret question.");
    }

    #[test]
    fn sponsored_and_stake_use_fixed_text() {
        let bet = classify(r#"<question price="0"><type name="sponsored"/></question>"#)
            .expect("special");
        assert_eq!(bet.kind, SpecialKind::Bet);

        let auction = classify(r#"<question price="0"><type name="STAKE"/></question>"#)
            .expect("special");
        assert_eq!(auction.kind, SpecialKind::Auction);
    }

    #[test]
    fn unknown_or_absent_type_is_ordinary() {
        assert!(classify(r#"<question price="0"/>"#).is_none());
        assert!(classify(r#"<question price="0"><type name="simple"/></question>"#).is_none());
    }
}
