//! Human-readable caption of a form control
//!
//! Strategies run in priority order; the first non-empty result wins.

use crate::dom::{Document, NodeId};

type LabelStrategy = fn(&Document, NodeId) -> Option<String>;

const LABEL_STRATEGIES: &[LabelStrategy] = &[
    label_for,
    aria_label,
    aria_labelledby,
    ancestor_label,
    placeholder,
    title,
    name_or_id,
];

/// Best caption for `node`, or an empty string when nothing yields text
pub fn resolve_label(doc: &Document, node: NodeId) -> String {
    LABEL_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(doc, node))
        .unwrap_or_default()
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// <label for="id">
fn label_for(doc: &Document, node: NodeId) -> Option<String> {
    let id = doc.attr(node, "id").filter(|id| !id.is_empty())?;
    let label = doc
        .elements()
        .find(|&el| doc.is_tag(el, "label") && doc.attr(el, "for") == Some(id))?;
    non_empty(&doc.text_content(label))
}

fn aria_label(doc: &Document, node: NodeId) -> Option<String> {
    non_empty(doc.attr(node, "aria-label")?)
}

// aria-labelledby holds a space-separated id list
fn aria_labelledby(doc: &Document, node: NodeId) -> Option<String> {
    let ids = doc.attr(node, "aria-labelledby")?;
    let text = ids
        .split_whitespace()
        .filter_map(|id| doc.element_by_id(id))
        .filter_map(|el| non_empty(&doc.text_content(el)))
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(&text)
}

fn ancestor_label(doc: &Document, node: NodeId) -> Option<String> {
    doc.ancestors(node)
        .filter(|&a| doc.is_tag(a, "label"))
        .find_map(|label| non_empty(&doc.text_content(label)))
}

fn placeholder(doc: &Document, node: NodeId) -> Option<String> {
    non_empty(doc.attr(node, "placeholder")?)
}

fn title(doc: &Document, node: NodeId) -> Option<String> {
    non_empty(doc.attr(node, "title")?)
}

fn name_or_id(doc: &Document, node: NodeId) -> Option<String> {
    let raw = doc
        .attr(node, "name")
        .filter(|n| !n.is_empty())
        .or_else(|| doc.attr(node, "id"))?;
    non_empty(&raw.replace(['-', '_'], " "))
}
