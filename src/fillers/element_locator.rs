//! Re-locating a control from a sparse `(id, name)` pair
//!
//! The document being filled may be a re-render of the one extracted, so an
//! id can have turned into a name or a name may have gained a prefix.

use crate::dom::{Document, NodeId};

pub fn locate_element(doc: &Document, id: &str, name: &str) -> Option<NodeId> {
    let by_id = || {
        if id.is_empty() {
            return None;
        }
        doc.element_by_id(id)
            .or_else(|| first_with_name(doc, |n| n == id))
    };
    let by_name = || {
        if name.is_empty() {
            return None;
        }
        first_with_name(doc, |n| n == name)
            .or_else(|| first_with_name(doc, |n| n.contains(name)))
    };

    by_id().or_else(by_name)
}

fn first_with_name(doc: &Document, matches: impl Fn(&str) -> bool) -> Option<NodeId> {
    doc.elements()
        .find(|&el| doc.attr(el, "name").is_some_and(&matches))
}
