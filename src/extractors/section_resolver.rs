//! Caption of the logical group a control sits in
//!
//! Walks ancestors from the parent up to `body`, looking for a fieldset
//! legend, a heading ancestor, or a heading that precedes an ancestor.
//! Structural proxy only; unconventional heading layouts may resolve wrong.

use crate::config::AutofillConfig;
use crate::dom::{Document, NodeId};

use super::label_resolver::non_empty;

pub fn resolve_section(doc: &Document, node: NodeId, config: &AutofillConfig) -> String {
    for ancestor in doc.ancestors(node) {
        let Some(tag) = doc.tag_name(ancestor) else {
            break;
        };
        if tag == "body" {
            break;
        }

        if tag == "fieldset" {
            let legend = doc
                .child_elements(ancestor)
                .find(|&c| doc.is_tag(c, "legend"))
                .and_then(|legend| non_empty(&doc.text_content(legend)));
            if let Some(legend) = legend {
                return legend;
            }
        }

        if let Some(text) = heading_text(doc, ancestor, config) {
            return text;
        }

        if let Some(text) = doc
            .preceding_element_siblings(ancestor)
            .find_map(|sibling| heading_text(doc, sibling, config))
        {
            return text;
        }
    }
    String::new()
}

fn heading_text(doc: &Document, node: NodeId, config: &AutofillConfig) -> Option<String> {
    let level = heading_level(doc.tag_name(node)?)?;
    if !config.is_heading_level(level) {
        return None;
    }
    non_empty(&doc.text_content(node))
}

fn heading_level(tag: &str) -> Option<u8> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<u8>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}
