//! Field Manifest extraction
//!
//! One forward scan over the document's controls. Radio buttons sharing a
//! grouping key are merged into a single field and appended after all other
//! fields, in the order their group was first seen.

use std::collections::HashMap;

use crate::config::AutofillConfig;
use crate::dom::{Document, NodeId};
use crate::model::{Field, FieldKind, FieldManifest, FieldOption};

use super::label_resolver::resolve_label;
use super::section_resolver::resolve_section;

/// Extract the Field Manifest with the default configuration
pub fn extract_fields(doc: &Document) -> FieldManifest {
    extract_fields_with(doc, &AutofillConfig::default())
}

pub fn extract_fields_with(doc: &Document, config: &AutofillConfig) -> FieldManifest {
    let mut fields = Vec::new();
    let mut radio_groups = RadioGroups::default();

    for node in doc.elements() {
        let Some(control_type) = control_type(doc, node) else {
            continue;
        };
        if config.is_excluded(control_type) {
            continue;
        }

        let label = resolve_label(doc, node);
        let section = resolve_section(doc, node, config);

        if control_type == "radio" {
            radio_groups.add(doc, node, label, section);
            continue;
        }

        let kind = FieldKind::from_control_type(control_type);
        let options = if kind == FieldKind::Select {
            select_options(doc, node)
        } else {
            Vec::new()
        };

        fields.push(Field {
            id: attr_or_empty(doc, node, "id"),
            name: attr_or_empty(doc, node, "name"),
            label,
            kind,
            section,
            value: doc.value(node),
            options,
        });
    }

    fields.extend(radio_groups.into_fields());
    FieldManifest::new(fields)
}

/// Type of an input-capable node the way `element.type` reads it
pub fn control_type(doc: &Document, node: NodeId) -> Option<&'static str> {
    match doc.tag_name(node)? {
        "input" => doc.input_type(node),
        "textarea" => Some("textarea"),
        "select" if doc.attr(node, "multiple").is_some() => Some("select-multiple"),
        "select" => Some("select-one"),
        _ => None,
    }
}

/// Grouping key of a radio: name, else id, else resolved label
pub fn radio_group_key(doc: &Document, node: NodeId) -> String {
    [doc.attr(node, "name"), doc.attr(node, "id")]
        .into_iter()
        .flatten()
        .find(|key| !key.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| resolve_label(doc, node))
}

fn attr_or_empty(doc: &Document, node: NodeId, name: &str) -> String {
    doc.attr(node, name).unwrap_or_default().to_string()
}

fn select_options(doc: &Document, select: NodeId) -> Vec<FieldOption> {
    doc.options(select)
        .into_iter()
        .map(|option| FieldOption {
            value: doc.option_value(option),
            text: doc.option_text(option).trim().to_string(),
        })
        .collect()
}

// Ordered map local to one extraction call
#[derive(Default)]
struct RadioGroups {
    groups: Vec<Field>,
    index: HashMap<String, usize>,
}

impl RadioGroups {
    fn add(&mut self, doc: &Document, node: NodeId, label: String, section: String) {
        let key = radio_group_key(doc, node);
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.groups.push(Field {
                    id: attr_or_empty(doc, node, "id"),
                    name: attr_or_empty(doc, node, "name"),
                    label: label.clone(),
                    kind: FieldKind::Radio,
                    section,
                    value: String::new(),
                    options: Vec::new(),
                });
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[position];
        let value = doc.value(node);
        if doc.checked(node) {
            group.value = value.clone();
        }
        group.options.push(FieldOption { value, text: label });
    }

    fn into_fields(self) -> Vec<Field> {
        self.groups
    }
}
