//! Applying a Value Manifest to a live document
//!
//! Each entry is located, coerced to the control's modality and written
//! through the control's native value storage, then announced with the
//! focus / input / change / blur sequence so reactive frameworks pick it up.

use crate::config::AutofillConfig;
use crate::dom::{Document, EventKind, NodeId};
use crate::extractors::{control_type, radio_group_key};
use crate::model::{FieldOption, FillReport, FillStatus, FillValue, ValueEntry};

use super::element_locator::locate_element;
use super::select_matcher::match_option;

/// Fill with the default configuration
pub fn fill_fields(doc: &mut Document, entries: &[ValueEntry]) -> FillReport {
    fill_fields_with(doc, entries, &AutofillConfig::default())
}

pub fn fill_fields_with(
    doc: &mut Document,
    entries: &[ValueEntry],
    config: &AutofillConfig,
) -> FillReport {
    let mut report = FillReport::default();
    for entry in entries {
        let status = fill_entry(doc, entry, config);
        log::debug!("fill {:?}/{:?}: {:?}", entry.id, entry.name, status);
        report.record(&entry.id, status);
    }
    report
}

fn fill_entry(doc: &mut Document, entry: &ValueEntry, config: &AutofillConfig) -> FillStatus {
    let Some(value) = &entry.value else {
        return FillStatus::Skipped;
    };
    let Some(node) = locate_element(doc, &entry.id, &entry.name) else {
        return FillStatus::NotFound;
    };

    if doc.is_tag(node, "select") {
        return fill_select(doc, node, value);
    }

    match control_type(doc, node) {
        Some("checkbox") => {
            doc.set_checked(node, value.is_truthy(&config.checkbox_truthy_values));
            notify_change(doc, node);
            FillStatus::Filled
        }
        Some("radio") => fill_radio(doc, node, value),
        _ => {
            commit_value(doc, node, &value.to_text());
            notify_change(doc, node);
            FillStatus::Filled
        }
    }
}

fn fill_select(doc: &mut Document, select: NodeId, value: &FillValue) -> FillStatus {
    let option_nodes = doc.options(select);
    let options: Vec<FieldOption> = option_nodes
        .iter()
        .map(|&o| FieldOption {
            value: doc.option_value(o),
            text: doc.option_text(o),
        })
        .collect();

    let Some(index) = match_option(&options, &value.to_text()) else {
        return FillStatus::NoMatch;
    };
    commit_value(doc, select, &options[index].value);
    notify_change(doc, select);
    FillStatus::Filled
}

fn fill_radio(doc: &mut Document, target: NodeId, value: &FillValue) -> FillStatus {
    let key = radio_group_key(doc, target);
    let wanted = value.to_text().to_lowercase();

    let matches: Vec<NodeId> = doc
        .elements()
        .filter(|&el| doc.input_type(el) == Some("radio"))
        .filter(|&el| radio_group_key(doc, el) == key)
        .filter(|&el| doc.value(el).to_lowercase() == wanted)
        .collect();

    if matches.is_empty() {
        return FillStatus::NoMatch;
    }
    for radio in matches {
        doc.set_checked(radio, true);
        notify_change(doc, radio);
    }
    FillStatus::Filled
}

/// Write through base storage when the node has one, otherwise fall back to
/// plain assignment
fn commit_value(doc: &mut Document, node: NodeId, value: &str) {
    match doc.native_value_writer(node) {
        Some(writer) => writer.write(doc, node, value),
        None => {
            if !doc.assign_value(node, value) {
                log::debug!("value assignment discarded by setter override");
            }
        }
    }
}

fn notify_change(doc: &mut Document, node: NodeId) {
    for kind in EventKind::CHANGE_SEQUENCE {
        doc.dispatch_event(node, kind, true);
    }
}
