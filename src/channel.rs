//! Host binding
//!
//! Entry points used by an embedding application. Results are posted as JSON
//! through a one-way [`MessageChannel`]; extraction and filling never depend
//! on delivery succeeding.

use serde::Serialize;

use crate::config::AutofillConfig;
use crate::dom::Document;
use crate::error::{AutofillError, Result};
use crate::extractors::extract_fields_with;
use crate::fillers::fill_fields_with;
use crate::model::{FieldManifest, FillReport, ValueEntry};

/// Fire-and-forget message sink provided by the host
pub trait MessageChannel {
    fn post_message(&mut self, message: &str);
}

impl<F> MessageChannel for F
where
    F: FnMut(&str),
{
    fn post_message(&mut self, message: &str) {
        (*self)(message)
    }
}

/// Message announcing a finished fill
#[derive(Debug, Serialize)]
pub struct FillCompleteMessage<'a> {
    pub event: &'static str,
    #[serde(flatten)]
    pub report: &'a FillReport,
}

impl<'a> FillCompleteMessage<'a> {
    pub fn new(report: &'a FillReport) -> Self {
        Self {
            event: "fill_complete",
            report,
        }
    }
}

/// Parse a Value Manifest (JSON array of `{id, name, value}`)
pub fn parse_value_manifest(json: &str) -> Result<Vec<ValueEntry>> {
    serde_json::from_str(json).map_err(AutofillError::MalformedManifest)
}

/// Extract the Field Manifest and post it as `{fields, fieldCount}`
pub fn run_extraction(
    doc: &Document,
    config: &AutofillConfig,
    channel: Option<&mut dyn MessageChannel>,
) -> FieldManifest {
    let manifest = extract_fields_with(doc, config);
    log::debug!("extracted {} fields", manifest.field_count);

    match channel {
        Some(channel) => post_json(channel, "field manifest", &manifest),
        None => log::warn!("Autofill channel not available; field manifest not delivered"),
    }
    manifest
}

/// Apply a Value Manifest and post `{event: "fill_complete", ...}`.
///
/// Malformed JSON aborts before anything is touched and posts nothing.
pub fn run_fill(
    doc: &mut Document,
    mappings_json: &str,
    config: &AutofillConfig,
    channel: Option<&mut dyn MessageChannel>,
) -> Result<FillReport> {
    let entries = parse_value_manifest(mappings_json).inspect_err(|e| log::error!("{e}"))?;
    let report = fill_fields_with(doc, &entries, config);
    log::debug!("filled {}, skipped {}", report.filled, report.skipped);

    match channel {
        Some(channel) => post_json(channel, "fill report", &FillCompleteMessage::new(&report)),
        None => log::warn!("Autofill channel not available; fill report not delivered"),
    }
    Ok(report)
}

fn post_json<T: Serialize>(channel: &mut dyn MessageChannel, what: &'static str, payload: &T) {
    match serde_json::to_string(payload) {
        Ok(json) => channel.post_message(&json),
        Err(source) => log::error!("{}", AutofillError::Serialize { what, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[derive(Default)]
    struct Recorder {
        messages: Vec<String>,
    }

    impl MessageChannel for Recorder {
        fn post_message(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    const FARM_FORM: &str = r#"
    <form>
        <label for="farmName">Farm Name</label>
        <input id="farmName" type="text">
        <select id="crop"><option value="1">Wheat</option><option value="2">Rice</option></select>
    </form>
    "#;

    #[test]
    fn test_extraction_posts_manifest() {
        let doc = Document::parse(FARM_FORM);
        let mut recorder = Recorder::default();
        let manifest = run_extraction(&doc, &AutofillConfig::default(), Some(&mut recorder));

        assert_eq!(recorder.messages.len(), 1);
        let posted: Value = serde_json::from_str(&recorder.messages[0]).unwrap();
        assert_eq!(posted["fieldCount"], 2);
        assert_eq!(posted["fields"][0]["label"], "Farm Name");
        assert_eq!(posted["fields"][0]["type"], "text");
        assert_eq!(posted["fields"][0]["value"], "");
        assert_eq!(manifest.field_count, 2);
    }

    #[test]
    fn test_extraction_without_channel_still_returns() {
        let doc = Document::parse(FARM_FORM);
        let manifest = run_extraction(&doc, &AutofillConfig::default(), None);
        assert_eq!(manifest.fields.len(), 2);
    }

    #[test]
    fn test_fill_posts_fill_complete() {
        let mut doc = Document::parse(FARM_FORM);
        let mut recorder = Recorder::default();
        let report = run_fill(
            &mut doc,
            r#"[{"id": "farmName", "value": "Green Acres"}]"#,
            &AutofillConfig::default(),
            Some(&mut recorder),
        )
        .unwrap();

        assert_eq!(report.filled, 1);
        let posted: Value = serde_json::from_str(&recorder.messages[0]).unwrap();
        assert_eq!(
            posted,
            serde_json::json!({
                "event": "fill_complete",
                "filled": 1,
                "skipped": 0,
                "results": [{"id": "farmName", "status": "filled"}]
            })
        );
        let input = doc.element_by_id("farmName").unwrap();
        assert_eq!(doc.value(input), "Green Acres");
    }

    #[test]
    fn test_malformed_manifest_aborts() {
        let mut doc = Document::parse(FARM_FORM);
        let before = doc.to_html();
        let mut recorder = Recorder::default();
        let err = run_fill(
            &mut doc,
            r#"[{"id": "farmName", "value": "x"}"#,
            &AutofillConfig::default(),
            Some(&mut recorder),
        )
        .unwrap_err();

        assert!(matches!(err, AutofillError::MalformedManifest(_)));
        assert!(recorder.messages.is_empty());
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_closure_channel() {
        let doc = Document::parse(FARM_FORM);
        let mut count = 0;
        let mut channel = |_: &str| count += 1;
        run_extraction(&doc, &AutofillConfig::default(), Some(&mut channel));
        assert_eq!(count, 1);
    }
}
