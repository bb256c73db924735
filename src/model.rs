//! Wire types exchanged with the host
//!
//! The Field Manifest goes out after extraction, the Value Manifest comes in
//! for filling and the Fill Report goes back out. All of them are JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Input modality of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    TextArea,
    Checkbox,
    Radio,
    Select,
    /// Any other native input type: date, number, email, ...
    Other(String),
}

impl FieldKind {
    /// Map a control type (`input.type`, `textarea`, `select-one`, ...) to a kind
    pub fn from_control_type(control_type: &str) -> Self {
        match control_type {
            "select-one" | "select-multiple" => FieldKind::Select,
            other => FieldKind::from(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Select => "select",
            FieldKind::Other(kind) => kind,
        }
    }
}

impl From<String> for FieldKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "text" => FieldKind::Text,
            "textarea" => FieldKind::TextArea,
            "checkbox" => FieldKind::Checkbox,
            "radio" => FieldKind::Radio,
            "select" => FieldKind::Select,
            _ => FieldKind::Other(kind),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One `(value, displayed text)` choice of a select or radio group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub text: String,
}

/// One interactive control as seen at extraction time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub section: String,
    pub value: String,
    pub options: Vec<FieldOption>,
}

/// Snapshot of every data-bearing control in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub fields: Vec<Field>,
    #[serde(rename = "fieldCount")]
    pub field_count: usize,
}

impl FieldManifest {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            field_count: fields.len(),
            fields,
        }
    }
}

/// Value proposed for a field. JSON null or a missing value deserializes to
/// `None` on the owning [`ValueEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl FillValue {
    /// String form written into text-like controls
    pub fn to_text(&self) -> String {
        match self {
            FillValue::Flag(b) => b.to_string(),
            FillValue::Number(n) => n.to_string(),
            FillValue::Text(s) => s.clone(),
            FillValue::Other(v) => v.to_string(),
        }
    }

    /// Whether this value checks a checkbox
    pub fn is_truthy(&self, truthy_values: &[String]) -> bool {
        match self {
            FillValue::Flag(b) => *b,
            FillValue::Text(s) => truthy_values.iter().any(|t| t == s),
            _ => false,
        }
    }
}

/// One entry of the Value Manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub value: Option<FillValue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStatus {
    Filled,
    Skipped,
    NotFound,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillResult {
    pub id: String,
    pub status: FillStatus,
}

/// Outcome of one fill call: one result per entry, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    pub filled: usize,
    pub skipped: usize,
    pub results: Vec<FillResult>,
}

impl FillReport {
    /// Record an entry's outcome; everything but `filled` counts as skipped
    pub fn record(&mut self, id: &str, status: FillStatus) {
        if status == FillStatus::Filled {
            self.filled += 1;
        } else {
            self.skipped += 1;
        }
        self.results.push(FillResult {
            id: id.to_string(),
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serialization_shape() {
        let manifest = FieldManifest::new(vec![Field {
            id: "crop".into(),
            name: String::new(),
            label: "Crop".into(),
            kind: FieldKind::Select,
            section: String::new(),
            value: "1".into(),
            options: vec![FieldOption {
                value: "1".into(),
                text: "Wheat".into(),
            }],
        }]);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["fieldCount"], 1);
        assert_eq!(json["fields"][0]["type"], "select");
        assert_eq!(json["fields"][0]["options"][0]["text"], "Wheat");
    }

    #[test]
    fn test_field_kind_round_trips_native_types() {
        assert_eq!(FieldKind::from_control_type("select-multiple"), FieldKind::Select);
        assert_eq!(FieldKind::from_control_type("textarea"), FieldKind::TextArea);
        let date = FieldKind::from_control_type("date");
        assert_eq!(date, FieldKind::Other("date".into()));
        assert_eq!(date.as_str(), "date");
    }

    #[test]
    fn test_value_entry_variants() {
        let json = r#"[
            {"id": "a", "value": "x"},
            {"id": "b", "name": null, "value": null},
            {"name": "c"},
            {"id": "d", "value": true},
            {"id": "e", "value": 3.5},
            {"id": "f", "value": ["p", "q"]}
        ]"#;
        let entries: Vec<ValueEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].value, Some(FillValue::Text("x".into())));
        assert_eq!(entries[1].name, "");
        assert!(entries[1].value.is_none());
        assert_eq!(entries[2].id, "");
        assert!(entries[2].value.is_none());
        assert_eq!(entries[3].value, Some(FillValue::Flag(true)));
        assert_eq!(entries[4].value.as_ref().unwrap().to_text(), "3.5");
        assert_eq!(entries[5].value.as_ref().unwrap().to_text(), r#"["p","q"]"#);
    }

    #[test]
    fn test_checkbox_truthiness() {
        let truthy: Vec<String> = vec!["true".into(), "1".into(), "on".into()];
        assert!(FillValue::Flag(true).is_truthy(&truthy));
        assert!(FillValue::Text("on".into()).is_truthy(&truthy));
        assert!(!FillValue::Text("ON".into()).is_truthy(&truthy));
        assert!(!FillValue::Text("yes".into()).is_truthy(&truthy));
        assert!(!FillValue::Flag(false).is_truthy(&truthy));
    }

    #[test]
    fn test_report_counts() {
        let mut report = FillReport::default();
        report.record("a", FillStatus::Filled);
        report.record("b", FillStatus::NotFound);
        report.record("c", FillStatus::NoMatch);
        assert_eq!(report.filled, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.results.len(), 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][1]["status"], "not_found");
    }
}
