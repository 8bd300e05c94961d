use serde::{Deserialize, Serialize};

/// The control a form field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Numeric,
    Checkbox,
    Select,
    Html,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Text,
        FieldKind::TextArea,
        FieldKind::Email,
        FieldKind::Numeric,
        FieldKind::Checkbox,
        FieldKind::Select,
        FieldKind::Html,
    ];

    /// Label as stored in the schema and shown in the form builder.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::TextArea => "Text Area",
            FieldKind::Email => "Email",
            FieldKind::Numeric => "Numeric",
            FieldKind::Checkbox => "Checkbox",
            FieldKind::Select => "Select",
            FieldKind::Html => "HTML",
        }
    }

    /// Parse a stored type label. Unknown labels render as plain text inputs.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        FieldKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| {
                log::warn!("Unknown form field type '{trimmed}', treating as Text");
                FieldKind::Text
            })
    }

    /// `type` attribute for kinds rendered as a generic `<input>`.
    pub fn input_type(self) -> String {
        self.label().to_lowercase()
    }
}

/// One field of a form page's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredField", into = "StoredField")]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Placeholder text, or the option list for Select fields.
    pub default_value: String,
    /// Profile attribute used to prefill the control.
    pub source_profile_field: Option<String>,
}

impl FieldSpec {
    /// Key the field's value is posted under.
    pub fn post_key(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// `id` attribute of the rendered control.
    pub fn element_id(&self) -> String {
        self.name.replace(' ', "")
    }

    /// HTML blocks carry no value and are never validated or mailed.
    pub fn is_input(&self) -> bool {
        self.kind != FieldKind::Html
    }
}

/// On-disk shape of a field; keeps schemas written by older editors readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredField {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    field_type: String,
    #[serde(default)]
    required: String,
    #[serde(rename = "defaultvalue", default)]
    default_value: String,
    #[serde(rename = "readsfrom", default)]
    reads_from: String,
}

impl From<StoredField> for FieldSpec {
    fn from(raw: StoredField) -> Self {
        let reads_from = raw.reads_from.trim();
        FieldSpec {
            name: raw.name,
            kind: FieldKind::from_label(&raw.field_type),
            required: raw.required.trim().eq_ignore_ascii_case("yes"),
            default_value: raw.default_value,
            source_profile_field: (!reads_from.is_empty()).then(|| reads_from.to_string()),
        }
    }
}

impl From<FieldSpec> for StoredField {
    fn from(field: FieldSpec) -> Self {
        StoredField {
            name: field.name,
            field_type: field.kind.label().to_string(),
            required: if field.required { "Yes" } else { "No" }.to_string(),
            default_value: field.default_value,
            reads_from: field.source_profile_field.unwrap_or_default(),
        }
    }
}

/// Parse a stored schema. A blank schema is an empty field list.
pub fn parse_schema(json: &str) -> Result<Vec<FieldSpec>, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json)
}

pub fn encode_schema(fields: &[FieldSpec]) -> Result<String, serde_json::Error> {
    if fields.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(fields)
}
