use std::collections::BTreeMap;

use crate::forms::field::{FieldKind, FieldSpec};
use crate::forms::posted::PostedForm;

/// Outcome of validating a submission: field name to error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field_name: &str) -> Option<&str> {
        self.errors.get(field_name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    fn record(&mut self, field: &FieldSpec, message: String) {
        self.errors.insert(field.name.clone(), message);
    }
}

/// PHP-style numeric check: optional sign, digits with an optional fraction
/// and exponent, surrounding whitespace allowed.
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let well_formed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    well_formed
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Check every required, non-HTML field. Rules are independent, so a later
/// failing rule replaces an earlier message for the same field.
pub fn validate(fields: &[FieldSpec], posted: &PostedForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in fields.iter().filter(|f| f.required && f.is_input()) {
        let value = posted.field_value(field).unwrap_or("");

        if field.kind == FieldKind::Email && !(value.contains('@') && value.contains('.')) {
            report.record(field, format!("Please Supply a valid email address for {}", field.name));
        }

        if field.kind != FieldKind::Email && value.trim().is_empty() {
            report.record(field, format!("Please fill in {}", field.name));
        }

        if field.kind == FieldKind::Numeric && !is_numeric(value) {
            report.record(field, format!("Please provide a number for {}", field.name));
        }
    }

    report
}
