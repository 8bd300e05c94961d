//! HTML for a form page's fields.

use crate::forms::field::{FieldKind, FieldSpec};
use crate::forms::posted::{HONEYPOT, PostedForm, SUBMIT_MARKER};
use crate::forms::validate::ValidationReport;
use crate::models::profile::Profile;
use crate::text::escape_html;

const SELECT_PROMPT: &str = "Please Select an option";

/// Render the form: one control per field, the honeypot and the submit button.
///
/// Controls are pre-filled from the posted values first, then from the actor's
/// profile for fields that read from one.
pub fn render_form_html(
    fields: &[FieldSpec],
    posted: &PostedForm,
    profile: &Profile,
    report: &ValidationReport,
) -> String {
    let mut html = String::from("<form method=\"post\" action=\"\" class=\"custompages-form\">");
    for field in fields {
        html.push_str(&render_field(field, posted, profile, report));
    }
    html.push_str(&format!(
        "<input type=\"text\" name=\"{HONEYPOT}\" value=\"\" tabindex=\"-1\" autocomplete=\"off\" \
         style=\"position:absolute;left:-99999px\" />\
         <button type=\"submit\" name=\"{SUBMIT_MARKER}\" value=\"1\" class=\"btn btn-primary\">Submit</button>\
         </form>"
    ));
    html
}

fn prefill<'a>(field: &FieldSpec, posted: &'a PostedForm, profile: &'a Profile) -> &'a str {
    posted
        .field_value(field)
        .or_else(|| field.source_profile_field.as_deref().and_then(|key| profile.get(key)))
        .unwrap_or("")
}

fn render_field(field: &FieldSpec, posted: &PostedForm, profile: &Profile, report: &ValidationReport) -> String {
    if field.kind == FieldKind::Html {
        return format!("<div class=\"form-break\">{}</div>", field.name);
    }

    let name = escape_html(&field.post_key());
    let id = escape_html(&field.element_id());
    let label = escape_html(&field.name);
    let value = prefill(field, posted, profile);
    let required = if field.required { " required" } else { "" };
    let error = report.error_for(&field.name);
    let error_class = if error.is_some() { " has-error" } else { "" };
    let error_html = error
        .map(|msg| format!("<span class=\"help-block\">{}</span>", escape_html(msg)))
        .unwrap_or_default();

    match field.kind {
        FieldKind::TextArea => format!(
            "<div class=\"form-group{error_class}\"><label for=\"{id}\">{label}</label>\
             <textarea class=\"form-control\" name=\"{name}\" id=\"{id}\" placeholder=\"{placeholder}\"{required}>{value}</textarea>\
             {error_html}</div>",
            placeholder = escape_html(&field.default_value),
            value = escape_html(value),
        ),
        FieldKind::Checkbox => {
            let checked = if !value.is_empty() && value != "0" { " checked" } else { "" };
            format!(
                "<div class=\"checkbox{error_class}\"><label for=\"{id}\">\
                 <input type=\"hidden\" name=\"{name}\" value=\"0\" />\
                 <input type=\"checkbox\" name=\"{name}\" id=\"{id}\" value=\"1\"{checked}{required} /> {label}</label>\
                 {error_html}</div>"
            )
        }
        FieldKind::Select => format!(
            "<div class=\"form-group{error_class}\"><label for=\"{id}\">{label}</label>\
             <select class=\"form-control\" name=\"{name}\" id=\"{id}\"{required}>{options}</select>\
             {error_html}</div>",
            options = render_options(&field.default_value, value),
        ),
        _ => format!(
            "<div class=\"form-group{error_class}\"><label for=\"{id}\">{label}</label>\
             <input type=\"{input_type}\" class=\"form-control\" name=\"{name}\" id=\"{id}\" \
             value=\"{value}\" placeholder=\"{placeholder}\"{required} />\
             {error_html}</div>",
            input_type = field.kind.input_type(),
            value = escape_html(value),
            placeholder = escape_html(&field.default_value),
        ),
    }
}

/// One `<option>` per line of `value|label`; the label defaults to the value.
fn render_options(lines: &str, selected: &str) -> String {
    let mut html = String::new();
    for line in lines.lines() {
        let (value, label) = match line.split_once('|') {
            Some((v, l)) => (v.trim(), l.trim()),
            None => (line.trim(), ""),
        };
        let label = match (value.is_empty(), label.is_empty()) {
            (_, false) => label,
            (true, true) => SELECT_PROMPT,
            (false, true) => value,
        };
        let is_selected = if value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{is_selected}>{}</option>",
            escape_html(value),
            escape_html(label)
        ));
    }
    html
}
