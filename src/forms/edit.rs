//! Mapping of the page editor's submission onto a page record.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::auth::validate;
use crate::forms::field::{FieldKind, FieldSpec};
use crate::forms::posted::PostedForm;
use crate::models::page::{LAYOUTS, PageRecord, PageType, ROOT_PARENT};

/// Characters removed from menu slugs.
const SLUG_BLACKLIST: [char; 19] = [
    ' ', '/', '\\', '\'', '"', ';', '~', '?', '&', '@', '#', '$', '%', '^', '*', '(', ')', '+', '=',
];

/// Format of the editor's `datetime-local` input.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn sanitize_slug(raw: &str) -> String {
    raw.chars()
        .filter(|c| !SLUG_BLACKLIST.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Parse a `datetime-local` value (seconds optional). Blank or unparsable
/// input falls back to `now`.
pub fn parse_visible_from(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return now;
    }
    NaiveDateTime::parse_from_str(raw, DATETIME_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|e| {
            log::warn!("Unparsable visible-from date '{raw}': {e}");
            now
        })
}

/// Rebuild a form schema from the builder's parallel `fieldname[]`,
/// `fieldtype[]`, `fieldrequired[]`, `defaultvalue[]` and `readsfrom[]`
/// arrays. Rows without a name are dropped.
pub fn schema_from_builder(posted: &PostedForm) -> Vec<FieldSpec> {
    let names = posted.get_all("fieldname[]");
    let types = posted.get_all("fieldtype[]");
    let required = posted.get_all("fieldrequired[]");
    let defaults = posted.get_all("defaultvalue[]");
    let reads_from = posted.get_all("readsfrom[]");

    names
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().is_empty())
        .map(|(i, name)| {
            let source = reads_from.get(i).map(|s| s.trim()).unwrap_or("");
            FieldSpec {
                name: name.trim().to_string(),
                kind: types.get(i).map(|t| FieldKind::from_label(t)).unwrap_or(FieldKind::Text),
                required: required.get(i).is_some_and(|r| r.trim().eq_ignore_ascii_case("yes")),
                default_value: defaults.get(i).map(|d| d.to_string()).unwrap_or_default(),
                source_profile_field: (!source.is_empty()).then(|| source.to_string()),
            }
        })
        .collect()
}

/// Build the record to persist for page `id` (0 for a new page).
pub fn record_from_posted(id: i64, posted: &PostedForm, now: DateTime<Utc>) -> PageRecord {
    let field = |key: &str| posted.get(key).unwrap_or("").to_string();
    let page_type = PageType::parse(&field("page_type")).unwrap_or(PageType::Page);
    let layout = field("layout");
    let notify_email = field("notify_email").trim().to_string();

    PageRecord {
        id,
        parent_id: field("parent_id").trim().parse().unwrap_or(ROOT_PARENT),
        name: field("name").trim().to_string(),
        menu_slug: sanitize_slug(&field("menu_slug")),
        sort_order: field("sort_order").trim().parse().unwrap_or(0),
        page_type,
        access_rule: field("access_rule").trim().to_string(),
        visible_from: parse_visible_from(&field("visible_from"), now),
        on_menu: matches!(posted.get("on_menu"), Some(v) if v != "0"),
        content: field("content"),
        form_schema: if page_type == PageType::Form { schema_from_builder(posted) } else { Vec::new() },
        notify_email: (!notify_email.is_empty()).then_some(notify_email),
        layout: if LAYOUTS.contains(&layout.as_str()) { layout } else { LAYOUTS[0].to_string() },
    }
}

/// Problems that keep a record from being saved.
pub fn validate_record(record: &PageRecord) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&record.name, "Name", 255));
    errors.extend(validate::validate_optional(&record.menu_slug, "Menu name", 255));
    errors.extend(validate::validate_optional(&record.access_rule, "Access rule", 1000));
    if let Some(email) = &record.notify_email {
        errors.extend(validate::validate_email(email));
    }
    if record.id != 0 && record.parent_id == record.id {
        errors.push("A page cannot be its own parent".to_string());
    }
    errors
}
