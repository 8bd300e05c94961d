use askama::Template;

use crate::forms::edit::DATETIME_INPUT_FORMAT;
use crate::forms::field::{FieldKind, FieldSpec};
use crate::models::page::{LAYOUTS, Page, PageRecord, PageType, ROOT_PARENT};
use crate::models::setting::SettingDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "admin/pages.html")]
pub struct PageListTemplate {
    pub ctx: PageContext,
    pub list_html: String,
}

#[derive(Template)]
#[template(path = "admin/page_form.html")]
pub struct PageFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub page: PageFormView,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub ctx: PageContext,
    pub settings: Vec<SettingDisplay>,
}

/// An `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self { value: value.into(), label: label.into(), selected }
    }
}

/// One row of the form builder.
pub struct FieldRow {
    pub name: String,
    pub type_options: Vec<SelectOption>,
    pub required: bool,
    pub default_value: String,
    pub reads_from: String,
}

impl FieldRow {
    fn from_spec(field: Option<&FieldSpec>) -> Self {
        let kind = field.map(|f| f.kind).unwrap_or(FieldKind::Text);
        Self {
            name: field.map(|f| f.name.clone()).unwrap_or_default(),
            type_options: FieldKind::ALL
                .iter()
                .map(|k| SelectOption::new(k.label(), k.label(), *k == kind))
                .collect(),
            required: field.is_some_and(|f| f.required),
            default_value: field.map(|f| f.default_value.clone()).unwrap_or_default(),
            reads_from: field.and_then(|f| f.source_profile_field.clone()).unwrap_or_default(),
        }
    }
}

/// Editor values with select boxes resolved.
pub struct PageFormView {
    pub id: i64,
    pub name: String,
    pub menu_slug: String,
    pub sort_order: i32,
    pub parent_options: Vec<SelectOption>,
    pub type_options: Vec<SelectOption>,
    pub access_rule: String,
    pub visible_from: String,
    pub on_menu: bool,
    pub content: String,
    pub notify_email: String,
    pub layout_options: Vec<SelectOption>,
    pub is_form: bool,
    /// Existing fields plus one empty row for adding a field.
    pub fields: Vec<FieldRow>,
}

impl PageFormView {
    /// `pages` offers the possible parents; the page itself is left out.
    pub fn new(record: &PageRecord, pages: &[Page]) -> Self {
        let mut parent_options = vec![SelectOption::new(
            ROOT_PARENT.to_string(),
            "(top level)",
            record.parent_id == ROOT_PARENT,
        )];
        parent_options.extend(
            pages
                .iter()
                .filter(|p| p.id != record.id)
                .map(|p| SelectOption::new(p.id.to_string(), p.name.clone(), p.id == record.parent_id)),
        );

        let mut fields: Vec<FieldRow> = record.form_schema.iter().map(|f| FieldRow::from_spec(Some(f))).collect();
        fields.push(FieldRow::from_spec(None));

        Self {
            id: record.id,
            name: record.name.clone(),
            menu_slug: record.menu_slug.clone(),
            sort_order: record.sort_order,
            parent_options,
            type_options: PageType::ALL
                .iter()
                .map(|t| SelectOption::new(t.as_str(), t.label(), *t == record.page_type))
                .collect(),
            access_rule: record.access_rule.clone(),
            visible_from: record.visible_from.format(DATETIME_INPUT_FORMAT).to_string(),
            on_menu: record.on_menu,
            content: record.content.clone(),
            notify_email: record.notify_email.clone().unwrap_or_default(),
            layout_options: LAYOUTS
                .iter()
                .map(|l| SelectOption::new(*l, *l, *l == record.layout))
                .collect(),
            is_form: record.page_type == PageType::Form,
            fields,
        }
    }
}
