use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::forms::field::FieldSpec;

/// Parent id of top-level pages.
pub const ROOT_PARENT: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// Regular content page; the only kind shown in menus.
    Page,
    /// Embeddable form, rendered inside its parent page.
    Form,
    /// HTML snippet attached to a parent page.
    Html,
}

impl PageType {
    pub const ALL: [PageType; 3] = [PageType::Page, PageType::Form, PageType::Html];

    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Page => "page",
            PageType::Form => "form",
            PageType::Html => "html",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" => Some(PageType::Page),
            "form" => Some(PageType::Form),
            "html" => Some(PageType::Html),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageType::Page => "Page",
            PageType::Form => "Form",
            PageType::Html => "HTML",
        }
    }
}

/// A custom page as stored in the page table.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub menu_slug: String,
    pub sort_order: i32,
    pub page_type: PageType,
    /// Comma separated capability rule, see [`crate::auth::access`].
    pub access_rule: String,
    pub visible_from: DateTime<Utc>,
    pub on_menu: bool,
    pub deleted: bool,
    pub content: String,
    pub form_schema: Vec<FieldSpec>,
    pub notify_email: Option<String>,
    pub layout: String,
}

impl Page {
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.visible_from <= now
    }

    /// Menu visibility, independent of access rules.
    pub fn is_menu_visible(&self, now: DateTime<Utc>) -> bool {
        !self.deleted && self.on_menu && self.page_type == PageType::Page && self.is_visible_at(now)
    }
}

/// Values written by the page editor. `id == 0` inserts a new page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub menu_slug: String,
    pub sort_order: i32,
    pub page_type: PageType,
    pub access_rule: String,
    pub visible_from: DateTime<Utc>,
    pub on_menu: bool,
    pub content: String,
    pub form_schema: Vec<FieldSpec>,
    pub notify_email: Option<String>,
    pub layout: String,
}

impl PageRecord {
    /// Editor defaults for a brand new page.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            parent_id: ROOT_PARENT,
            name: String::new(),
            menu_slug: String::new(),
            sort_order: 0,
            page_type: PageType::Page,
            access_rule: String::new(),
            visible_from: now,
            on_menu: true,
            content: String::new(),
            form_schema: Vec::new(),
            notify_email: None,
            layout: "standard".to_string(),
        }
    }
}

impl From<Page> for PageRecord {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            parent_id: page.parent_id,
            name: page.name,
            menu_slug: page.menu_slug,
            sort_order: page.sort_order,
            page_type: page.page_type,
            access_rule: page.access_rule,
            visible_from: page.visible_from,
            on_menu: page.on_menu,
            content: page.content,
            form_schema: page.form_schema,
            notify_email: page.notify_email,
            layout: page.layout,
        }
    }
}

/// One processed form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionLog {
    pub form_page_id: i64,
    pub submitted_at: DateTime<Utc>,
    /// JSON object of field name to submitted value, in schema order.
    pub field_values: String,
}

/// Layouts offered by the page editor.
pub const LAYOUTS: [&str; 4] = ["standard", "frontpage", "popup", "embedded"];
