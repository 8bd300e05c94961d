//! Shared test infrastructure.
//!
//! - `MemoryStore` - in-memory `PageStore` with pages, submission log and profiles
//! - `MemoryScratch` - in-memory session scratchpad for the duplicate guard
//! - `UnreachableRelay` - mailer whose every delivery fails
//! - builders for pages, form fields and actors

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};

use custompages::auth::session::{Permissions, SessionScratch};
use custompages::context::Actor;
use custompages::errors::AppError;
use custompages::forms::field::{FieldKind, FieldSpec};
use custompages::mail::{MailError, Mailer, OutgoingMail};
use custompages::models::page::{Page, PageRecord, PageType, ROOT_PARENT, SubmissionLog};
use custompages::models::profile::Profile;
use custompages::store::PageStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Fixed "now" for every test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn yesterday() -> DateTime<Utc> {
    now() - Duration::days(1)
}

pub fn tomorrow() -> DateTime<Utc> {
    now() + Duration::days(1)
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    pub pages: RefCell<Vec<Page>>,
    pub submissions: RefCell<Vec<SubmissionLog>>,
    pub profiles: HashMap<i64, Profile>,
}

impl MemoryStore {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self { pages: RefCell::new(pages), ..Default::default() }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.borrow().len()
    }

    fn sorted(mut pages: Vec<Page>) -> Vec<Page> {
        pages.sort_by_key(|p| (p.sort_order, p.id));
        pages
    }
}

impl PageStore for MemoryStore {
    async fn find_page(&self, id: i64) -> Result<Option<Page>, AppError> {
        Ok(self.pages.borrow().iter().find(|p| p.id == id && !p.deleted).cloned())
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        Ok(self
            .pages
            .borrow()
            .iter()
            .find(|p| !p.deleted && !p.menu_slug.is_empty() && p.menu_slug == slug)
            .cloned())
    }

    async fn menu_pages(&self, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
        let pages = self.pages.borrow().iter().filter(|p| p.is_menu_visible(now)).cloned().collect();
        Ok(Self::sorted(pages))
    }

    async fn active_pages(&self) -> Result<Vec<Page>, AppError> {
        let pages = self.pages.borrow().iter().filter(|p| !p.deleted).cloned().collect();
        Ok(Self::sorted(pages))
    }

    async fn widgets(&self, parent_id: i64, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
        let pages = self
            .pages
            .borrow()
            .iter()
            .filter(|p| {
                !p.deleted && p.page_type != PageType::Page && p.parent_id == parent_id && p.is_visible_at(now)
            })
            .cloned()
            .collect();
        Ok(Self::sorted(pages))
    }

    async fn save_page(&self, record: &PageRecord) -> Result<i64, AppError> {
        let mut pages = self.pages.borrow_mut();
        let id = if record.id == 0 {
            pages.iter().map(|p| p.id).max().unwrap_or(0) + 1
        } else {
            record.id
        };
        let page = Page {
            id,
            parent_id: record.parent_id,
            name: record.name.clone(),
            menu_slug: record.menu_slug.clone(),
            sort_order: record.sort_order,
            page_type: record.page_type,
            access_rule: record.access_rule.clone(),
            visible_from: record.visible_from,
            on_menu: record.on_menu,
            deleted: false,
            content: record.content.clone(),
            form_schema: record.form_schema.clone(),
            notify_email: record.notify_email.clone(),
            layout: record.layout.clone(),
        };
        if record.id == 0 {
            pages.push(page);
        } else {
            let slot = pages
                .iter_mut()
                .find(|p| p.id == id && !p.deleted)
                .ok_or(AppError::NotFound)?;
            *slot = page;
        }
        Ok(id)
    }

    async fn delete_page(&self, id: i64) -> Result<(), AppError> {
        let mut pages = self.pages.borrow_mut();
        let page = pages
            .iter_mut()
            .find(|p| p.id == id && !p.deleted)
            .ok_or(AppError::NotFound)?;
        page.deleted = true;
        Ok(())
    }

    async fn log_submission(&self, log: &SubmissionLog) -> Result<i64, AppError> {
        let mut submissions = self.submissions.borrow_mut();
        submissions.push(log.clone());
        Ok(submissions.len() as i64)
    }

    async fn find_profile(&self, user_id: i64) -> Result<Profile, AppError> {
        Ok(self.profiles.get(&user_id).cloned().unwrap_or_default())
    }
}

// ============================================================================
// SESSION SCRATCHPAD
// ============================================================================

#[derive(Default)]
pub struct MemoryScratch {
    flags: RefCell<HashSet<String>>,
}

impl SessionScratch for MemoryScratch {
    fn is_flagged(&self, key: &str) -> bool {
        self.flags.borrow().contains(key)
    }

    fn flag(&self, key: &str) -> Result<(), AppError> {
        self.flags.borrow_mut().insert(key.to_string());
        Ok(())
    }
}

// ============================================================================
// MAIL
// ============================================================================

pub struct UnreachableRelay;

impl Mailer for UnreachableRelay {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::Transport("relay down".to_string()))
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// A visible, on-menu content page.
pub fn page(id: i64, parent_id: i64, name: &str) -> Page {
    Page {
        id,
        parent_id,
        name: name.to_string(),
        menu_slug: String::new(),
        sort_order: 0,
        page_type: PageType::Page,
        access_rule: String::new(),
        visible_from: yesterday(),
        on_menu: true,
        deleted: false,
        content: String::new(),
        form_schema: Vec::new(),
        notify_email: None,
        layout: "standard".to_string(),
    }
}

pub fn root_page(id: i64, name: &str) -> Page {
    page(id, ROOT_PARENT, name)
}

/// A form child of `parent_id` whose content is the thank-you message.
pub fn form_page(id: i64, parent_id: i64, fields: Vec<FieldSpec>, thank_you: &str) -> Page {
    Page {
        page_type: PageType::Form,
        on_menu: false,
        content: thank_you.to_string(),
        form_schema: fields,
        ..page(id, parent_id, "Contact")
    }
}

pub fn field(name: &str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        kind,
        required,
        default_value: String::new(),
        source_profile_field: None,
    }
}

pub fn anonymous() -> Actor {
    Actor::default()
}

pub fn actor_with(caps: &[&str]) -> Actor {
    Actor {
        user_id: Some(2),
        username: Some("student".to_string()),
        permissions: Permissions(caps.iter().map(|c| c.to_string()).collect()),
        profile: Profile::default(),
    }
}
