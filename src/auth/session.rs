use actix_session::Session;

use crate::auth::access::CapabilityCheck;
use crate::errors::AppError;

/// Capability granting access to the page-management screens.
pub const MANAGE_PAGES: &str = "pages.addpages";
/// Capability held by site administrators.
pub const SITE_ADMIN: &str = "site.admin";

/// Wrapper around capability codes with a `has()` method for use in Askama templates.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }
}

impl CapabilityCheck for Permissions {
    fn has_capability(&self, code: &str) -> bool {
        self.has(code)
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>("username").unwrap_or(None)
}

/// Permissions of the current session. Anonymous visitors hold none.
pub fn get_permissions(session: &Session) -> Permissions {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Permissions::from_csv(&csv),
        Ok(None) => Permissions::default(),
        Err(e) => {
            log::warn!("Session error reading permissions: {e}");
            Permissions::default()
        }
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    let permissions = get_permissions(session);
    if permissions.has(code) || permissions.has(SITE_ADMIN) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}

/// Per-session scratchpad used for the duplicate-submission guard.
pub trait SessionScratch {
    fn is_flagged(&self, key: &str) -> bool;
    fn flag(&self, key: &str) -> Result<(), AppError>;
}

impl SessionScratch for Session {
    fn is_flagged(&self, key: &str) -> bool {
        self.get::<String>(key).unwrap_or(None).is_some()
    }

    fn flag(&self, key: &str) -> Result<(), AppError> {
        self.insert(key, "sent")
            .map_err(|e| AppError::Session(e.to_string()))
    }
}
