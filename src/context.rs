//! Who is asking, and what came with the request.

use actix_session::Session;
use chrono::{DateTime, Utc};

use crate::auth::access::CapabilityCheck;
use crate::auth::session::{
    MANAGE_PAGES, Permissions, SITE_ADMIN, SessionScratch, get_permissions, get_user_id, get_username,
};
use crate::errors::AppError;
use crate::forms::posted::PostedForm;
use crate::models::profile::{DEFAULT_PROFILE_USER_ID, Profile};
use crate::models::setting::PluginSettings;
use crate::store::PageStore;

/// The current visitor.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub permissions: Permissions,
    pub profile: Profile,
}

impl Actor {
    /// Load the actor behind a session. Visitors without a login read the
    /// default profile so `{field}` tokens still resolve.
    pub async fn from_session(session: &Session, store: &impl PageStore) -> Result<Self, AppError> {
        let user_id = get_user_id(session);
        let username = get_username(session);
        let permissions = get_permissions(session);
        let profile = store
            .find_profile(user_id.unwrap_or(DEFAULT_PROFILE_USER_ID))
            .await?;
        let profile = match &username {
            Some(name) if profile.get("username").is_none() => {
                let mut p = profile;
                p.insert("username", name.clone());
                p
            }
            _ => profile,
        };
        Ok(Self { user_id, username, permissions, profile: profile.with_fullname() })
    }

    pub fn is_admin(&self) -> bool {
        self.permissions.has(SITE_ADMIN)
    }

    pub fn can_manage_pages(&self) -> bool {
        self.is_admin() || self.permissions.has(MANAGE_PAGES)
    }
}

/// Site administrators hold every capability.
impl CapabilityCheck for Actor {
    fn has_capability(&self, code: &str) -> bool {
        self.is_admin() || self.permissions.has(code)
    }
}

/// Everything page rendering needs from the current request.
pub struct RequestContext<'a> {
    pub actor: &'a Actor,
    pub posted: &'a PostedForm,
    pub scratch: &'a dyn SessionScratch,
    pub settings: &'a PluginSettings,
    /// Fallback recipient and sender for form notifications.
    pub admin_email: &'a str,
    pub now: DateTime<Utc>,
}
