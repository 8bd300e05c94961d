// Template context structures for Askama templates, organized by screen.

use actix_session::Session;
use chrono::{DateTime, Utc};

use crate::auth::csrf;
use crate::auth::session::take_flash;
use crate::config::AppConfig;
use crate::context::Actor;
use crate::errors::AppError;
use crate::menu;
use crate::models::setting::PluginSettings;
use crate::store::PageStore;

/// Common context shared by every page of the add-on.
/// Templates access these as `ctx.site_name`, `ctx.nav_html`, etc.
pub struct PageContext {
    pub username: Option<String>,
    pub site_name: String,
    pub flash: Option<String>,
    /// Pre-rendered navigation menu.
    pub nav_html: String,
    pub csrf_token: String,
    pub can_manage: bool,
}

impl PageContext {
    pub async fn build(
        session: &Session,
        store: &impl PageStore,
        config: &AppConfig,
        actor: &Actor,
        settings: &PluginSettings,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let pages = store.menu_pages(now).await?;
        let nodes = menu::navigation(&pages, actor, actor.can_manage_pages(), actor.is_admin(), settings, now);
        Ok(Self {
            username: actor.username.clone(),
            site_name: config.site_name.clone(),
            flash: take_flash(session),
            nav_html: menu::render_menu_html(&nodes),
            csrf_token: csrf::get_or_create_token(session),
            can_manage: actor.can_manage_pages(),
        })
    }
}

mod admin;
mod page;

pub use admin::*;
pub use page::*;
