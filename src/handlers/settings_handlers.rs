use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{SITE_ADMIN, get_user_id, require_permission};
use crate::config::AppConfig;
use crate::context::Actor;
use crate::errors::{AppError, render};
use crate::forms::posted::PostedForm;
use crate::lang;
use crate::models::setting::{self, PluginSettings};
use crate::templates_structs::{PageContext, SettingsTemplate};

pub async fn list(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, SITE_ADMIN)?;

    let settings = setting::load(&pool).await?;
    let actor = Actor::from_session(&session, pool.get_ref()).await?;
    let ctx = PageContext::build(&session, pool.get_ref(), &config, &actor, &settings, Utc::now()).await?;

    let tmpl = SettingsTemplate { ctx, settings: settings.display() };
    render(tmpl)
}

pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, SITE_ADMIN)?;

    let posted = PostedForm::parse(&body).unwrap_or_else(|e| {
        log::warn!("Malformed settings body: {e}");
        PostedForm::default()
    });
    csrf::validate_csrf(&session, posted.get("csrf_token").unwrap_or(""))?;

    // Each setting is submitted as setting_<name>=<value>; checkboxes post a
    // hidden 0 first, so the last value wins.
    let mut changed = Vec::new();
    for entry in PluginSettings::default().display() {
        let Some(value) = posted.get(&format!("setting_{}", entry.name)) else {
            continue;
        };
        let value = if PluginSettings::is_boolean(&entry.name) {
            if value == "0" || value.is_empty() { "0" } else { "1" }.to_string()
        } else {
            value.replace("\r\n", "\n").replace('\n', "\r\n")
        };
        setting::update_value(&pool, &entry.name, &value).await?;
        changed.push(entry.name);
    }

    if !changed.is_empty() {
        log::info!(
            "User {:?} updated page settings: {}",
            get_user_id(&session),
            changed.join(", ")
        );
    }

    let _ = session.insert("flash", lang::get_string(lang::SETTINGS_SAVED));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/pages/admin/settings"))
        .finish())
}
