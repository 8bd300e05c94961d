use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::context::{Actor, RequestContext};
use crate::errors::{AppError, render};
use crate::forms::edit::sanitize_slug;
use crate::forms::posted::PostedForm;
use crate::lang;
use crate::mail::MailBackend;
use crate::menu;
use crate::models::page::Page;
use crate::models::setting;
use crate::store::PageStore;
use crate::templates_structs::{PageContext, PageTemplate};
use crate::view::{self, RenderedPage};

#[derive(Deserialize)]
pub struct ViewQuery {
    pub id: Option<i64>,
}

/// `/pages/?id=` view (GET) and form submission (POST). Without an id the
/// visitor's menu is shown.
pub async fn view_by_id(
    pool: web::Data<PgPool>,
    mailer: web::Data<MailBackend>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ViewQuery>,
    body: String,
) -> Result<HttpResponse, AppError> {
    let Some(id) = query.id else {
        return index(&pool, &config, &session).await;
    };
    let page = pool.find_page(id).await?.ok_or(AppError::NotFound)?;
    show(page, &pool, &mailer, &config, &session, &body).await
}

/// `/pages/{slug}` view and form submission.
pub async fn view_by_slug(
    pool: web::Data<PgPool>,
    mailer: web::Data<MailBackend>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, AppError> {
    let slug = sanitize_slug(&path.into_inner());
    if slug.is_empty() {
        return Err(AppError::NotFound);
    }
    let page = pool.find_page_by_slug(&slug).await?.ok_or(AppError::NotFound)?;
    show(page, &pool, &mailer, &config, &session, &body).await
}

/// Navigation tree of the current visitor as JSON.
pub async fn menu_json(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let settings = setting::load(&pool).await?;
    let actor = Actor::from_session(&session, pool.get_ref()).await?;
    let pages = pool.menu_pages(now).await?;
    let nodes = menu::navigation(&pages, &actor, actor.can_manage_pages(), actor.is_admin(), &settings, now);
    Ok(HttpResponse::Ok().json(nodes))
}

async fn index(pool: &PgPool, config: &AppConfig, session: &Session) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let settings = setting::load(pool).await?;
    let actor = Actor::from_session(session, pool).await?;
    let ctx = PageContext::build(session, pool, config, &actor, &settings, now).await?;
    let body_html = ctx.nav_html.clone();
    render(PageTemplate {
        ctx,
        title: lang::get_string(lang::PLUGIN_NAME),
        layout: "standard".to_string(),
        body_html,
        denied: false,
    })
}

async fn show(
    page: Page,
    pool: &PgPool,
    mailer: &MailBackend,
    config: &AppConfig,
    session: &Session,
    body: &str,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let settings = setting::load(pool).await?;
    let actor = Actor::from_session(session, pool).await?;
    let posted = PostedForm::parse(body).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed form body for page {}: {e}", page.id);
        PostedForm::default()
    });

    let request = RequestContext {
        actor: &actor,
        posted: &posted,
        scratch: session,
        settings: &settings,
        admin_email: &config.admin_email,
        now,
    };
    let (body_html, denied) = match view::render_page(pool, mailer, &request, &page).await? {
        RenderedPage::Content(html) => (html, false),
        RenderedPage::Denied(message) => (message, true),
    };

    let ctx = PageContext::build(session, pool, config, &actor, &settings, now).await?;
    render(PageTemplate { ctx, title: page.name, layout: page.layout, body_html, denied })
}
