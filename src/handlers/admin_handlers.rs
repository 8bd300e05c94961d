use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{MANAGE_PAGES, get_user_id, require_permission};
use crate::config::AppConfig;
use crate::context::Actor;
use crate::errors::{AppError, render};
use crate::forms::edit::{record_from_posted, validate_record};
use crate::forms::posted::PostedForm;
use crate::lang;
use crate::menu::{self, ADMIN_URL};
use crate::models::page::PageRecord;
use crate::models::setting;
use crate::store::PageStore;
use crate::templates_structs::{PageContext, PageFormTemplate, PageFormView, PageListTemplate};

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

async fn build_ctx(pool: &PgPool, config: &AppConfig, session: &Session) -> Result<PageContext, AppError> {
    let settings = setting::load(pool).await?;
    let actor = Actor::from_session(session, pool).await?;
    PageContext::build(session, pool, config, &actor, &settings, Utc::now()).await
}

pub async fn list(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, MANAGE_PAGES)?;

    let ctx = build_ctx(&pool, &config, &session).await?;
    let pages = pool.active_pages().await?;
    let list_html = menu::render_page_list_html(&menu::list_pages(&pages), &ctx.csrf_token);

    render(PageListTemplate { ctx, list_html })
}

async fn render_editor(
    pool: &PgPool,
    config: &AppConfig,
    session: &Session,
    record: &PageRecord,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = build_ctx(pool, config, session).await?;
    let pages = pool.active_pages().await?;
    let (form_action, form_title) = if record.id == 0 {
        (ADMIN_URL.to_string(), lang::get_string(lang::ADD_PAGE))
    } else {
        (format!("{ADMIN_URL}/{}", record.id), format!("Edit {}", record.name))
    };
    render(PageFormTemplate {
        ctx,
        form_action,
        form_title,
        page: PageFormView::new(record, &pages),
        errors,
    })
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, MANAGE_PAGES)?;
    render_editor(&pool, &config, &session, &PageRecord::blank(Utc::now()), vec![]).await
}

pub async fn edit_form(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, MANAGE_PAGES)?;
    let page = pool.find_page(path.into_inner()).await?.ok_or(AppError::NotFound)?;
    render_editor(&pool, &config, &session, &PageRecord::from(page), vec![]).await
}

pub async fn create(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    save(0, &pool, &config, &session, &body).await
}

pub async fn update(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    body: String,
) -> Result<HttpResponse, AppError> {
    save(path.into_inner(), &pool, &config, &session, &body).await
}

async fn save(
    id: i64,
    pool: &PgPool,
    config: &AppConfig,
    session: &Session,
    body: &str,
) -> Result<HttpResponse, AppError> {
    require_permission(session, MANAGE_PAGES)?;

    // Form-builder rows arrive as repeated `name[]` keys
    let posted = PostedForm::parse(body).unwrap_or_else(|e| {
        log::warn!("Malformed page editor body: {e}");
        PostedForm::default()
    });
    csrf::validate_csrf(session, posted.get("csrf_token").unwrap_or(""))?;

    let record = record_from_posted(id, &posted, Utc::now());
    let errors = validate_record(&record);
    if !errors.is_empty() {
        return render_editor(pool, config, session, &record, errors).await;
    }

    let saved_id = pool.save_page(&record).await?;
    log::info!(
        "User {:?} saved page {saved_id} '{}'",
        get_user_id(session),
        record.name
    );

    let _ = session.insert("flash", lang::get_string(lang::PAGE_SAVED));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("{ADMIN_URL}/{saved_id}/edit")))
        .finish())
}

pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, MANAGE_PAGES)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    pool.delete_page(id).await?;
    log::info!("User {:?} deleted page {id}", get_user_id(&session));

    let _ = session.insert("flash", lang::get_string(lang::PAGE_DELETED));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", ADMIN_URL))
        .finish())
}
