use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;
use crate::forms::field::{encode_schema, parse_schema};

/// Intermediate row struct shared by every page query.
#[derive(sqlx::FromRow)]
struct PageRow {
    id: i64,
    parent_id: i64,
    name: String,
    menu_slug: String,
    sort_order: i32,
    page_type: String,
    access_rule: String,
    visible_from: DateTime<Utc>,
    on_menu: bool,
    deleted: bool,
    content: String,
    form_schema: String,
    notify_email: Option<String>,
    layout: String,
}

impl From<PageRow> for Page {
    fn from(r: PageRow) -> Self {
        let page_type = PageType::parse(&r.page_type).unwrap_or_else(|| {
            log::warn!("Page {} has unknown type '{}', treating as page", r.id, r.page_type);
            PageType::Page
        });
        let form_schema = parse_schema(&r.form_schema).unwrap_or_else(|e| {
            log::warn!("Page {} has an unreadable form schema: {e}", r.id);
            Vec::new()
        });
        Page {
            id: r.id,
            parent_id: r.parent_id,
            name: r.name,
            menu_slug: r.menu_slug,
            sort_order: r.sort_order,
            page_type,
            access_rule: r.access_rule,
            visible_from: r.visible_from,
            on_menu: r.on_menu,
            deleted: r.deleted,
            content: r.content,
            form_schema,
            notify_email: r.notify_email.filter(|e| !e.trim().is_empty()),
            layout: r.layout,
        }
    }
}

const SELECT_PAGE: &str = "\
    SELECT id, parent_id, name, menu_slug, sort_order, page_type, access_rule, \
           visible_from, on_menu, deleted, content, form_schema, notify_email, layout \
    FROM pages";

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Page>, AppError> {
    let row = sqlx::query_as::<_, PageRow>(&format!("{SELECT_PAGE} WHERE id = $1 AND NOT deleted"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Page::from))
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, AppError> {
    let row = sqlx::query_as::<_, PageRow>(&format!(
        "{SELECT_PAGE} WHERE menu_slug = $1 AND menu_slug <> '' AND NOT deleted \
         ORDER BY id LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Page::from))
}

/// Every page that may appear in a menu at `now`, ordered for the tree walk.
pub async fn find_menu_pages(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "{SELECT_PAGE} WHERE NOT deleted AND on_menu AND page_type = 'page' \
         AND visible_from <= $1 ORDER BY sort_order, id"
    ))
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Page::from).collect())
}

/// Every non-deleted page, for the editor list.
pub async fn find_all_active(pool: &PgPool) -> Result<Vec<Page>, AppError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "{SELECT_PAGE} WHERE NOT deleted ORDER BY sort_order, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Page::from).collect())
}

/// Form and HTML children of a page that are visible at `now`.
pub async fn find_widgets(pool: &PgPool, parent_id: i64, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
    let rows = sqlx::query_as::<_, PageRow>(&format!(
        "{SELECT_PAGE} WHERE NOT deleted AND page_type <> 'page' AND parent_id = $1 \
         AND visible_from <= $2 ORDER BY sort_order, id"
    ))
    .bind(parent_id)
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Page::from).collect())
}

/// Insert (id 0) or update a page. Returns the page id.
pub async fn save(pool: &PgPool, record: &PageRecord) -> Result<i64, AppError> {
    let schema = encode_schema(&record.form_schema)?;

    if record.id == 0 {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO pages (parent_id, name, menu_slug, sort_order, page_type, access_rule, \
                                visible_from, on_menu, content, form_schema, notify_email, layout) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING id",
        )
        .bind(record.parent_id)
        .bind(&record.name)
        .bind(&record.menu_slug)
        .bind(record.sort_order)
        .bind(record.page_type.as_str())
        .bind(&record.access_rule)
        .bind(record.visible_from)
        .bind(record.on_menu)
        .bind(&record.content)
        .bind(&schema)
        .bind(&record.notify_email)
        .bind(&record.layout)
        .fetch_one(pool)
        .await?;
        return Ok(id);
    }

    let updated = sqlx::query(
        "UPDATE pages SET parent_id = $1, name = $2, menu_slug = $3, sort_order = $4, \
                page_type = $5, access_rule = $6, visible_from = $7, on_menu = $8, \
                content = $9, form_schema = $10, notify_email = $11, layout = $12, \
                updated_at = now() \
         WHERE id = $13 AND NOT deleted",
    )
    .bind(record.parent_id)
    .bind(&record.name)
    .bind(&record.menu_slug)
    .bind(record.sort_order)
    .bind(record.page_type.as_str())
    .bind(&record.access_rule)
    .bind(record.visible_from)
    .bind(record.on_menu)
    .bind(&record.content)
    .bind(&schema)
    .bind(&record.notify_email)
    .bind(&record.layout)
    .bind(record.id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(record.id)
}

/// Soft delete: the row stays for the submission log's foreign key.
pub async fn mark_deleted(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE pages SET deleted = true, updated_at = now() WHERE id = $1 AND NOT deleted")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn insert_submission(pool: &PgPool, log: &SubmissionLog) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO page_submissions (form_page_id, submitted_at, field_values) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(log.form_page_id)
    .bind(log.submitted_at)
    .bind(&log.field_values)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
