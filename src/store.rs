//! The persistence seam used by the menu, renderer and form code.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::page::{self, Page, PageRecord, SubmissionLog};
use crate::models::profile::{self, Profile};

#[allow(async_fn_in_trait)]
pub trait PageStore {
    /// A non-deleted page by id.
    async fn find_page(&self, id: i64) -> Result<Option<Page>, AppError>;
    /// A non-deleted page by its menu slug.
    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError>;
    /// Pages eligible for menus at `now`, ordered by sort order.
    async fn menu_pages(&self, now: DateTime<Utc>) -> Result<Vec<Page>, AppError>;
    /// All non-deleted pages, ordered by sort order.
    async fn active_pages(&self) -> Result<Vec<Page>, AppError>;
    /// Non-"page" children of `parent_id` visible at `now`, ordered by sort order.
    async fn widgets(&self, parent_id: i64, now: DateTime<Utc>) -> Result<Vec<Page>, AppError>;
    async fn save_page(&self, record: &PageRecord) -> Result<i64, AppError>;
    async fn delete_page(&self, id: i64) -> Result<(), AppError>;
    async fn log_submission(&self, log: &SubmissionLog) -> Result<i64, AppError>;
    async fn find_profile(&self, user_id: i64) -> Result<Profile, AppError>;
}

impl PageStore for PgPool {
    async fn find_page(&self, id: i64) -> Result<Option<Page>, AppError> {
        page::queries::find_by_id(self, id).await
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        page::queries::find_by_slug(self, slug).await
    }

    async fn menu_pages(&self, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
        page::queries::find_menu_pages(self, now).await
    }

    async fn active_pages(&self) -> Result<Vec<Page>, AppError> {
        page::queries::find_all_active(self).await
    }

    async fn widgets(&self, parent_id: i64, now: DateTime<Utc>) -> Result<Vec<Page>, AppError> {
        page::queries::find_widgets(self, parent_id, now).await
    }

    async fn save_page(&self, record: &PageRecord) -> Result<i64, AppError> {
        page::queries::save(self, record).await
    }

    async fn delete_page(&self, id: i64) -> Result<(), AppError> {
        page::queries::mark_deleted(self, id).await
    }

    async fn log_submission(&self, log: &SubmissionLog) -> Result<i64, AppError> {
        page::queries::insert_submission(self, log).await
    }

    async fn find_profile(&self, user_id: i64) -> Result<Profile, AppError> {
        profile::find_by_user(self, user_id).await
    }
}
