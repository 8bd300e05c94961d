//! Resolving what a visitor sees on a custom page.

use crate::auth::access::can_access;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::forms::engine::render_form;
use crate::lang;
use crate::mail::Mailer;
use crate::models::page::{Page, PageType};
use crate::models::profile::Profile;
use crate::store::PageStore;
use crate::text::{Tokens, escape_html};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedPage {
    Content(String),
    /// Localized no-access message.
    Denied(String),
}

/// `{key}` tokens for every profile attribute, values escaped for HTML.
pub fn profile_tokens(profile: &Profile) -> Tokens {
    let mut tokens = Tokens::new();
    for (key, value) in profile.iter() {
        tokens.insert_braced(key, escape_html(value));
    }
    tokens
}

/// Content of `page` for the actor in `ctx`.
///
/// Profile placeholders are substituted before the form is inserted, so
/// values typed into the form are never expanded as placeholders.
pub async fn render_page<S: PageStore, M: Mailer>(
    store: &S,
    mailer: &M,
    ctx: &RequestContext<'_>,
    page: &Page,
) -> Result<RenderedPage, AppError> {
    let scheduled = !page.is_visible_at(ctx.now) && !ctx.actor.is_admin();
    if !can_access(&page.access_rule, ctx.actor) || scheduled {
        log::debug!("Denied page {} to user {:?}", page.id, ctx.actor.user_id);
        return Ok(RenderedPage::Denied(lang::get_string(lang::NO_ACCESS)));
    }

    // A page carries one form; with several, the last in order wins.
    let widgets = store.widgets(page.id, ctx.now).await?;
    let form_html = match widgets.iter().rev().find(|w| w.page_type == PageType::Form) {
        Some(form_page) => render_form(store, mailer, ctx, form_page).await?,
        None => String::new(),
    };

    let content = profile_tokens(&ctx.actor.profile).apply_ci(&page.content);
    let mut form_tokens = Tokens::new();
    form_tokens.insert("{form}", form_html.clone()).insert("#form#", form_html);
    Ok(RenderedPage::Content(form_tokens.apply(&content)))
}
