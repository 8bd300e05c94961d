use crate::context::RequestContext;
use crate::errors::AppError;
use crate::forms::posted::PostedForm;
use crate::forms::render::render_form_html;
use crate::forms::validate::{ValidationReport, validate};
use crate::lang;
use crate::mail::Mailer;
use crate::models::page::Page;
use crate::store::PageStore;
use crate::submission;
use crate::text::{Tokens, escape_html};

/// Session key marking a form page as already submitted.
pub fn guard_key(form_page: &Page) -> String {
    format!("custompages.sent.{}", form_page.id)
}

/// The form page's content with `{Field Name}` tokens replaced by the
/// submitted values.
pub fn thank_you(form_page: &Page, posted: &PostedForm) -> String {
    let mut tokens = Tokens::new();
    for field in &form_page.form_schema {
        tokens.insert_braced(&field.name, escape_html(posted.field_value(field).unwrap_or("")));
    }
    tokens.apply(&form_page.content)
}

/// HTML for a form child of the page being viewed.
///
/// A valid submission is processed and answered with the thank-you message.
/// When submissions are limited, a session that already submitted this form
/// gets the cannot-send message instead and nothing is recorded. Anything else
/// renders the form, with error messages if the post was invalid.
pub async fn render_form<S: PageStore, M: Mailer>(
    store: &S,
    mailer: &M,
    ctx: &RequestContext<'_>,
    form_page: &Page,
) -> Result<String, AppError> {
    let report = if ctx.posted.is_submission() {
        let report = validate(&form_page.form_schema, ctx.posted);
        if report.is_valid() {
            let key = guard_key(form_page);
            if ctx.settings.enable_limit && ctx.scratch.is_flagged(&key) {
                log::info!("Rejected repeat submission of form page {}", form_page.id);
                return Ok(format!("<div class=\"alert alert-warning\">{}</div>", lang::get_string(lang::CANNOT_SEND)));
            }
            submission::process(
                store,
                mailer,
                ctx.settings,
                ctx.admin_email,
                form_page,
                ctx.posted,
                ctx.now,
            )
            .await?;
            if ctx.settings.enable_limit {
                ctx.scratch.flag(&key)?;
            }
            return Ok(thank_you(form_page, ctx.posted));
        }
        log::debug!("Form page {} failed validation: {:?}", form_page.id, report.errors());
        report
    } else {
        ValidationReport::default()
    };

    Ok(render_form_html(&form_page.form_schema, ctx.posted, &ctx.actor.profile, &report))
}
