//! Accepted form submissions: log row, notification mail and the submitter's copy.

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::forms::field::FieldSpec;
use crate::forms::posted::PostedForm;
use crate::mail::{MailBody, MailError, Mailer, OutgoingMail};
use crate::models::page::{Page, SubmissionLog};
use crate::models::setting::PluginSettings;
use crate::store::PageStore;
use crate::text::{Tokens, escape_html, html_to_plain, nl2br, ucfirst};

const HTML_HEADERS: &str = "MIME-Version: 1.0\r\nContent-Type: text/html; charset=ISO-8859-1";

/// What an accepted submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub log_id: i64,
    /// Field name to submitted value, in schema order.
    pub values: Vec<(String, String)>,
    /// `Name: value` lines, CRLF separated.
    pub summary: String,
}

/// Submitted value of every input field. Missing values are empty strings.
pub fn collect_values(fields: &[FieldSpec], posted: &PostedForm) -> Vec<(String, String)> {
    fields
        .iter()
        .filter(|f| f.is_input())
        .map(|f| (f.name.clone(), posted.field_value(f).unwrap_or("").to_string()))
        .collect()
}

pub fn plain_summary(values: &[(String, String)]) -> String {
    values
        .iter()
        .map(|(name, value)| format!("{}: {}\r\n", ucfirst(name), value))
        .collect()
}

/// The submitter's address: the value of a field called "email" (any case,
/// spaces ignored), when it looks like an address.
pub fn submitter_email(values: &[(String, String)]) -> Option<String> {
    values
        .iter()
        .find(|(name, _)| name.replace(' ', "").eq_ignore_ascii_case("email"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| value.contains('@') && !value.chars().any(char::is_whitespace))
}

/// Values end up in mail headers; line breaks would start new ones.
fn header_safe(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect::<String>().trim().to_string()
}

fn mailbox(display: &str, email: &str) -> String {
    format!("\"{}\" <{}>", header_safe(display).replace('"', "'"), email)
}

fn header_block(template: &str, sender: &str, subject: &str) -> String {
    let mut tokens = Tokens::new();
    tokens
        .insert("{From}", format!("From: {}", mailbox(subject, sender)))
        .insert("{Reply-to}", format!("Reply-To: {sender}"))
        .insert("{html}", HTML_HEADERS);
    tokens.apply(template)
}

/// Custom mode: the header template decides the sender and whether the body is HTML.
fn custom_mail(
    settings: &PluginSettings,
    to: &str,
    sender: &str,
    subject: &str,
    text: String,
    html: String,
) -> OutgoingMail {
    let body = if settings.email_headers.contains("{html}") {
        MailBody::Html(html)
    } else {
        MailBody::Text(text)
    };
    OutgoingMail::new(to, subject, body).with_header_block(&header_block(&settings.email_headers, sender, subject))
}

fn standard_mail(to: &str, sender: &str, subject: &str, text: String, html: String) -> OutgoingMail {
    OutgoingMail {
        from: Some(mailbox(subject, sender)),
        reply_to: Some(sender.to_string()),
        ..OutgoingMail::new(to, subject, MailBody::Alternative { text, html })
    }
}

/// Send one mail; failures go back to the caller after being logged.
async fn deliver<M: Mailer>(mailer: &M, mail: OutgoingMail) -> Result<(), MailError> {
    let to = mail.to.clone();
    mailer.send(mail).await.inspect_err(|e| {
        log::error!("Could not send form mail to {to}: {e}");
    })
}

/// Record an accepted submission of `page` and send its mail.
///
/// The notification goes to the page's notify address, or the administrator
/// when none is set. With `user_copy` on, the submitter also receives the
/// copy template with field tokens and `{table}` filled in. The log row is
/// written before any mail, so a delivery failure leaves it in place.
pub async fn process<S: PageStore, M: Mailer>(
    store: &S,
    mailer: &M,
    settings: &PluginSettings,
    admin_email: &str,
    page: &Page,
    posted: &PostedForm,
    now: DateTime<Utc>,
) -> Result<SubmissionOutcome, AppError> {
    let values = collect_values(&page.form_schema, posted);
    let summary = plain_summary(&values);
    let summary_html = nl2br(&escape_html(&summary));

    let mut record = serde_json::Map::new();
    for (name, value) in &values {
        record.insert(name.clone(), serde_json::Value::String(value.clone()));
    }
    let log_id = store
        .log_submission(&SubmissionLog {
            form_page_id: page.id,
            submitted_at: now,
            field_values: serde_json::Value::Object(record).to_string(),
        })
        .await?;

    let recipient = page
        .notify_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(admin_email)
        .to_string();
    let subject = page.name.clone();
    let submitter = submitter_email(&values);
    let sender = submitter.clone().unwrap_or_else(|| admin_email.to_string());

    let notification = if settings.custom_email {
        custom_mail(settings, &recipient, &sender, &subject, summary.clone(), summary_html.clone())
    } else {
        standard_mail(&recipient, &sender, &subject, summary.clone(), summary_html.clone())
    };
    deliver(mailer, notification).await?;

    if settings.user_copy {
        match &submitter {
            Some(to) => {
                let mut html_tokens = Tokens::new();
                let mut text_tokens = Tokens::new();
                for (name, value) in &values {
                    html_tokens.insert_braced(name, escape_html(value));
                    text_tokens.insert_braced(name, value.clone());
                }
                html_tokens.insert("{table}", summary_html.clone());
                text_tokens.insert("{table}", summary.clone());
                let html = html_tokens.apply(&settings.message_copy);
                let text = html_to_plain(&text_tokens.apply(&settings.message_copy));

                let copy = if settings.custom_email {
                    custom_mail(settings, to, &recipient, &subject, text, html)
                } else {
                    standard_mail(to, &recipient, &subject, text, html)
                };
                deliver(mailer, copy).await?;
            }
            None => log::warn!("Form page {} has no email field; skipping the submitter copy", page.id),
        }
    }

    log::info!("Accepted submission {log_id} for form page {}", page.id);
    Ok(SubmissionOutcome { log_id, values, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_and_submitter() {
        let values = vec![
            ("name".to_string(), "Ada".to_string()),
            ("E mail".to_string(), "ada@example.com\r\nBcc: x@y.z".to_string()),
        ];
        assert_eq!(plain_summary(&values), "Name: Ada\r\nE mail: ada@example.com\r\nBcc: x@y.z\r\n");
        assert_eq!(submitter_email(&values), None);

        let values = vec![("Email".to_string(), " ada@example.com ".to_string())];
        assert_eq!(submitter_email(&values).as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn header_template_tokens() {
        let block = header_block("{From}\r\n{Reply-to}\r\n{html}", "a@example.com", "Contact \"us\"");
        assert!(block.starts_with("From: \"Contact 'us'\" <a@example.com>\r\nReply-To: a@example.com\r\n"));
        assert!(block.ends_with("Content-Type: text/html; charset=ISO-8859-1"));
    }
}
