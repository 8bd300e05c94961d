//! Submission processing tests: log rows, notification modes and the
//! submitter's copy.

mod common;

use custompages::errors::AppError;
use custompages::forms::field::FieldKind;
use custompages::forms::posted::PostedForm;
use custompages::mail::{MailBody, MailError, MemoryMailer};
use custompages::models::page::Page;
use custompages::models::setting::PluginSettings;
use custompages::submission::process;
use common::*;

fn feedback_form() -> Page {
    let mut form = form_page(
        5,
        1,
        vec![
            field("Name", FieldKind::Text, true),
            field("Email", FieldKind::Email, true),
            field("Intro", FieldKind::Html, false),
            field("Message", FieldKind::TextArea, false),
        ],
        "Thanks",
    );
    form.name = "Feedback".to_string();
    form.notify_email = Some("office@example.com".to_string());
    form
}

fn posted() -> PostedForm {
    PostedForm::new(vec![
        ("Name".into(), "Ada".into()),
        ("Email".into(), "ada@example.com".into()),
        ("Message".into(), "Hi <there>".into()),
    ])
}

#[tokio::test]
async fn test_standard_notification() {
    let store = MemoryStore::default();
    let mailer = MemoryMailer::new();

    let outcome = process(&store, &mailer, &PluginSettings::default(), ADMIN_EMAIL,
                          &feedback_form(), &posted(), now()).await.unwrap();
    assert_eq!(outcome.log_id, 1);
    assert_eq!(outcome.summary, "Name: Ada\r\nEmail: ada@example.com\r\nMessage: Hi <there>\r\n");

    let logs = store.submissions.borrow();
    assert_eq!(logs[0].submitted_at, now());
    assert_eq!(logs[0].field_values, r#"{"Name":"Ada","Email":"ada@example.com","Message":"Hi <there>"}"#);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.to, "office@example.com");
    assert_eq!(mail.subject, "Feedback");
    assert_eq!(mail.from.as_deref(), Some("\"Feedback\" <ada@example.com>"));
    assert_eq!(mail.reply_to.as_deref(), Some("ada@example.com"));
    match &mail.body {
        MailBody::Alternative { text, html } => {
            assert_eq!(text, &outcome.summary);
            assert!(html.contains("Message: Hi &lt;there&gt;<br />"));
        }
        other => panic!("expected a multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_headers_with_html() {
    let store = MemoryStore::default();
    let mailer = MemoryMailer::new();
    let settings = PluginSettings {
        custom_email: true,
        email_headers: "{From}\r\n{Reply-to}\r\nX-Form: feedback\r\n{html}".to_string(),
        ..PluginSettings::default()
    };

    process(&store, &mailer, &settings, ADMIN_EMAIL, &feedback_form(), &posted(), now())
        .await
        .unwrap();

    let mail = &mailer.sent()[0];
    assert_eq!(mail.from.as_deref(), Some("\"Feedback\" <ada@example.com>"));
    assert_eq!(mail.reply_to.as_deref(), Some("ada@example.com"));
    assert_eq!(mail.extra_headers, vec![("X-Form".to_string(), "feedback".to_string())]);
    assert!(matches!(&mail.body, MailBody::Html(html) if html.contains("Name: Ada<br />")));
}

#[tokio::test]
async fn test_custom_headers_without_html_send_plain_text() {
    let store = MemoryStore::default();
    let mailer = MemoryMailer::new();
    let settings = PluginSettings {
        custom_email: true,
        email_headers: "{From}".to_string(),
        ..PluginSettings::default()
    };

    process(&store, &mailer, &settings, ADMIN_EMAIL, &feedback_form(), &posted(), now())
        .await
        .unwrap();

    let mail = &mailer.sent()[0];
    assert_eq!(mail.reply_to, None);
    assert!(matches!(&mail.body, MailBody::Text(text) if text.starts_with("Name: Ada\r\n")));
}

#[tokio::test]
async fn test_user_copy_goes_to_submitter() {
    let store = MemoryStore::default();
    let mailer = MemoryMailer::new();
    let settings = PluginSettings {
        user_copy: true,
        message_copy: "<p>Dear {Name},</p><p>{table}</p>".to_string(),
        ..PluginSettings::default()
    };

    process(&store, &mailer, &settings, ADMIN_EMAIL, &feedback_form(), &posted(), now())
        .await
        .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    let copy = &sent[1];
    assert_eq!(copy.to, "ada@example.com");
    assert_eq!(copy.from.as_deref(), Some("\"Feedback\" <office@example.com>"));
    match &copy.body {
        MailBody::Alternative { text, html } => {
            assert!(html.starts_with("<p>Dear Ada,</p><p>Name: Ada<br />"));
            assert!(text.starts_with("Dear Ada,\r\nName: Ada\r\n"));
            assert!(text.contains("Message: Hi \r\n"));
        }
        other => panic!("expected a multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_without_email_field_admin_is_sender_and_no_copy() {
    let store = MemoryStore::default();
    let mailer = MemoryMailer::new();
    let mut form = form_page(9, 1, vec![field("Comment", FieldKind::TextArea, true)], "ok");
    form.name = "Comments".to_string();
    let settings = PluginSettings { user_copy: true, ..PluginSettings::default() };
    let posted = PostedForm::new(vec![("Comment".into(), "Nice".into())]);

    process(&store, &mailer, &settings, ADMIN_EMAIL, &form, &posted, now())
        .await
        .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, ADMIN_EMAIL);
    assert_eq!(sent[0].from.as_deref(), Some("\"Comments\" <admin@example.com>"));
    assert_eq!(store.submission_count(), 1);
}

#[tokio::test]
async fn test_delivery_failure_is_returned_after_logging() {
    let store = MemoryStore::default();

    let result = process(&store, &UnreachableRelay, &PluginSettings::default(), ADMIN_EMAIL,
                         &feedback_form(), &posted(), now()).await;
    assert!(matches!(result, Err(AppError::Mail(MailError::Transport(_)))));
    assert_eq!(store.submission_count(), 1);
}
