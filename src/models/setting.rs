use sqlx::PgPool;

use crate::errors::AppError;

pub const DEFAULT_EMAIL_HEADERS: &str = "{From}\r\n{Reply-to}\r\n{html}";
pub const DEFAULT_MESSAGE_COPY: &str =
    "<p>Thank you for your submission. A copy of the information you sent is below.</p><p>{table}</p>";

/// Options that shape menus, forms and notification mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    /// Address pages by menu slug instead of id.
    pub cleanurl_enabled: bool,
    /// Accept one submission per form per session.
    pub enable_limit: bool,
    /// Build notification headers from `email_headers` instead of the default mailer headers.
    pub custom_email: bool,
    /// Header template with `{From}`, `{Reply-to}` and `{html}` tokens.
    pub email_headers: String,
    /// Submitter copy template with `{FieldName}` and `{table}` tokens.
    pub message_copy: String,
    /// Send the submitter a copy of their submission.
    pub user_copy: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            cleanurl_enabled: false,
            enable_limit: false,
            custom_email: false,
            email_headers: DEFAULT_EMAIL_HEADERS.to_string(),
            message_copy: DEFAULT_MESSAGE_COPY.to_string(),
            user_copy: false,
        }
    }
}

/// A setting for display and editing.
#[derive(Debug, Clone)]
pub struct SettingDisplay {
    pub name: String,
    pub label: String,
    pub value: String,
    pub description: String,
    pub setting_type: &'static str, // "boolean" or "textarea"
}

impl SettingDisplay {
    pub fn is_checked(&self) -> bool {
        flag(&self.value)
    }
}

/// (name, label, description, type)
const SETTING_DEFS: [(&str, &str, &str, &str); 6] = [
    ("cleanurl_enabled", "Clean URLs", "Address pages as /pages/{menu name} when a menu name is set", "boolean"),
    ("enable_limit", "Limit submissions", "Accept one submission per form per session", "boolean"),
    ("custom_email", "Custom email headers", "Build notification headers from the template below", "boolean"),
    ("email_headers", "Email headers", "Tokens: {From}, {Reply-to}, {html}", "textarea"),
    ("message_copy", "Copy message", "Message sent to the submitter. Tokens: {field name}, {table}", "textarea"),
    ("user_copy", "Send copy to user", "Email the submitter a copy of their submission", "boolean"),
];

fn flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "on" | "yes")
}

impl PluginSettings {
    /// Build settings from stored (name, value) rows; missing rows keep defaults.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut settings = PluginSettings::default();
        for (name, value) in rows {
            match name {
                "cleanurl_enabled" => settings.cleanurl_enabled = flag(value),
                "enable_limit" => settings.enable_limit = flag(value),
                "custom_email" => settings.custom_email = flag(value),
                "email_headers" => settings.email_headers = value.to_string(),
                "message_copy" => settings.message_copy = value.to_string(),
                "user_copy" => settings.user_copy = flag(value),
                other => log::debug!("Ignoring unknown page setting '{other}'"),
            }
        }
        settings
    }

    fn value_of(&self, name: &str) -> String {
        let b = |v: bool| if v { "1" } else { "0" }.to_string();
        match name {
            "cleanurl_enabled" => b(self.cleanurl_enabled),
            "enable_limit" => b(self.enable_limit),
            "custom_email" => b(self.custom_email),
            "email_headers" => self.email_headers.clone(),
            "message_copy" => self.message_copy.clone(),
            "user_copy" => b(self.user_copy),
            _ => String::new(),
        }
    }

    /// Settings in display order for the settings screen.
    pub fn display(&self) -> Vec<SettingDisplay> {
        SETTING_DEFS
            .iter()
            .map(|(name, label, description, setting_type)| SettingDisplay {
                name: name.to_string(),
                label: label.to_string(),
                value: self.value_of(name),
                description: description.to_string(),
                setting_type: *setting_type,
            })
            .collect()
    }

    pub fn is_boolean(name: &str) -> bool {
        SETTING_DEFS.iter().any(|(n, _, _, t)| *n == name && *t == "boolean")
    }
}

#[derive(sqlx::FromRow)]
struct SettingRow {
    name: String,
    value: String,
}

pub async fn load(pool: &PgPool) -> Result<PluginSettings, AppError> {
    let rows = sqlx::query_as::<_, SettingRow>("SELECT name, value FROM page_settings")
        .fetch_all(pool)
        .await?;
    Ok(PluginSettings::from_rows(rows.iter().map(|r| (r.name.as_str(), r.value.as_str()))))
}

/// Upsert a single setting value.
pub async fn update_value(pool: &PgPool, name: &str, value: &str) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO page_settings (name, value) VALUES ($1, $2) \
         ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value",
    )
    .bind(name)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}
