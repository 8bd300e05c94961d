use std::env;
use std::path::PathBuf;

/// Process-level configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub files_dir: PathBuf,
    pub admin_email: String,
    pub login_url: String,
    pub site_name: String,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackendKind {
    Smtp,
    Console,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackendKind,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_starttls: bool,
    /// Envelope sender used when a message carries no explicit From.
    pub from: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn var_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn var_flag(name: &str, default: bool) -> bool {
    match var_opt(name) {
        Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let admin_email = var_or("ADMIN_EMAIL", "admin@localhost");

        let backend = match var_or("MAIL_BACKEND", "console").to_ascii_lowercase().as_str() {
            "smtp" => MailBackendKind::Smtp,
            "console" => MailBackendKind::Console,
            other => {
                log::warn!("Unknown MAIL_BACKEND '{other}', falling back to console");
                MailBackendKind::Console
            }
        };

        let smtp_port = var_or("SMTP_PORT", "587").parse::<u16>().unwrap_or_else(|_| {
            log::warn!("SMTP_PORT is not a valid port, using 587");
            587
        });

        let mail = MailConfig {
            backend,
            smtp_host: var_or("SMTP_HOST", "localhost"),
            smtp_port,
            smtp_username: var_opt("SMTP_USERNAME"),
            smtp_password: var_opt("SMTP_PASSWORD"),
            smtp_starttls: var_flag("SMTP_STARTTLS", true),
            from: var_or("MAIL_FROM", &admin_email),
        };

        Self {
            database_url: var_or("DATABASE_URL", "postgres://localhost/custompages"),
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:8080"),
            session_key: var_opt("SESSION_KEY"),
            files_dir: PathBuf::from(var_or("FILES_DIR", "data/files")),
            admin_email,
            login_url: var_or("LOGIN_URL", "/login"),
            site_name: var_or("SITE_NAME", "Pages"),
            mail,
        }
    }
}
