//! Token substitution for page content, thank-you messages and mail templates.
//!
//! Values are inserted verbatim; callers escape them first when the target is
//! HTML. Substitution is a single left-to-right pass, so a value containing
//! another token is never expanded a second time.

use regex::{Regex, RegexBuilder};

/// An ordered token to value mapping, e.g. `{firstname}` to `Ada`.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    entries: Vec<(String, String)>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a token. `token` is the full literal, braces included.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
        self
    }

    /// Add `{name}` for a bare name.
    pub fn insert_braced(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.insert(format!("{{{name}}}"), value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-sensitive substitution.
    pub fn apply(&self, text: &str) -> String {
        self.substitute(text, false)
    }

    /// Case-insensitive substitution. When two tokens differ only by case the
    /// first one inserted wins.
    pub fn apply_ci(&self, text: &str) -> String {
        self.substitute(text, true)
    }

    fn substitute(&self, text: &str, case_insensitive: bool) -> String {
        let Some(pattern) = self.pattern(case_insensitive) else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let found = &caps[0];
                self.entries
                    .iter()
                    .find(|(token, _)| {
                        if case_insensitive {
                            token.to_lowercase() == found.to_lowercase()
                        } else {
                            token == found
                        }
                    })
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| found.to_string())
            })
            .into_owned()
    }

    fn pattern(&self, case_insensitive: bool) -> Option<Regex> {
        if self.entries.is_empty() {
            return None;
        }
        // Longest first so `{name}` never shadows `{name2}`-style overlaps.
        let mut tokens: Vec<&str> = self.entries.iter().map(|(t, _)| t.as_str()).collect();
        tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        RegexBuilder::new(&alternation)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| log::error!("Token pattern failed to compile: {e}"))
            .ok()
    }
}

/// Escape a value for insertion into HTML text or a quoted attribute.
pub fn escape_html(value: &str) -> String {
    html_escape::encode_quoted_attribute(value).into_owned()
}

/// Insert `<br />` before every line break, keeping the break.
pub fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("<br />\r\n");
            }
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text rendition of a small HTML message: paragraph and line breaks
/// become CRLF, `&nbsp;` is dropped and all remaining tags are stripped.
pub fn html_to_plain(html: &str) -> String {
    let spaced = html
        .replace("</p>", "</p>\r\n")
        .replace("<br>", "<br>\r\n")
        .replace("&nbsp;", "");
    strip_tags(&spaced)
}

pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Upper-case the first character (mail summary labels).
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
