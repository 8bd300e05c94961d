//! User-facing strings.

pub const PLUGIN_NAME: &str = "pluginname";
pub const NO_ACCESS: &str = "noaccess";
pub const CANNOT_SEND: &str = "cannot_send";
pub const ADD_PAGE: &str = "addpage";
pub const PAGE_SAVED: &str = "pagesaved";
pub const PAGE_DELETED: &str = "pagedeleted";
pub const SETTINGS_SAVED: &str = "settingssaved";

const EN: &[(&str, &str)] = &[
    (PLUGIN_NAME, "Pages"),
    (NO_ACCESS, "Sorry, you do not have access to this page."),
    (CANNOT_SEND, "You have already submitted this form. It cannot be sent again."),
    (ADD_PAGE, "Add Page"),
    (PAGE_SAVED, "Page saved successfully"),
    (PAGE_DELETED, "Page deleted"),
    (SETTINGS_SAVED, "Settings saved successfully"),
];

/// Look up a string by key. Unknown keys come back as `[[key]]` so they stand out.
pub fn get_string(key: &str) -> String {
    EN.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| {
            log::warn!("Missing string '{key}'");
            format!("[[{key}]]")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_keys() {
        assert_eq!(get_string(PLUGIN_NAME), "Pages");
        assert_eq!(get_string("nope"), "[[nope]]");
    }
}
