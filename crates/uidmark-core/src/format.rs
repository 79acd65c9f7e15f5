//! Copy templates
//!
//! Templates may contain `{title}`, `{uidKey}` and `{uid}`. Substitution is a
//! single pass: text coming from a note is never scanned for placeholders.

use crate::settings::Settings;

const TITLE: &str = "{title}";
const UID_KEY: &str = "{uidKey}";
const UID: &str = "{uid}";

/// Render a template for one note
pub fn render(template: &str, title: &str, uid_key: &str, uid: Option<&str>) -> String {
    let mut out = String::with_capacity(template.len() + title.len());
    let mut rest = template;

    while let Some(idx) = rest.find('{') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        let (value, consumed) = if tail.starts_with(TITLE) {
            (title, TITLE.len())
        } else if tail.starts_with(UID_KEY) {
            (uid_key, UID_KEY.len())
        } else if tail.starts_with(UID) {
            (uid.unwrap_or(""), UID.len())
        } else {
            ("{", 1)
        };

        out.push_str(value);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}

/// Render a note's copy line using the configured templates
pub fn render_entry(settings: &Settings, title: &str, uid: Option<&str>) -> String {
    match uid {
        Some(uid) => render(
            &settings.copy_format_string,
            title,
            &settings.uid_key,
            Some(uid),
        ),
        None => render(
            &settings.copy_format_string_missing_uid,
            title,
            &settings.uid_key,
            None,
        ),
    }
}
