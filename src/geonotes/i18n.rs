//! Message translation hook.
//!
//! The core produces English messages and hands them to a [`Translator`]
//! before they reach a caller. Translators must be pure: same key, same text.

use std::collections::HashMap;

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Lookup table translator; unknown keys fall through untranslated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Translates a multi-line message line by line, keeping `field: ` prefixes.
///
/// Invalid-request failures join one `parameter: message` line per error;
/// only the message part is a translation key.
pub fn translate_message(translator: &dyn Translator, message: &str) -> String {
    message
        .split('\n')
        .map(|line| match line.split_once(": ") {
            Some((field, text)) if is_field_name(field) => {
                format!("{}: {}", field, translator.translate(text))
            }
            _ => translator.translate(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_field_name(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farsi() -> Catalog {
        [
            ("permission denied", "دسترسی مجاز نیست"),
            ("Invalid user", "کاربر نامعتبر"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn identity_keeps_text() {
        assert_eq!(IdentityTranslator.translate("Session expired"), "Session expired");
    }

    #[test]
    fn catalog_falls_back_to_key() {
        let catalog = farsi();
        assert_eq!(catalog.translate("permission denied"), "دسترسی مجاز نیست");
        assert_eq!(catalog.translate("Session expired"), "Session expired");
    }

    #[test]
    fn message_lines_keep_field_prefixes() {
        let catalog = farsi().with_entry("Invalid code value", "کد نامعتبر");
        assert_eq!(
            translate_message(&catalog, "code: Invalid code value\nuser: Invalid user"),
            "code: کد نامعتبر\nuser: کاربر نامعتبر"
        );
    }

    #[test]
    fn system_messages_are_translated_whole() {
        let catalog = Catalog::new().with_entry("StoreError: disk full", "x");
        assert_eq!(translate_message(&catalog, "StoreError: disk full"), "x");
    }
}
