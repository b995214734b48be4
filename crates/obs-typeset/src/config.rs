//! Render configuration tokens.
//!
//! The master template and the layout snippets reference named tokens
//! (font sizes, spacing, alignment, table-of-contents density). The
//! configuration is an open string map built once per render: caller
//! overrides first, then built-in defaults for anything absent. The
//! snapshot is immutable afterwards.

use std::collections::BTreeMap;

use obs_model::Book;

/// Built-in token defaults.
///
/// `textwidth` is the width of each figure at 72.27 pt/inch; the
/// spacing values are the ones that work well for en/fr/es.
const DEFAULTS: &[(&str, &str)] = &[
    ("textwidth", "308.9pt"),
    ("topspace", "28pt"),
    ("botspace", "28pt"),
    ("fontface", "noto"),
    ("fontstyle", "sans"),
    ("front_align", "flushleft"),
    ("back_align", "flushleft"),
    ("bodysize", "10.0pt"),
    ("bodybaseline", "12.0pt"),
    ("body_align", "width"),
    ("tfasize", "1.10"),
    ("tfbsize", "1.20"),
    ("tfcsize", "1.40"),
    ("tfdsize", "1.60"),
    ("tfesize", "1.80"),
    ("tfxsize", "0.9"),
    ("tfxxsize", "0.8"),
    ("smallsize", "0.80"),
    ("tocsize", "12pt"),
    ("licsize", "9pt"),
    ("tocbaseline", "16pt"),
    ("licbaseline", "9pt"),
    ("tocperpage", "26"),
];

/// Immutable token snapshot for one render.
#[derive(Clone, Debug, Default)]
pub struct RenderConfig {
    values: BTreeMap<String, String>,
}

impl RenderConfig {
    /// Build a snapshot from caller overrides plus built-in defaults.
    #[must_use]
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        let mut values = overrides;
        for &(key, value) in DEFAULTS {
            values
                .entry(key.to_owned())
                .or_insert_with(|| value.to_owned());
        }
        Self { values }
    }

    /// Build the snapshot for a book: caller overrides first, then
    /// language and title tokens from the manifest metadata, then the
    /// built-in defaults. A translated config may override `toctitle`.
    #[must_use]
    pub fn for_book(book: &Book, overrides: BTreeMap<String, String>) -> Self {
        let mut values = overrides;
        values
            .entry("language_id".to_owned())
            .or_insert_with(|| book.language_id.clone());
        values
            .entry("language_direction".to_owned())
            .or_insert_with(|| {
                match book.direction {
                    obs_model::Direction::Ltr => "ltr",
                    obs_model::Direction::Rtl => "rtl",
                }
                .to_owned()
            });
        values
            .entry("toctitle".to_owned())
            .or_insert_with(|| book.title.clone());
        Self::new(values)
    }

    /// Look up a token value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_fill_absent_keys() {
        let config = RenderConfig::new(BTreeMap::new());
        assert_eq!(config.get("bodysize"), Some("10.0pt"));
        assert_eq!(config.get("tocperpage"), Some("26"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("bodysize".to_owned(), "11.0pt".to_owned());
        let config = RenderConfig::new(overrides);
        assert_eq!(config.get("bodysize"), Some("11.0pt"));
        assert_eq!(config.get("bodybaseline"), Some("12.0pt"));
    }

    #[test]
    fn unknown_keys_are_none() {
        let config = RenderConfig::new(BTreeMap::new());
        assert_eq!(config.get("no_such_token"), None);
    }

    #[test]
    fn book_tokens_are_injected() {
        let book = Book {
            language_id: "fr".to_owned(),
            title: "Histoires".to_owned(),
            direction: obs_model::Direction::Ltr,
            ..Book::default()
        };
        let config = RenderConfig::for_book(&book, BTreeMap::new());
        assert_eq!(config.get("language_id"), Some("fr"));
        assert_eq!(config.get("language_direction"), Some("ltr"));
        assert_eq!(config.get("toctitle"), Some("Histoires"));
    }

    #[test]
    fn caller_overrides_win_over_book_tokens() {
        let book = Book {
            title: "Histoires".to_owned(),
            ..Book::default()
        };
        let mut overrides = BTreeMap::new();
        overrides.insert("toctitle".to_owned(), "Table des histoires".to_owned());
        let config = RenderConfig::for_book(&book, overrides);
        assert_eq!(config.get("toctitle"), Some("Table des histoires"));
    }
}
