//! Non-breaking-space corrections for scripture references.
//!
//! The closing reference line of each story ("A Bible story from:
//! Genesis 1-2") must not break across lines in awkward places: a
//! chapter/verse number orphaned at a line start, a thousands
//! separator split from its digits, a hyphenated range broken at the
//! hyphen. This is a narrower rule set than [`markup`](crate::markup)
//! and applies only to reference strings.

use std::sync::LazyLock;

use regex::Regex;

/// Non-breaking 1-en space.
const NBSP: &str = "~";
/// Three kerns in a row: a non-breaking space with a little width.
const NBKN: &str = r"\,\,\,";
/// Non-breaking hyphen (U+2012, figure dash).
const NBHY: &str = "\u{2012}";

static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[-\u{2010}\u{2012}\u{2013}\u{FE63}]").unwrap());
static EM_HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{2014}\u{FE58}]").unwrap());
static WORD_THEN_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)\s+(\d)").unwrap());
static COLON_NOT_AFTER_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\d\s])\s*([:;])\s*(\S)").unwrap());
static COMMA_BETWEEN_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*(,)\s*(\d)").unwrap());
static ORDINAL_BOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([123](?:\.|\p{L}{1,3})?)\s").unwrap());

/// Tighten a scripture-reference string so chapter/verse numbers,
/// ranges and book ordinals cannot be separated by a line break.
#[must_use]
pub fn tighten_reference(text: &str) -> String {
    let text = HYPHEN_RE.replace_all(text, NBHY);
    let text = EM_HYPHEN_RE.replace_all(&text, NBHY);
    let text = WORD_THEN_NUMBER_RE.replace_all(&text, format!("${{1}}{NBKN}${{2}}"));
    let text = COLON_NOT_AFTER_DIGIT_RE.replace_all(&text, "$1$2 $3");
    let text = COMMA_BETWEEN_DIGITS_RE.replace_all(&text, "$1$2$3");
    let text = ORDINAL_BOOK_RE.replace_all(&text, format!("${{1}}{NBSP}"));
    text.into_owned()
}
