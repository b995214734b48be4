//! Layout-snippet resource set.
//!
//! The vertical-space bookkeeping around each physical page is not
//! generated in code; it is assembled from named ConTeXt snippet files
//! carrying two kinds of placeholders:
//!
//! - `<<<[token]>>>` — configuration tokens, resolved at load time
//!   from the [`RenderConfig`]. An unknown token is logged and
//!   replaced with a visible `nothing` so rendering still completes.
//! - `{{name}}` — frame-level values (texts, images, page flags),
//!   resolved at use time by the pagination engine. A miss here is a
//!   fatal [`TypesetError::UnresolvedPlaceholder`].
//!
//! The default set is compiled in; a directory of override files can
//! be supplied for experimenting with layout changes without a
//! rebuild.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::RenderConfig;
use crate::error::TypesetError;

/// Compiled-in snippet and template sources.
const EMBEDDED: &[(&str, &str)] = &[
    (
        "calculate-vertical-need.tex",
        include_str!("../resources/tex/calculate-vertical-need.tex"),
    ),
    (
        "calculate-leftover.tex",
        include_str!("../resources/tex/calculate-leftover.tex"),
    ),
    (
        "begin-adjust-loop.tex",
        include_str!("../resources/tex/begin-adjust-loop.tex"),
    ),
    (
        "adjust-spacing.tex",
        include_str!("../resources/tex/adjust-spacing.tex"),
    ),
    (
        "end-adjust-loop.tex",
        include_str!("../resources/tex/end-adjust-loop.tex"),
    ),
    (
        "verify-vertical-space.tex",
        include_str!("../resources/tex/verify-vertical-space.tex"),
    ),
    (
        "place-reference.tex",
        include_str!("../resources/tex/place-reference.tex"),
    ),
    (
        "main_template.tex",
        include_str!("../resources/tex/main_template.tex"),
    ),
];

/// Configuration token: `<<<[name]>>>`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<<\[([^\[\]<>=]+)\]>>>").unwrap());

/// Frame-level placeholder: `{{name}}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z][a-z0-9_]*)\}\}").unwrap());

/// Lines whose trailing whitespace-only/comment tails carry no TeX.
static SIGNIFICANT_TEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9\\{}\[\]]").unwrap());

/// Token substitution passes before giving up on a cycle.
const MAX_TOKEN_PASSES: usize = 8;

/// Named snippet/template resource set.
#[derive(Clone, Debug, Default)]
pub struct SnippetSet {
    dir: Option<PathBuf>,
}

impl SnippetSet {
    /// The compiled-in resource set.
    #[must_use]
    pub fn embedded() -> Self {
        Self::default()
    }

    /// A resource set read from a directory of override files.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, TypesetError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(TypesetError::ResourceMissing(dir));
        }
        Ok(Self { dir: Some(dir) })
    }

    /// Override directory, when one was supplied.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Raw text of a named resource.
    pub fn raw(&self, name: &str) -> Result<String, TypesetError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(TypesetError::ResourceMissing(path));
            }
            let text = fs::read_to_string(&path)?;
            // Files saved with a BOM confuse ConTeXt downstream.
            return Ok(text.trim_start_matches('\u{feff}').to_owned());
        }

        EMBEDDED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| (*text).to_owned())
            .ok_or_else(|| TypesetError::ResourceMissing(PathBuf::from(name)))
    }

    /// Load a snippet: resolve configuration tokens, drop trailing
    /// lines with no significant TeX, and indent every line by
    /// `indent`.
    pub fn load(
        &self,
        indent: &str,
        name: &str,
        config: &RenderConfig,
    ) -> Result<String, TypesetError> {
        let text = substitute_tokens(&self.raw(name)?, config);

        let mut lines: Vec<&str> = text.lines().collect();
        while let Some(last) = lines.last() {
            if SIGNIFICANT_TEX_RE.is_match(last) {
                break;
            }
            lines.pop();
        }

        let mut out = String::with_capacity(text.len() + lines.len() * indent.len());
        for line in &lines {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Resolve `<<<[token]>>>` occurrences from the configuration,
/// repeating while substituted values introduce further tokens.
///
/// Unknown tokens degrade to a visible `nothing` with a logged
/// warning: a partially-wrong document is more useful for review than
/// none at all.
pub(crate) fn substitute_tokens(text: &str, config: &RenderConfig) -> String {
    let mut text = text.to_owned();
    for _ in 0..MAX_TOKEN_PASSES {
        if !TOKEN_RE.is_match(&text) {
            break;
        }
        text = TOKEN_RE
            .replace_all(&text, |caps: &Captures<'_>| {
                let token = &caps[1];
                config.get(token).map_or_else(
                    || {
                        tracing::warn!(token, "no value for configuration token");
                        "nothing".to_owned()
                    },
                    ToOwned::to_owned,
                )
            })
            .into_owned();
    }
    text
}

/// Substitute every `{{name}}` in a composed snippet from `values`.
///
/// All placeholders are caller-supplied, so an unresolved one is a
/// fatal error naming the snippet and the placeholder.
pub(crate) fn fill(
    snippet: &str,
    template: &str,
    values: &[(&str, &str)],
) -> Result<String, TypesetError> {
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if !values.iter().any(|(key, _)| *key == name) {
            return Err(TypesetError::UnresolvedPlaceholder {
                snippet: snippet.to_owned(),
                name: name.to_owned(),
            });
        }
    }

    Ok(PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
                .unwrap_or_default()
        })
        .into_owned())
}
