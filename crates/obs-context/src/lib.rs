//! ConTeXt engine invocation.
//!
//! Runs the external `context` binary (preceded by an `mtxrun` font
//! cache reload) over a generated `.tex` file and turns its very
//! chatty output into something reviewable: the full log with blank
//! runs collapsed lands in `context.out`, the scraped `tex error`
//! lines in `context.err`, and failures surface as
//! [`EngineError::TexErrors`] carrying the error excerpt.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

/// Where the shell finds the Noto fonts.
const DEFAULT_FONTS_DIR: &str = "/usr/share/fonts";

/// Font diagnostics requested from the engine; missing glyphs are the
/// most common failure for new languages.
const TRACKERS: &str = "afm.loading,fonts.missing,fonts.warnings,fonts.names,\
fonts.specifications,fonts.scaling,system.dump";

/// Lines of log tail used as the excerpt when the engine failed
/// without printing any `tex error` line.
const TAIL_LINES: usize = 20;

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());
static TEX_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^tex error.+").unwrap());

/// Error from a typesetting run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine reported errors or exited non-zero.
    #[error("errors were generated by ConTeXt:\n{excerpt}")]
    TexErrors {
        /// Scraped `tex error` lines, or the log tail when there were
        /// none.
        excerpt: String,
    },

    /// The engine exited cleanly but the PDF is not there.
    #[error("expected output {0} was not produced")]
    MissingOutput(PathBuf),

    /// I/O error launching the engine or writing logs.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Configured engine invocation.
pub struct ContextEngine {
    fonts_dir: PathBuf,
}

impl Default for ContextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
        }
    }

    #[must_use]
    pub fn fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Typeset `tex_path`, working in its directory, writing
    /// `context.out` and `context.err` under `log_dir`.
    ///
    /// Returns the path of the produced PDF.
    pub fn render(&self, tex_path: &Path, log_dir: &Path) -> Result<PathBuf, EngineError> {
        let work_dir = tex_path.parent().unwrap_or_else(|| Path::new("."));
        let out_log = log_dir.join("context.out");
        let err_log = log_dir.join("context.err");
        for stale in [&out_log, &err_log] {
            if stale.is_file() {
                std::fs::remove_file(stale)?;
            }
        }

        let command = format!(
            "mtxrun --script fonts --reload \
             && context --paranoid --nonstopmode --trackers={TRACKERS} \"{}\"",
            tex_path.display()
        );
        tracing::info!(%command, "running ConTeXt, this may take several minutes");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(work_dir)
            .env("OSFONTDIR", &self.fonts_dir)
            .output()?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        let log = collapse_blank_runs(&log);
        std::fs::write(&out_log, &log)?;

        let err_lines = scrape_tex_errors(&log);
        if !err_lines.is_empty() || !output.status.success() {
            let excerpt = if err_lines.is_empty() {
                log_tail(&log)
            } else {
                err_lines.join("\n")
            };
            std::fs::write(&err_log, &excerpt)?;
            tracing::error!(log = %err_log.display(), "ConTeXt run failed");
            return Err(EngineError::TexErrors { excerpt });
        }

        let pdf_path = tex_path.with_extension("pdf");
        if !pdf_path.is_file() {
            return Err(EngineError::MissingOutput(pdf_path));
        }
        Ok(pdf_path)
    }
}

/// Make sure a per-language font include exists under `tex_dir`,
/// falling back to a copy of the English one.
pub fn ensure_language_font(tex_dir: &Path, language_id: &str) -> std::io::Result<()> {
    let wanted = tex_dir.join(format!("noto-{language_id}.tex"));
    if !wanted.is_file() {
        tracing::debug!(language_id, "no per-language font include, copying noto-en");
        std::fs::copy(tex_dir.join("noto-en.tex"), wanted)?;
    }
    Ok(())
}

fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n").into_owned()
}

fn scrape_tex_errors(log: &str) -> Vec<&str> {
    TEX_ERROR_RE.find_iter(log).map(|m| m.as_str()).collect()
}

fn log_tail(log: &str) -> String {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_runs_collapse_to_one_newline() {
        assert_eq!(collapse_blank_runs("a\n\n\nb\n\nc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn only_leading_tex_error_lines_are_scraped() {
        let log = "fonts: loading\ntex error on line 4: undefined control sequence\n\
                   some tex error mid-line is ignored\ntex error again\n";
        assert_eq!(
            scrape_tex_errors(log),
            vec![
                "tex error on line 4: undefined control sequence",
                "tex error again"
            ]
        );
    }

    #[test]
    fn log_tail_keeps_the_last_lines() {
        let log = (0..30).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let tail = log_tail(&log);
        assert!(tail.starts_with("10"));
        assert!(tail.ends_with("29"));
    }

    #[test]
    fn missing_language_font_falls_back_to_english() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("noto-en.tex"), "\\definefontfamily[en]\n").unwrap();

        ensure_language_font(dir.path(), "fr").unwrap();
        let copied = std::fs::read_to_string(dir.path().join("noto-fr.tex")).unwrap();
        assert_eq!(copied, "\\definefontfamily[en]\n");
    }

    #[test]
    fn existing_language_font_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("noto-en.tex"), "english\n").unwrap();
        std::fs::write(dir.path().join("noto-ar.tex"), "arabic\n").unwrap();

        ensure_language_font(dir.path(), "ar").unwrap();
        let kept = std::fs::read_to_string(dir.path().join("noto-ar.tex")).unwrap();
        assert_eq!(kept, "arabic\n");
    }
}
