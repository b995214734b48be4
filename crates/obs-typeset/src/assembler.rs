//! Whole-document assembly.
//!
//! Walks the master template line by line, splicing the rendered
//! front matter, chapter body and back matter in at the structural
//! markers and resolving configuration tokens everywhere else.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use obs_model::Book;

use crate::config::RenderConfig;
use crate::error::TypesetError;
use crate::matter::{render_matter, split_front_matter};
use crate::pagination::{PaginationOptions, paginate};
use crate::snippets::{SnippetSet, substitute_tokens};

const TITLE_LOGO_MARKER: &str = "===TITLE.LOGO===";
const FRONT_ABOUT_MARKER: &str = "===FRONT.MATTER.ABOUT===";
const FRONT_LICENSE_MARKER: &str = "===FRONT.MATTER.LICENSE===";
const CHAPTERS_MARKER: &str = "===CHAPTERS===";
const BACK_MATTER_MARKER: &str = "===BACK.MATTER===";

/// Logo shown instead of a vernacular title for the English original.
const UW_OBS_LOGO_PATH: &str = "/opt/obs/png/uW_OBS_Logo.png";

/// Template-relative resource references that must become absolute
/// when an override snippet directory is in use.
static RELATIVE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([{ ])obs/tex/").unwrap());

/// Renders one book to a complete typesetting document.
pub struct Assembler<'a> {
    book: &'a Book,
    snippets: &'a SnippetSet,
    config: RenderConfig,
    max_chapters: usize,
    image_resolution: String,
}

impl<'a> Assembler<'a> {
    #[must_use]
    pub fn new(book: &'a Book, snippets: &'a SnippetSet, config: RenderConfig) -> Self {
        Self {
            book,
            snippets,
            config,
            max_chapters: 0,
            image_resolution: "360px".to_owned(),
        }
    }

    /// Limit output to the first `n` chapters; 0 keeps them all.
    #[must_use]
    pub fn max_chapters(mut self, n: usize) -> Self {
        self.max_chapters = n;
        self
    }

    #[must_use]
    pub fn image_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.image_resolution = resolution.into();
        self
    }

    /// Produce the full document text.
    pub fn assemble(&self) -> Result<String, TypesetError> {
        let front = render_matter(&self.book.front_matter);
        let (about, mut license) = split_front_matter(&front);
        license.push_str(&format!(
            "\n\nPDF created {} from {}.",
            chrono::Local::now().date_naive(),
            self.book.description
        ));

        let back = render_matter(&self.book.back_matter);

        let options = PaginationOptions {
            max_chapters: self.max_chapters,
            image_resolution: &self.image_resolution,
            language: &self.book.language_id,
            direction: self.book.direction,
        };
        let chapters = paginate(&self.book.chapters, &options, self.snippets, &self.config)?;

        let mut template = self.snippets.raw("main_template.tex")?;
        if let Some(dir) = self.snippets.dir() {
            template = RELATIVE_PATH_RE
                .replace_all(&template, |caps: &Captures<'_>| {
                    format!("{}{}/", &caps[1], dir.display())
                })
                .into_owned();
        }

        let mut out: Vec<String> = Vec::new();
        for line in template.lines() {
            if line.contains(TITLE_LOGO_MARKER) {
                out.push(self.title_logo());
            } else if line.contains(FRONT_ABOUT_MARKER) {
                out.push(about.clone());
            } else if line.contains(FRONT_LICENSE_MARKER) {
                out.push(license.clone());
            } else if line.contains(CHAPTERS_MARKER) {
                out.push(chapters.clone());
            } else if line.contains(BACK_MATTER_MARKER) {
                out.push(back.clone());
            } else {
                out.push(substitute_tokens(line, &self.config));
            }
        }
        Ok(out.join("\n"))
    }

    /// First-page heading: the registered logo for the English
    /// original, the vernacular title set large for everything else,
    /// followed by the language name and code.
    fn title_logo(&self) -> String {
        let heading = if self.book.publisher == "unfoldingWord" && self.book.language_id == "en" {
            format!("\\midaligned{{\\externalfigure[{UW_OBS_LOGO_PATH}]}}")
        } else {
            format!(
                "\\midaligned{{\\textdir {}\\tfd{{\\WORD{{{}}}}}}}",
                self.book.direction.context_dir(),
                self.book.title
            )
        };
        format!(
            "    {heading}\n    \\blank[15em]\n    \\midaligned{{\\tfb{{{}}}}}\n    \\midaligned{{{}}}",
            self.book.language_name, self.book.language_id
        )
    }
}
