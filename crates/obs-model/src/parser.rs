//! Chapter markdown parser.
//!
//! A story file looks like:
//!
//! ```markdown
//! # 1. The Creation
//!
//! ![OBS Image](https://cdn.door43.org/obs/jpg/360px/obs-en-01-01.jpg)
//!
//! This is how the beginning of everything happened...
//!
//! ![OBS Image](https://cdn.door43.org/obs/jpg/360px/obs-en-01-02.jpg)
//!
//! God spoke, and...
//!
//! _A Bible story from: Genesis 1-2_
//! ```
//!
//! The parser extracts the title, the trailing reference line and the
//! image-marker/text pairs. Missing pieces are tolerated here and
//! reported later by [`validate`](crate::validate); the one hard error
//! is an image marker claiming a different chapter number, which means
//! the source files are cross-contaminated.

use std::sync::LazyLock;

use regex::Regex;

use crate::book::{Chapter, Frame};

/// Leading `# Title` heading at the start of the file.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#([^\n]*?)#*\n").unwrap());

/// Image marker embedding the chapter and frame numbers.
static FRAME_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[OBS Image\]\([^)\n]*?obs-en-(\d{2})-(\d{2})\.jpg[^)\n]*\)").unwrap()
});

/// Error raised while parsing a chapter file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// An image marker embeds a chapter number other than the one the
    /// file was loaded as. Fatal: the source data is wrong, not merely
    /// incomplete.
    #[error("expected chapter {expected} but found {found}")]
    ChapterMismatch { expected: usize, found: usize },
}

impl Chapter {
    /// Parse one story's markdown into a [`Chapter`].
    ///
    /// `chapter_number` is the story number the file was loaded as
    /// (from its filename); every embedded frame marker must agree.
    pub fn from_markdown(markdown: &str, chapter_number: usize) -> Result<Self, ParseError> {
        let mut chapter = Self {
            number: format!("{chapter_number:02}"),
            ..Self::default()
        };

        let mut text = markdown.replace("\r\n", "\n");

        if let Some(caps) = TITLE_RE.captures(&text) {
            chapter.title = caps[1].trim().to_owned();
            let whole = caps.get(0).unwrap().range();
            text.replace_range(whole, "");
        }

        if let Some(reference) = last_nonempty_line(&text) {
            chapter.reference = reference.trim().to_owned();
            let start = text.rfind(reference.trim_end()).unwrap_or(text.len());
            text.truncate(start);
        }

        // Each frame's text runs from the end of its marker to the
        // start of the next marker (or end of input).
        let markers: Vec<_> = FRAME_MARKER_RE.captures_iter(&text).collect();
        for (ix, caps) in markers.iter().enumerate() {
            let found: usize = caps[1].parse().unwrap_or(0);
            if found != chapter_number {
                return Err(ParseError::ChapterMismatch {
                    expected: chapter_number,
                    found,
                });
            }

            let id = format!("{}-{}", &caps[1], &caps[2]);
            let text_start = caps.get(0).unwrap().end();
            let text_end = markers
                .get(ix + 1)
                .map_or(text.len(), |next| next.get(0).unwrap().start());
            let frame_text = text[text_start..text_end].trim();
            chapter.frames.push(Frame::new(id, frame_text));
        }

        chapter.frames.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(chapter)
    }
}

/// The last line of `text` containing anything but whitespace.
fn last_nonempty_line(text: &str) -> Option<&str> {
    text.lines().rev().find(|line| !line.trim().is_empty())
}
