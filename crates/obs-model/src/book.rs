//! Typed records for one translated OBS edition.

use serde::Deserialize;

/// Base URL for the published story illustrations.
const IMAGE_URL_BASE: &str = "https://cdn.door43.org/obs/jpg/360px";

/// Text direction of the translated language.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// ConTeXt paragraph direction keyword (`TLT` / `TRT`).
    #[must_use]
    pub fn context_dir(self) -> &'static str {
        match self {
            Self::Ltr => "TLT",
            Self::Rtl => "TRT",
        }
    }
}

/// One illustrated unit within a chapter.
///
/// Created once by the parser; rendering treats the text as input to a
/// transform and never mutates the frame itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Frame id in `CC-FF` form (`"01-16"`), unique within a chapter.
    pub id: String,
    /// Illustration URL, derived deterministically from the id.
    pub image: String,
    /// Raw story text for this frame.
    pub text: String,
}

impl Frame {
    /// Create a frame, deriving the illustration URL from `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        let image = Self::image_url(&id);
        Self {
            id,
            image,
            text: text.into(),
        }
    }

    /// Published illustration URL for a frame id.
    #[must_use]
    pub fn image_url(id: &str) -> String {
        format!("{IMAGE_URL_BASE}/obs-en-{id}.jpg")
    }
}

/// One of the 50 stories.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Chapter {
    /// Zero-padded two-digit story number (`"01"`..`"50"`).
    pub number: String,
    /// Story title from the leading heading.
    pub title: String,
    /// Closing scripture reference line.
    pub reference: String,
    /// Frames in ascending id order.
    pub frames: Vec<Frame>,
}

impl Chapter {
    /// Numeric story number, or 0 when the number field is malformed.
    #[must_use]
    pub fn numeric(&self) -> usize {
        self.number.parse().unwrap_or(0)
    }

    /// Find a frame by id.
    #[must_use]
    pub fn frame(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }
}

/// A complete translated book: manifest metadata, matter and chapters.
#[derive(Clone, Debug, Default)]
pub struct Book {
    /// Language identifier (`"en"`, `"es-419"`, ...).
    pub language_id: String,
    /// Localized language name.
    pub language_name: String,
    /// Text direction of the language.
    pub direction: Direction,
    /// Vernacular book title.
    pub title: String,
    /// Publisher from the manifest.
    pub publisher: String,
    /// Content version from the manifest.
    pub version: String,
    /// Translation-quality tier from the manifest.
    pub checking_level: String,
    /// Where this content came from, for the license stamp.
    pub description: String,
    /// Raw front-matter markdown.
    pub front_matter: String,
    /// Raw back-matter markdown.
    pub back_matter: String,
    /// Chapters sorted ascending by numeric story number.
    pub chapters: Vec<Chapter>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn frame_image_derived_from_id() {
        let frame = Frame::new("07-03", "Some text.");
        assert_eq!(
            frame.image,
            "https://cdn.door43.org/obs/jpg/360px/obs-en-07-03.jpg"
        );
    }

    #[test]
    fn direction_context_keywords() {
        assert_eq!(Direction::Ltr.context_dir(), "TLT");
        assert_eq!(Direction::Rtl.context_dir(), "TRT");
    }

    #[test]
    fn direction_deserializes_from_manifest_values() {
        let dir: Direction = serde_yaml::from_str("rtl").unwrap();
        assert_eq!(dir, Direction::Rtl);
    }
}
