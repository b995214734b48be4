//! Loading a [`Book`] from an extracted resource container.

use std::path::Path;

use obs_model::{Book, Chapter, FRAME_COUNTS};

use crate::error::SourceError;
use crate::manifest::Manifest;

/// Read the whole container into a book.
///
/// Expects `manifest.yaml` and a `content/` directory holding one
/// markdown file per story plus the front and back matter files.
/// `description` is a human-readable provenance string recorded on
/// the book.
pub fn load_book(source_dir: &Path, description: &str) -> Result<Book, SourceError> {
    let manifest_path = source_dir.join("manifest.yaml");
    if !manifest_path.is_file() {
        return Err(SourceError::Missing("manifest.yaml".to_owned()));
    }
    let content_dir = source_dir.join("content");
    if !content_dir.is_dir() {
        return Err(SourceError::Missing("the content directory".to_owned()));
    }

    let manifest = Manifest::from_file(&manifest_path)?;
    tracing::info!(
        language = %manifest.dublin_core.language.identifier,
        version = %manifest.dublin_core.version,
        "reading chapter files"
    );

    let mut chapters = Vec::with_capacity(FRAME_COUNTS.len());
    for story in 1..=FRAME_COUNTS.len() {
        let path = content_dir.join(format!("{story:02}.md"));
        if !path.is_file() {
            return Err(SourceError::Missing(format!("content/{story:02}.md")));
        }
        chapters.push(Chapter::from_markdown(&read_markdown(&path)?, story)?);
    }
    chapters.sort_by_key(Chapter::numeric);

    let title_path = content_dir.join("front").join("title.md");
    if !title_path.is_file() {
        return Err(SourceError::Missing("the title file".to_owned()));
    }
    let title = read_markdown(&title_path)?.trim().to_owned();

    let front_path = content_dir.join("front").join("intro.md");
    if !front_path.is_file() {
        return Err(SourceError::Missing("the front/intro.md file".to_owned()));
    }
    let front_matter = strip_trailing_hashes(&read_markdown(&front_path)?);

    let back_path = content_dir.join("back").join("intro.md");
    if !back_path.is_file() {
        return Err(SourceError::Missing("the back/intro.md file".to_owned()));
    }
    let back_matter = strip_trailing_hashes(&read_markdown(&back_path)?);

    Ok(Book {
        language_id: manifest.dublin_core.language.identifier,
        language_name: manifest.dublin_core.language.title,
        direction: manifest.dublin_core.language.direction,
        title,
        publisher: manifest.dublin_core.publisher,
        version: manifest.dublin_core.version,
        checking_level: manifest.checking.checking_level,
        description: description.to_owned(),
        front_matter,
        back_matter,
        chapters,
    })
}

fn read_markdown(path: &Path) -> Result<String, SourceError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.trim_start_matches('\u{feff}').to_owned())
}

/// Drop trailing `#` runs (and the spaces before them) from every
/// line. They are heading-close markers in the source markdown and
/// would be set verbatim otherwise.
#[must_use]
pub fn strip_trailing_hashes(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_end_matches([' ', '#']))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    const MANIFEST: &str = "\
dublin_core:
  language:
    identifier: en
    title: English
    direction: ltr
  version: '4'
  publisher: unfoldingWord
checking:
  checking_level: '3'
";

    fn frame(story: usize, frame: usize) -> String {
        format!(
            "![OBS Image](https://cdn.door43.org/obs/jpg/360px/obs-en-{story:02}-{frame:02}.jpg)\n\nSome text.\n",
        )
    }

    fn write_container(root: &Path) -> PathBuf {
        let source = root.join("en_obs");
        let content = source.join("content");
        std::fs::create_dir_all(content.join("front")).unwrap();
        std::fs::create_dir_all(content.join("back")).unwrap();
        std::fs::write(source.join("manifest.yaml"), MANIFEST).unwrap();
        for story in 1..=50 {
            let body = format!(
                "# {story}. A Story\n\n{}{}A Bible story from: Genesis 1-2\n",
                frame(story, 1),
                frame(story, 2)
            );
            std::fs::write(content.join(format!("{story:02}.md")), body).unwrap();
        }
        std::fs::write(content.join("front/title.md"), "Open Bible Stories\n").unwrap();
        std::fs::write(content.join("front/intro.md"), "## About ##\n\ntext\n").unwrap();
        std::fs::write(content.join("back/intro.md"), "## Back ##\n").unwrap();
        source
    }

    #[test]
    fn loads_a_complete_container() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_container(dir.path());

        let book = load_book(&source, "D43 Catalog en").unwrap();
        assert_eq!(book.language_id, "en");
        assert_eq!(book.title, "Open Bible Stories");
        assert_eq!(book.description, "D43 Catalog en");
        assert_eq!(book.chapters.len(), 50);
        assert_eq!(book.chapters[0].number, "01");
        assert_eq!(book.chapters[49].frames.len(), 2);
        // Trailing heading hashes are stripped from the matter.
        assert!(book.front_matter.starts_with("## About\n"));
        assert!(book.back_matter.starts_with("## Back\n"));
    }

    #[test]
    fn missing_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_container(dir.path());
        std::fs::remove_file(source.join("manifest.yaml")).unwrap();

        let err = load_book(&source, "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "did not find manifest.yaml in the resource container"
        );
    }

    #[test]
    fn missing_chapter_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_container(dir.path());
        std::fs::remove_file(source.join("content/37.md")).unwrap();

        let err = load_book(&source, "x").unwrap_err();
        assert!(err.to_string().contains("content/37.md"));
    }

    #[test]
    fn missing_title_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_container(dir.path());
        std::fs::remove_file(source.join("content/front/title.md")).unwrap();

        let err = load_book(&source, "x").unwrap_err();
        assert!(err.to_string().contains("the title file"));
    }

    #[test]
    fn hash_stripping_keeps_interior_hashes() {
        assert_eq!(strip_trailing_hashes("## Heading ##\nC# notes"), "## Heading\nC# notes");
    }
}
