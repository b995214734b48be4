//! Structural validation of a parsed chapter set.

use crate::book::Chapter;
use crate::counts::FRAME_COUNTS;

/// Check every chapter against the expected story structure.
///
/// Returns the full list of problems; an empty list means the set is
/// structurally complete. Validation never stops at the first error
/// so a translator sees everything wrong with the upload at once.
#[must_use]
pub fn validate(chapters: &[Chapter]) -> Vec<String> {
    let mut errors = Vec::new();

    for chapter in chapters {
        if chapter.title.is_empty() {
            errors.push(format!("Title not found: {}", chapter.number));
        }
        if chapter.reference.is_empty() {
            errors.push(format!("Ref not found: {}", chapter.number));
        }

        let number = chapter.numeric();
        let Some(&expected) = number.checked_sub(1).and_then(|ix| FRAME_COUNTS.get(ix)) else {
            errors.push(format!("Unknown story number: {}", chapter.number));
            continue;
        };

        for frame_num in 1..=expected {
            let frame_id = format!("{number:02}-{frame_num:02}");
            match chapter.frame(&frame_id) {
                None => errors.push(format!("Frame not found: {frame_id}")),
                Some(frame) => {
                    if frame.image.is_empty() {
                        errors.push(format!("Attribute \"img\" is missing for frame {frame_id}"));
                    }
                    if frame.text.is_empty() {
                        errors.push(format!("Attribute \"text\" is missing for frame {frame_id}"));
                    }
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::book::Frame;

    /// Build a structurally complete chapter for a story number.
    fn complete_chapter(number: usize) -> Chapter {
        let frames = (1..=FRAME_COUNTS[number - 1])
            .map(|n| Frame::new(format!("{number:02}-{n:02}"), "Story text."))
            .collect();
        Chapter {
            number: format!("{number:02}"),
            title: format!("{number}. Story"),
            reference: "_A Bible story from: Genesis 1_".to_owned(),
            frames,
        }
    }

    #[test]
    fn complete_book_has_no_errors() {
        let chapters: Vec<_> = (1..=50).map(complete_chapter).collect();
        assert_eq!(validate(&chapters), Vec::<String>::new());
    }

    #[test]
    fn missing_frame_is_reported_by_id() {
        let mut chapter = complete_chapter(7);
        chapter.frames.retain(|f| f.id != "07-03");
        let errors = validate(&[chapter]);
        assert_eq!(errors, ["Frame not found: 07-03"]);
    }

    #[test]
    fn all_errors_are_collected_across_chapters() {
        let mut first = complete_chapter(1);
        first.title.clear();
        first.frames[0].text.clear();
        let mut second = complete_chapter(2);
        second.reference.clear();

        let errors = validate(&[first, second]);
        assert_eq!(
            errors,
            [
                "Title not found: 01",
                "Attribute \"text\" is missing for frame 01-01",
                "Ref not found: 02",
            ]
        );
    }

    #[test]
    fn empty_chapter_reports_every_expected_frame() {
        let chapter = Chapter {
            number: "22".to_owned(),
            title: "22. Story".to_owned(),
            reference: "_Ref_".to_owned(),
            frames: Vec::new(),
        };
        let errors = validate(&[chapter]);
        assert_eq!(errors.len(), FRAME_COUNTS[21]);
        assert_eq!(errors[0], "Frame not found: 22-01");
    }

    #[test]
    fn unknown_story_number_is_reported() {
        let chapter = Chapter {
            number: "51".to_owned(),
            title: "51".to_owned(),
            reference: "ref".to_owned(),
            frames: Vec::new(),
        };
        assert_eq!(validate(&[chapter]), ["Unknown story number: 51"]);
    }
}
