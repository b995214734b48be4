//! Page layout for story chapters.
//!
//! Frames are laid out two per physical page (top and bottom slot).
//! For the frame opening a page we cannot know how much vertical space
//! the pair will need without looking ahead, so the engine emits a
//! measuring block (assembled from the layout snippets) parameterized
//! by both frames; the odd-indexed frame then consumes the computed
//! `\leftover` instead of measuring again. A frame pair that is the
//! chapter's last page must additionally reserve room for the
//! scripture reference placed after it.

use obs_model::{Chapter, Direction, Frame};

use crate::config::RenderConfig;
use crate::error::TypesetError;
use crate::markup;
use crate::refs::tighten_reference;
use crate::snippets::{SnippetSet, fill};

/// Base indent for chapter-level markup.
const INDENT: &str = "    ";
/// Indent for markup inside a physical page box.
const INDENT2: &str = "        ";
/// Indent for markup inside a placed figure.
const INDENT3: &str = "            ";

/// Illustrations live on the typesetting host, not the CDN.
const CDN_IMAGE_PREFIX: &str = "https://cdn.door43.org/obs/jpg/360px/";
const LOCAL_IMAGE_DIR: &str = "/opt/obs/jpg";
const LOCAL_IMAGE_PREFIX: &str = "/opt/obs/jpg/360px/";

/// Options for one pagination run.
#[derive(Clone, Copy, Debug)]
pub struct PaginationOptions<'a> {
    /// Stop after this many chapters; 0 means all of them.
    pub max_chapters: usize,
    /// Image resolution tag selecting an illustration directory.
    pub image_resolution: &'a str,
    /// Language code, used in diagnostic `\message` lines.
    pub language: &'a str,
    /// Text direction for titles and references.
    pub direction: Direction,
}

/// Layout state for one frame, decided before anything is emitted.
///
/// Explicit so the cross-iteration coupling (parity, look-ahead,
/// leftover space) is visible in one place.
struct FrameSlot<'c> {
    frame: &'c Frame,
    /// Even index: this frame opens a physical page (top slot).
    is_even: bool,
    /// This frame sits on the chapter's final physical page.
    is_last_page: bool,
    /// The page this frame opens will receive a second frame.
    page_is_full: bool,
    /// Look-ahead to the frame sharing the page, when there is one.
    next: Option<&'c Frame>,
}

impl<'c> FrameSlot<'c> {
    fn new(index: usize, frames: &'c [Frame]) -> Self {
        let count = frames.len();
        let is_even = index % 2 == 0;
        let is_last_page = if is_even {
            index + 2 >= count
        } else {
            index + 1 >= count
        };
        Self {
            frame: &frames[index],
            is_even,
            is_last_page,
            page_is_full: !is_even || index + 1 < count,
            next: frames.get(index + 1),
        }
    }
}

/// Render the chapter body markup.
pub fn paginate(
    chapters: &[Chapter],
    options: &PaginationOptions<'_>,
    snippets: &SnippetSet,
    config: &RenderConfig,
) -> Result<String, TypesetError> {
    let calc_need = snippets.load(INDENT, "calculate-vertical-need.tex", config)?;
    let calc_leftover = snippets.load(INDENT, "calculate-leftover.tex", config)?;
    let begin_loop = snippets.load(INDENT, "begin-adjust-loop.tex", config)?;
    let in_leftover = snippets.load(INDENT2, "calculate-leftover.tex", config)?;
    let in_adjust = snippets.load(INDENT2, "adjust-spacing.tex", config)?;
    let end_loop = snippets.load(INDENT, "end-adjust-loop.tex", config)?;
    let verify = snippets.load(INDENT, "verify-vertical-space.tex", config)?;
    let place_ref = snippets.load(INDENT, "place-reference.tex", config)?;

    let adjust_one = format!("{calc_need}{calc_leftover}{verify}");
    let adjust_two =
        format!("{calc_need}{begin_loop}{in_leftover}{in_adjust}{end_loop}{calc_leftover}{verify}");

    let mut output: Vec<String> = Vec::new();

    for (chapter_ix, chapter) in chapters.iter().enumerate() {
        if options.max_chapters > 0 && chapter_ix >= options.max_chapters {
            break;
        }

        output.push(title_block(&chapter.title, options.direction));

        let reference = prepare_reference(&chapter.reference);

        for index in 0..chapter.frames.len() {
            let slot = FrameSlot::new(index, &chapter.frames);
            let frame_text = markup::apply_inline(
                &slot.frame.text.replace(CDN_IMAGE_PREFIX, LOCAL_IMAGE_PREFIX),
            );
            let image = image_block(&slot.frame.id, options.image_resolution);

            let needalso = if slot.is_last_page { "\\refneed + " } else { "" };
            let alsoreg = if slot.is_last_page {
                "\\refneed"
            } else {
                "\\EmptyString"
            };
            let pageword = if slot.is_last_page {
                "LAST_PAGE"
            } else {
                "CONTINUED"
            };
            let islastpage = if slot.is_last_page { "true" } else { "false" };

            if !slot.is_even {
                output.push(format!("{INDENT2}\\vskip \\the\\leftover"));
            } else {
                let (next_text, next_image) = match (slot.page_is_full, slot.next) {
                    (true, Some(next)) => (
                        markup::apply_inline(&next.text),
                        image_block(&next.id, options.image_resolution),
                    ),
                    _ => (String::new(), String::new()),
                };
                let (snippet_name, template) = if slot.page_is_full {
                    ("two-slot adjustment", &adjust_two)
                } else {
                    ("single-slot adjustment", &adjust_one)
                };
                let values = [
                    ("pageword", pageword),
                    ("needalso", needalso),
                    ("alsoreg", alsoreg),
                    ("topimg", image.as_str()),
                    ("botimg", next_image.as_str()),
                    ("lang", options.language),
                    ("fid", slot.frame.id.as_str()),
                    ("islastpage", islastpage),
                    ("toptxt", frame_text.as_str()),
                    ("bottxt", next_text.as_str()),
                    ("reftxt", reference.as_str()),
                ];
                output.push(fill(snippet_name, template, &values)?);
                output.push(page_open());
            }

            output.push(format!(
                "{INDENT2}\\message{{FIGURE: {}-{}}}",
                options.language, slot.frame.id
            ));
            output.push(frame_block(if slot.is_even { "toptry" } else { "bottry" }));
            output.push(image);

            if !slot.is_even && !slot.is_last_page {
                output.push(page_close());
                output.push(format!("{INDENT}\\page[yes]"));
            }
        }

        output.push(fill(
            "place-reference",
            &place_ref,
            &[
                ("thetext", reference.as_str()),
                ("pardir", options.direction.context_dir()),
            ],
        )?);
        output.push(page_close());
        output.push(format!("{INDENT}\\page[yes]"));
    }

    Ok(output.join("\n"))
}

/// Tighten the scripture reference and strip a redundant emphasis
/// wrapper. The reference template already emphasises its text, so a
/// source reference wrapped in `_..._` would have the emphasis turned
/// off again.
fn prepare_reference(reference: &str) -> String {
    let tightened = tighten_reference(reference);
    let stripped = if tightened.starts_with('_') && tightened.ends_with('_') && tightened.len() > 1
    {
        &tightened[1..tightened.len() - 1]
    } else {
        tightened.as_str()
    };
    markup::apply_inline(stripped)
}

fn title_block(title: &str, direction: Direction) -> String {
    format!(
        "{INDENT}\\startmakeup\\textdir {}\\section{{{title}}}\\stopmakeup",
        direction.context_dir()
    )
}

fn image_block(frame_id: &str, resolution: &str) -> String {
    // 950 = 95%
    format!(
        "{INDENT3}{{\\externalfigure[{LOCAL_IMAGE_DIR}/{resolution}/obs-{frame_id}.jpg][yscale=950]}}"
    )
}

fn frame_block(register: &str) -> String {
    format!("{INDENT2}\\placefigure[nonumber]\n{INDENT3}{{\\copy\\{register}}}")
}

fn page_open() -> String {
    format!("{INDENT}%%START-OF-PHYSICAL-PAGE\n{INDENT}\\vtop{{")
}

fn page_close() -> String {
    format!("{INDENT}}}\n{INDENT}%%END-OF-PHYSICAL-PAGE")
}
