//! Front and back matter rendering.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup;

static BLANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*\s+(.*)$").unwrap());
static CHAPTER_VERSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+(\d+:\d+)").unwrap());

/// The front matter arrives as one blob but has two parts, an "about"
/// section and a "license" section, and the checking level indicator
/// goes between them. The license part starts at the first bolded
/// `{\bf Key:}` line.
static MATTER_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\{\\bf.+:\s*\}").unwrap());

/// Render a matter blob to typesetting markup.
///
/// Blank lines become `\blank`, bullet runs become itemize blocks and
/// everything else is set without paragraph indentation. Chapter:verse
/// citations get a non-breaking space tied in front of them.
pub fn render_matter(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut item_count = 0usize;

    for raw in text.split('\n') {
        let bullet = BULLET_RE.captures(raw);
        let stop_itemize = item_count > 0 && bullet.is_none();
        if stop_itemize {
            item_count = 0;
        }

        let (line, rewritten) = if BLANK_RE.is_match(raw) {
            ("    \\blank".to_owned(), true)
        } else if let Some(caps) = bullet {
            item_count += 1;
            let item = format!("    \\item{{{}}}", &caps[1]);
            let line = if item_count == 1 {
                format!("    \\startitemize[intro,joinedup,nowhite]\n{item}")
            } else {
                item
            };
            (line, true)
        } else {
            (raw.to_owned(), false)
        };

        let mut line = markup::apply_inline_with_links(&line);
        line = CHAPTER_VERSE_RE.replace_all(&line, "~$1").into_owned();

        if stop_itemize {
            line = format!("    \\stopitemize\n{line}");
        }
        if !rewritten {
            line = format!("    \\noindentation {line}");
        }
        out.push(line);
    }

    // A blob ending mid-list would otherwise leave the itemize open.
    if item_count > 0 {
        out.push("    \\stopitemize".to_owned());
    }

    out.join("\n")
}

/// Split rendered front matter into its about and license parts.
///
/// The split points are the single whitespace characters preceding each
/// `{\bf Key:}` run; the license is the tail with those separators
/// dropped. Without any match the whole blob is the about part.
pub fn split_front_matter(rendered: &str) -> (String, String) {
    let starts: Vec<usize> = MATTER_SPLIT_RE
        .find_iter(rendered)
        .map(|m| m.start())
        .collect();
    let Some(&first) = starts.first() else {
        return (rendered.to_owned(), String::new());
    };

    let about = rendered[..first].to_owned();
    let mut license = String::new();
    let mut bounds = starts;
    bounds.push(rendered.len());
    for pair in bounds.windows(2) {
        let ws = rendered[pair[0]..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        license.push_str(&rendered[pair[0] + ws..pair[1]]);
    }
    (about, license)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_lines_are_set_without_indentation() {
        assert_eq!(
            render_matter("An **open** license"),
            "    \\noindentation An {\\bf open} license"
        );
    }

    #[test]
    fn blank_lines_become_blank() {
        assert_eq!(render_matter("a\n\nb").lines().nth(1), Some("    \\blank"));
    }

    #[test]
    fn bullet_run_is_wrapped_in_an_itemize_block() {
        let out = render_matter("intro\n* first\n* second\noutro");
        assert_eq!(
            out,
            "    \\noindentation intro\n\
             \x20   \\startitemize[intro,joinedup,nowhite]\n\
             \x20   \\item{first}\n\
             \x20   \\item{second}\n\
             \x20   \\stopitemize\n\
             \x20   \\noindentation outro"
        );
    }

    #[test]
    fn trailing_bullet_run_is_still_closed() {
        let out = render_matter("* only");
        assert!(out.ends_with("    \\stopitemize"));
    }

    #[test]
    fn chapter_verse_citations_do_not_break() {
        let out = render_matter("see John 3:16 for details");
        assert!(out.contains("John~3:16"));
    }

    #[test]
    fn links_are_rewritten_in_matter() {
        let out = render_matter("visit https://door43.org today");
        assert!(out.contains("\\goto{https://door43.org}[url(https://door43.org)]"));
    }

    #[test]
    fn front_matter_splits_at_first_bold_key() {
        let rendered = "    \\noindentation About the stories.\n\
                        \x20   \\blank\n\
                        \x20   \\noindentation {\\bf Version:} 4\n\
                        \x20   \\noindentation {\\bf Publisher:} unfoldingWord";
        let (about, license) = split_front_matter(rendered);
        assert!(about.ends_with("\\noindentation"));
        assert!(about.contains("About the stories."));
        assert!(license.starts_with("{\\bf Version:} 4"));
        assert!(license.contains("{\\bf Publisher:} unfoldingWord"));
        assert!(!license.contains("Version:} 4\n    \\noindentation {\\bf"));
    }

    #[test]
    fn front_matter_without_keys_is_all_about() {
        let (about, license) = split_front_matter("    \\noindentation plain text");
        assert_eq!(about, "    \\noindentation plain text");
        assert_eq!(license, "");
    }
}
