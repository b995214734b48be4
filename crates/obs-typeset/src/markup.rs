//! Inline markup rewriting.
//!
//! Converts the wiki/markdown inline markup found in OBS content into
//! ConTeXt commands. The rules form an explicit ordered table applied
//! by one driver; the order is load-bearing and pinned by tests:
//!
//! - heading rules run before the generic `== section ==` rule, which
//!   would otherwise eat heading delimiters,
//! - deeper heading levels run before shallower ones,
//! - triple emphasis markers run before double, double before single,
//! - the long-URL link form runs before the generic `[text](url)`
//!   form, which would match the same input with the wrong wrapping.
//!
//! Every function is a pure transform of a single line.

use std::sync::LazyLock;

use regex::Regex;

/// One ordered rewrite rule: a pattern and its replacement template.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, line: &str) -> String {
        self.pattern.replace_all(line, self.replacement).into_owned()
    }
}

/// Main rule table: headings, emphasis, monospace, colors, scripts.
static START_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // The dummy anchor token must go before the heading rules see
        // its '=' runs as heading delimiters.
        Rule::new(r"===!!!===", ""),
        // Wiki headings, most '=' marks first.
        Rule::new(r"(^|[^=])====+\s*(.*?)\s*===+?([^=]|$)", r"$1{\bfd $2}$3"),
        Rule::new(r"(^|[^=])===+\s*(.*?)\s*==+?([^=]|$)", r"$1{\bfc $2}$3"),
        Rule::new(r"(^|[^=])==+\s*(.*?)\s*==+?([^=]|$)", r"$1{\bfb $2}$3"),
        Rule::new(r"(^|[^=])=+\s*(.*?)\s*=+?([^=]|$)", r"$1{\bfa $2}$3"),
        // Markdown headings, most '#' marks first.
        Rule::new(r"^(\s*)####\s*([^#]+?)\s*#*\s*$", r"$1{\bfd $2}"),
        Rule::new(r"^(\s*)###\s*([^#]+?)\s*#*\s*$", r"$1{\bfc $2}"),
        Rule::new(r"^(\s*)##\s*([^#]+?)\s*#*\s*$", r"$1{\bfb $2}"),
        Rule::new(r"^(\s*)#\s*([^#]+?)\s*#*\s*$", r"$1{\bfa $2}"),
        // Generic doubled-'=' section markers left over after headings.
        Rule::new(r"==+\s*(.*?)\s*==+", r"{\bf $1}"),
        // Character emphasis, most specific nesting first. Asterisk and
        // underscore families are resolved independently.
        Rule::new(r"\*\*\*\s*(.*?)\s*\*\*\*", r"{\bf {\em $1}}"),
        Rule::new(r"___\s*(.*?)\s*___", r"{\bf {\em $1}}"),
        Rule::new(r"\*\*\s*(.*?)\s*\*\*", r"{\bf $1}"),
        Rule::new(r"__\s*(.*?)\s*__", r"{\bf $1}"),
        Rule::new(r"\*\s*(.*?)\s*\*", r"{\em $1}"),
        Rule::new(r"_\s*(.*?)\s*_", r"{\em $1}"),
        // Fixed-width, colors, scripts, strike-out.
        Rule::new(r"''\s*(.*?)\s*''", r"{\tt $1}"),
        Rule::new(r"<red>\s*(.*?)\s*</red>", r"\color[middlered]{$1}"),
        Rule::new(
            r"<mag(?:enta)?>\s*(.*?)\s*</mag(?:enta)?>",
            r"\color[magenta]{$1}",
        ),
        Rule::new(r"<blue>\s*(.*?)\s*</blue>", r"\color[blue]{$1}"),
        Rule::new(r"<green>\s*(.*?)\s*</green>", r"\color[middlegreen]{$1}"),
        Rule::new(r"<sub>\s*(.*?)\s*</sub>", r"\low{$1}"),
        Rule::new(r"<sup>\s*(.*?)\s*</sup>", r"\high{$1}"),
        Rule::new(r"<del>\s*(.*?)\s*</del>", r"\overstrike{$1}"),
    ]
});

/// Hyperlink rules, applied only by [`apply_inline_with_links`].
static LINK_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Bare URL not already inside a link construct.
        Rule::new(
            r"(^|[^\[(])(https?://[^\s>]+)",
            r"$1{\underbar{{\goto{$2}[url($2)]}}}",
        ),
        // Long URLs (41+ chars) get the text-link wrapping first; the
        // generic rule below would also match and wrap them wrongly.
        Rule::new(
            r"\[(.+?)\]\((https?://[^\[\])]{41,})\)",
            r"{\underbar{{\goto{$1}[url($2)]}}}",
        ),
        Rule::new(
            r"\[(.+?)\]\((https?://[^\[\])]+)\)",
            r"{\underbar{{\goto{$1}[url($2)]}}}",
        ),
    ]
});

/// Finishing rules: escape literal pipes for safe table-like output.
static FINISH_RULES: LazyLock<Vec<Rule>> =
    LazyLock::new(|| vec![Rule::new(r"\|", r"\textbar{}")]);

fn run(line: &str, rules: &[Rule]) -> String {
    rules
        .iter()
        .fold(line.to_owned(), |text, rule| rule.apply(&text))
}

/// Apply the main rule table without the finishing pass.
#[must_use]
fn apply_start(line: &str) -> String {
    run(line, &START_RULES)
}

/// Rewrite one line of story text into ConTeXt inline markup.
#[must_use]
pub fn apply_inline(line: &str) -> String {
    run(&apply_start(line), &FINISH_RULES)
}

/// Like [`apply_inline`], but also rewrites URLs into `\goto`
/// hyperlinks. Used for front/back matter where links are expected.
#[must_use]
pub fn apply_inline_with_links(line: &str) -> String {
    let line = apply_start(line);
    let line = run(&line, &LINK_RULES);
    run(&line, &FINISH_RULES)
}
