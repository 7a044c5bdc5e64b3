//! Whitespace and comment stripping for production CSS.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_COMMENTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\s+").unwrap());

/// Applied in order after comment stripping and whitespace collapsing.
/// Tightens punctuation spacing, drops optional semicolons before a closing
/// brace, and puts each rule on its own line.
const REPLACEMENTS: &[(&str, &str)] = &[
    (": ", ":"),
    ("; ", ";"),
    (" {", "{"),
    (" }", "}"),
    (", ", ","),
    ("{ ", "{"),
    (",\n", ","),
    ("\n}", "}"),
    (";}", "}"),
    ("} ", "}\n"),
];

/// Strip block comments, collapse whitespace runs and tighten punctuation.
/// Dev mode skips this entirely; the verbose output is easier to debug.
pub fn strip_whitespace(content: &str) -> String {
    let content = BLOCK_COMMENTS.replace_all(content, "");
    let content = WHITESPACE_RUNS.replace_all(&content, " ");

    let mut out = content.into_owned();
    for (from, to) in REPLACEMENTS {
        out = out.replace(from, to);
    }
    out.trim().to_string()
}
