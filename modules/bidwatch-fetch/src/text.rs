use std::sync::LazyLock;

use regex::Regex;

static CJK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{4E00}-\u{9FFF}]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip CJK unified ideographs and collapse runs of whitespace.
///
/// Card Hobby titles mix Chinese and English; the dashboard keeps the Latin part.
pub fn clean_title(raw: &str) -> String {
    let stripped = CJK_RE.replace_all(raw, " ");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}
