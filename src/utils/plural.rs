//! Counted nouns for log lines.

/// `count` followed by `noun`, pluralized on the last word.
///
/// ```ignore
/// plural_count(1, "redirect page")  -> "1 redirect page"
/// plural_count(0, "redirect")       -> "0 redirects"
/// plural_count(2, "redirect map")   -> "2 redirect maps"
/// ```
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}{}", plural_suffix(noun))
    }
}

/// Suffix for the plural of `noun`: `es` after a sibilant, `s` otherwise.
fn plural_suffix(noun: &str) -> &'static str {
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| noun.ends_with(end)) {
        "es"
    } else {
        "s"
    }
}
