//! Quoting for the nginx `map` block format.
//!
//! See <https://nginx.org/en/docs/http/ngx_http_map_module.html#map>.

use std::borrow::Cow;

/// Characters that force the value to be quoted.
const NEEDS_QUOTES: [char; 6] = [' ', '"', '\'', '{', '}', ';'];

/// Map "special parameters". An unquoted value starting with one of these
/// words would be taken as a directive, so it gets a leading backslash.
const RESERVED_WORDS: [&str; 4] = ["default", "hostnames", "include", "volatile"];

/// Quote `s`, if necessary, for use as a key or value in an nginx map file.
///
/// ```ignore
/// assert_eq!(quote_for_map("/foo/"), "/foo/");
/// assert_eq!(quote_for_map("/test run/"), "\"/test run/\"");
/// assert_eq!(quote_for_map("include"), "\\include");
/// ```
pub fn quote_for_map(s: &str) -> Cow<'_, str> {
    let quote = choose_quote(s);

    let needs_escape = s.chars().any(|c| is_escaped(c, quote));
    let reserved = quote.is_none() && starts_with_reserved_word(s);

    if quote.is_none() && !needs_escape && !reserved {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 4);
    if let Some(q) = quote {
        out.push(q);
    }
    if reserved {
        out.push('\\');
    }
    for c in s.chars() {
        if is_escaped(c, quote) {
            out.push('\\');
        }
        out.push(c);
    }
    if let Some(q) = quote {
        out.push(q);
    }
    Cow::Owned(out)
}

/// Pick the quote character: `"` by default, `'` when that avoids escaping.
fn choose_quote(s: &str) -> Option<char> {
    if !s.contains(NEEDS_QUOTES) {
        return None;
    }
    if s.contains('"') && !s.contains('\'') {
        Some('\'')
    } else {
        Some('"')
    }
}

#[inline]
fn is_escaped(c: char, quote: Option<char>) -> bool {
    c == '$' || c == '\\' || Some(c) == quote
}

/// Whether `s` starts with a reserved word followed by a word boundary.
fn starts_with_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.iter().any(|word| {
        s.strip_prefix(word).is_some_and(|rest| {
            rest.chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
        })
    })
}
