//! Splitting and joining of delimited composites.
//!
//! The delimiter is always a single literal `char`. Nothing here treats it
//! as a pattern, so `|`, `.`, `$` and friends behave like any other
//! character.

use tracing::debug;

/// Default delimiter between the components of a field.
pub const COMPONENT_DELIMITER: char = '^';

/// Splits `raw` into exactly `arity` tokens.
///
/// Missing trailing tokens are returned as `""`; segments beyond `arity`
/// are dropped. Never fails.
///
/// # Examples
///
/// ```
/// use hl7_codec::tokenizer::split;
///
/// assert_eq!(split("A^B", '^', 4), vec!["A", "B", "", ""]);
/// assert_eq!(split("A^^C^D", '^', 3), vec!["A", "", "C"]);
/// ```
pub fn split(raw: &str, delimiter: char, arity: usize) -> Vec<&str> {
    split_counted(raw, delimiter, arity).0
}

/// Like [`split`], also returning how many excess segments were dropped.
pub fn split_counted(raw: &str, delimiter: char, arity: usize) -> (Vec<&str>, usize) {
    let mut segments = raw.split(delimiter);
    let mut tokens: Vec<&str> = segments.by_ref().take(arity).collect();
    let clipped = segments.count();
    tokens.resize(arity, "");

    if clipped > 0 {
        debug!(arity, clipped, "dropping excess segments");
    }

    (tokens, clipped)
}

/// Joins tokens with `delimiter`, omitting trailing empty tokens.
///
/// # Examples
///
/// ```
/// use hl7_codec::tokenizer::join;
///
/// assert_eq!(join(["A", "B", "", ""], '^'), "A^B");
/// assert_eq!(join(["", "", ""], '^'), "");
/// assert_eq!(join(["A", "", "C"], '^'), "A^^C");
/// ```
pub fn join<I, S>(tokens: I, delimiter: char) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, token) in tokens.into_iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(token.as_ref());
    }

    let len = trim_trailing(&out, delimiter).len();
    out.truncate(len);
    out
}

/// Strips every trailing occurrence of `delimiter` from `s`.
pub fn trim_trailing(s: &str, delimiter: char) -> &str {
    s.trim_end_matches(delimiter)
}
