//! Path canonicalization shared by every evaluator.
//!
//! Both the maintenance rules and the menu index compare paths only after
//! running them through [`normalize`], so "the same path" means the same thing
//! on both sides of a guard decision.

/// Canonicalize a raw path.
///
/// - all trailing `/` are stripped
/// - an empty result becomes `/`
/// - a leading `/` is added when missing
///
/// Total and idempotent: any input (including `""`) produces a defined output
/// and `normalize(&normalize(s)) == normalize(s)`.
///
/// # Example
///
/// ```
/// use navgate::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("///"), "/");
/// assert_eq!(normalize("board/"), "/board");
/// assert_eq!(normalize("/board/list//"), "/board/list");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Segment-aware containment: `path` equals `base` or lives below it.
///
/// Both arguments must already be normalized. `/board` covers `/board` and
/// `/board/7` but not `/boarding`.
#[must_use]
pub fn is_under(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
