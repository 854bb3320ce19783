//! Hierarchical pattern matching for emitted event names.
//!
//! A pattern is an event name whose terminal segment may be the wildcard
//! token: `foo_bar_%` matches any name whose segmented path starts with
//! `[foo, bar]` and has at least one further segment. The bare wildcard
//! matches any non-empty name. Wildcard tokens in non-terminal segments
//! are literal.

/// How a pattern matched an emitted name. Wildcard matches receive the
/// `{event}` object prepended to their arguments; exact matches do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchKind {
    Exact,
    Wildcard,
}

pub(crate) fn match_pattern(
    pattern: &str,
    name: &str,
    delimiter: &str,
    wildcard: &str,
) -> Option<MatchKind> {
    if pattern == wildcard {
        if name.is_empty() {
            return None;
        }
        return Some(MatchKind::Wildcard);
    }
    let segments: Vec<&str> = pattern.split(delimiter).collect();
    if segments.len() > 1 && segments[segments.len() - 1] == wildcard {
        let prefix = &segments[..segments.len() - 1];
        let name_segments: Vec<&str> = name.split(delimiter).collect();
        if name_segments.len() > prefix.len() && &name_segments[..prefix.len()] == prefix {
            return Some(MatchKind::Wildcard);
        }
        return None;
    }
    (pattern == name).then_some(MatchKind::Exact)
}
