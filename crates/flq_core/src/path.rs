//! Flat-path codec: `a.b[2].c` to segments and back.

use smallvec::SmallVec;
use std::fmt;

/// A single step in a flat path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access: `.key`
    Key(String),
    /// Array element access: `[2]`
    Index(usize),
}

/// A parsed flat path. Paths are short, so segments live inline.
pub type Segments = SmallVec<[Segment; 8]>;

/// Split a flat-path string into segments.
///
/// A bracketed integer `[n]` is a synthetic separator equivalent to `.n`;
/// the string is then split on `.` and empty tokens are dropped. A token
/// made of digits becomes an `Index`, anything else a `Key`. Brackets that
/// do not wrap an integer are ordinary key characters. Parsing never fails:
/// every string denotes some (possibly empty) segment sequence.
pub fn parse(path: &str) -> Segments {
    normalize(path)
        .split('.')
        .filter(|token| !token.is_empty())
        .map(segment_of)
        .collect()
}

/// Render a segment sequence in canonical string form: keys dot-joined,
/// indices bracket-appended to the preceding rendering. Inverse of [`parse`]
/// for canonical strings.
pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Rewrite every `[n]` into `.n` so a single split on `.` tokenizes the path.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('[') {
        let (head, tail) = rest.split_at(open);
        if let Some(close) = tail.find(']') {
            let inner = &tail[1..close];
            if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
                out.push_str(head);
                out.push('.');
                out.push_str(inner);
                rest = &tail[close + 1..];
                continue;
            }
        }
        out.push_str(head);
        out.push('[');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

fn segment_of(token: &str) -> Segment {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        // Digit runs too long for usize stay keys rather than truncating.
        return token
            .parse()
            .map(Segment::Index)
            .unwrap_or_else(|_| Segment::Key(token.to_string()));
    }
    Segment::Key(token.to_string())
}

/// Compose the canonical key for an object member under `prefix`.
pub(crate) fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Compose the canonical key for an array element under `prefix`.
pub(crate) fn child_index(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    #[test]
    fn test_parse_dotted() {
        let segments = parse("address.coordinates.lat");
        assert_eq!(
            segments.as_slice(),
            &[key("address"), key("coordinates"), key("lat")]
        );
    }

    #[test]
    fn test_parse_bracketed_index() {
        let segments = parse("stuff[0].keyToo");
        assert_eq!(
            segments.as_slice(),
            &[key("stuff"), Segment::Index(0), key("keyToo")]
        );
    }

    #[test]
    fn test_parse_dotted_digits_are_indices() {
        // `a.0.b` and `a[0].b` tokenize identically.
        assert_eq!(parse("a.0.b"), parse("a[0].b"));
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let segments = parse(".a..b.");
        assert_eq!(segments.as_slice(), &[key("a"), key("b")]);
    }

    #[test]
    fn test_parse_lone_index() {
        let segments = parse("[3]");
        assert_eq!(segments.as_slice(), &[Segment::Index(3)]);
    }

    #[test]
    fn test_parse_non_numeric_brackets_stay_in_key() {
        let segments = parse("a[b].c");
        assert_eq!(segments.as_slice(), &[key("a[b]"), key("c")]);
    }

    #[test]
    fn test_parse_unclosed_bracket_stays_in_key() {
        let segments = parse("a[1.b");
        assert_eq!(segments.as_slice(), &[key("a[1"), key("b")]);
    }

    #[test]
    fn test_render_dotted_and_bracketed() {
        let segments = parse("a.b[2].c");
        assert_eq!(render(&segments), "a.b[2].c");
    }

    #[test]
    fn test_render_parse_inverse() {
        for canonical in ["a", "a.b", "a[0]", "a.b[2].c", "x[1][2].y", "[0].z"] {
            assert_eq!(render(&parse(canonical)), canonical);
        }
    }

    #[test]
    fn test_child_composition() {
        assert_eq!(child_key("", "name"), "name");
        assert_eq!(child_key("address", "city"), "address.city");
        assert_eq!(child_index("hobbies", 1), "hobbies[1]");
        assert_eq!(child_index("", 0), "[0]");
    }
}
