//! Ant-style path patterns.
//!
//! Paths are split on `/` with empty segments dropped. Within a pattern:
//!
//! - `**` matches zero or more whole segments,
//! - `*` matches zero or more characters inside one segment,
//! - `?` matches exactly one character,
//! - `{name}` matches one segment's worth of characters, like `*`.
//!
//! A pattern and a path must agree on the leading `/`. They must also agree on
//! a trailing `/`, unless the pattern ends in `**`.

const SEPARATOR: char = '/';

/// A compiled pattern, cheap to match repeatedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntPattern {
    source: String,
    absolute: bool,
    trailing_separator: bool,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    AnyDepth,
    Literal(String),
    Glob(Vec<Token>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    AnyChar,
    AnyChars,
}

impl AntPattern {
    pub fn new(pattern: &str) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        for raw in pattern.split(SEPARATOR).filter(|s| !s.is_empty()) {
            let segment = Segment::compile(raw);
            // Adjacent `**` are equivalent to one.
            if segment == Segment::AnyDepth && segments.last() == Some(&Segment::AnyDepth) {
                continue;
            }
            segments.push(segment);
        }

        Self {
            source: pattern.to_string(),
            absolute: pattern.starts_with(SEPARATOR),
            trailing_separator: pattern.len() > 1 && pattern.ends_with(SEPARATOR),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern contains no wildcard and only matches itself.
    pub fn is_literal(&self) -> bool {
        !is_pattern(&self.source)
    }

    pub fn matches(&self, path: &str) -> bool {
        if path.starts_with(SEPARATOR) != self.absolute {
            return false;
        }
        let ends_any_depth = self.segments.last() == Some(&Segment::AnyDepth);
        let path_trailing = path.len() > 1 && path.ends_with(SEPARATOR);
        if !ends_any_depth && path_trailing != self.trailing_separator {
            return false;
        }

        let parts: Vec<&str> = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

impl Segment {
    fn compile(raw: &str) -> Self {
        if raw == "**" {
            return Segment::AnyDepth;
        }
        if !is_pattern(raw) {
            return Segment::Literal(raw.to_string());
        }

        let mut tokens = Vec::new();
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => {
                    while chars.peek() == Some(&'*') {
                        chars.next();
                    }
                    tokens.push(Token::AnyChars);
                }
                '?' => tokens.push(Token::AnyChar),
                '{' => {
                    // Variable constraints such as `{id:\d+}` are not enforced.
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            break;
                        }
                    }
                    tokens.push(Token::AnyChars);
                }
                other => tokens.push(Token::Char(other)),
            }
        }
        Segment::Glob(tokens)
    }

    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Literal(literal) => literal == part,
            Segment::Glob(tokens) => {
                let chars: Vec<char> = part.chars().collect();
                match_glob(tokens, &chars)
            }
        }
    }
}

/// Bottom-up over pattern segments: `below[j]` holds whether the segments
/// after the current one match `path[j..]`. Each (segment, part) pair is
/// tested at most once.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let n = path.len();
    let mut below: Vec<bool> = (0..=n).map(|j| j == n).collect();

    for segment in pattern.iter().rev() {
        let mut row = vec![false; n + 1];
        for j in (0..=n).rev() {
            let matched = match segment {
                Segment::AnyDepth => below[j] || (j < n && row[j + 1]),
                _ => j < n && below[j + 1] && segment.matches(path[j]),
            };
            row[j] = matched;
        }
        below = row;
    }

    below[0]
}

fn match_glob(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    // Position of the last `*` and the text offset it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnyChars) => {
                backtrack = Some((t, s));
                t += 1;
            }
            Some(Token::AnyChar) => {
                t += 1;
                s += 1;
            }
            Some(Token::Char(c)) if *c == text[s] => {
                t += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    t = star + 1;
                    s = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyChars)
}

/// The form a path takes for literal comparison: empty segments dropped,
/// leading and trailing separators kept. Two paths normalize equally exactly
/// when a literal pattern of one matches the other.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    if path.starts_with(SEPARATOR) {
        normalized.push(SEPARATOR);
    }
    for (i, part) in path.split(SEPARATOR).filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            normalized.push(SEPARATOR);
        }
        normalized.push_str(part);
    }
    if path.len() > 1 && path.ends_with(SEPARATOR) {
        normalized.push(SEPARATOR);
    }
    normalized
}

/// Whether `path` contains any wildcard syntax.
pub fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '{'])
}

/// One-shot match without keeping the compiled pattern.
pub fn ant_match(pattern: &str, path: &str) -> bool {
    AntPattern::new(pattern).matches(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_single_star_matches_one_segment() {
        assert!(ant_match("/a/*", "/a/b"));
        assert!(!ant_match("/a/*", "/a/b/c"));
        assert!(!ant_match("/a/*", "/b/c"));
    }

    #[test]
    fn test_double_star_matches_any_depth() {
        assert!(ant_match("/a/**", "/a"));
        assert!(ant_match("/a/**", "/a/b"));
        assert!(ant_match("/a/**", "/a/b/c/d"));
        assert!(ant_match("/a/**/z", "/a/z"));
        assert!(ant_match("/a/**/z", "/a/b/c/z"));
        assert!(!ant_match("/a/**/z", "/a/b/c"));
        assert!(ant_match("/**", "/"));
        assert!(ant_match("/**/*.html", "/docs/index.html"));
    }

    #[test]
    fn test_character_wildcards() {
        assert!(ant_match("/user/?", "/user/1"));
        assert!(!ant_match("/user/?", "/user/12"));
        assert!(ant_match("/files/*.png", "/files/logo.png"));
        assert!(!ant_match("/files/*.png", "/files/logo.jpg"));
        assert!(ant_match("/files/a*b*c", "/files/aXXbYYc"));
        assert!(!ant_match("/files/a*b*c", "/files/aXXbYY"));
    }

    #[test]
    fn test_variables_match_a_segment() {
        assert!(ant_match("/user/{id}/edit", "/user/42/edit"));
        assert!(ant_match("/user/{id:\\d+}", "/user/42"));
        assert!(!ant_match("/user/{id}/edit", "/user/42/view"));
    }

    #[test]
    fn test_separators_must_agree() {
        assert!(!ant_match("/a/b", "a/b"));
        assert!(!ant_match("a/b", "/a/b"));
        assert!(!ant_match("/a/b", "/a/b/"));
        assert!(ant_match("/a/b/", "/a/b/"));
        assert!(ant_match("/a/**", "/a/b/"));
    }

    #[test]
    fn test_literal_detection() {
        assert!(AntPattern::new("/login").is_literal());
        assert!(!AntPattern::new("/login/*").is_literal());
        assert!(!AntPattern::new("/user/{id}").is_literal());
    }

    #[test]
    fn test_many_double_stars_fail_fast_on_deep_paths() {
        let pattern = AntPattern::new("/**/a/**/b/**/c/**/d");
        let path = "/a/b/c".repeat(400);

        assert!(!pattern.matches(&path));
        assert!(pattern.matches(&format!("{path}/d")));
    }

    #[test]
    fn test_double_star_between_literals_backtracks() {
        assert!(ant_match("/**/a/**/b", "/a/x/a/y/b"));
        assert!(ant_match("/x/**/y/**", "/x/y"));
        assert!(!ant_match("/x/**/y/*", "/x/y"));
        assert!(ant_match("/**/*.html/**", "/a/b.html/c"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("//login"), "/login");
        assert_eq!(normalize_path("/a//b/"), "/a/b/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "//");
        assert_eq!(normalize_path("a/b"), "a/b");
    }

    fn path_of(parts: Vec<String>) -> String {
        let segments: Vec<String> = parts
            .into_iter()
            .map(|p| p.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
            .filter(|p| !p.is_empty())
            .collect();
        format!("/{}", segments.join("/"))
    }

    #[quickcheck]
    fn prop_literal_path_matches_itself(parts: Vec<String>) -> bool {
        let path = path_of(parts);
        ant_match(&path, &path)
    }

    #[quickcheck]
    fn prop_literal_match_agrees_with_normalized_equality(a: Vec<bool>, b: Vec<bool>) -> bool {
        // Paths over a tiny alphabet with doubled and trailing separators.
        let render = |bits: &[bool]| -> String {
            bits.iter().map(|bit| if *bit { "/x" } else { "/" }).collect()
        };
        let (pattern, path) = (render(&a[..]), render(&b[..]));
        if pattern.is_empty() || path.is_empty() {
            return true;
        }
        ant_match(&pattern, &path) == (normalize_path(&pattern) == normalize_path(&path))
    }

    #[quickcheck]
    fn prop_root_double_star_matches_everything(parts: Vec<String>) -> bool {
        ant_match("/**", &path_of(parts))
    }

    #[quickcheck]
    fn prop_prefix_double_star_matches_descendants(prefix: Vec<String>, rest: Vec<String>) -> bool {
        let prefix = path_of(prefix);
        let rest = path_of(rest);
        let pattern = format!("{}/**", prefix.trim_end_matches('/'));
        let path = format!("{}{}", prefix.trim_end_matches('/'), rest);
        ant_match(&pattern, &path)
    }

    #[quickcheck]
    fn prop_single_star_matches_exactly_one_segment(parts: Vec<String>) -> bool {
        let path = path_of(parts);
        let depth = path.split('/').filter(|s| !s.is_empty()).count();
        ant_match("/*", &path) == (depth == 1)
    }
}
