use std::collections::{HashMap, HashSet};

use bastion_core::{AntPattern, CodeType, normalize_path};

/// A URI pattern guarded by a code type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    pub pattern: String,
    pub code_type: CodeType,
}

impl ClassificationRule {
    pub fn new(pattern: impl Into<String>, code_type: CodeType) -> Self {
        Self {
            pattern: pattern.into(),
            code_type,
        }
    }
}

/// Literal URIs are stored normalized so the set lookup agrees with
/// [`AntPattern::matches`].
#[derive(Debug, Default)]
struct TypeRules {
    exact: HashSet<String>,
    patterns: Vec<AntPattern>,
}

impl TypeRules {
    fn matches(&self, uri: &str, normalized: &str) -> bool {
        self.exact.contains(normalized) || self.patterns.iter().any(|p| p.matches(uri))
    }
}

/// Decides which code type, if any, guards a request.
///
/// Types are tried in [`CodeType::PRIORITY`] order; within a type literal
/// URIs are looked up before wildcard patterns, which are tried in
/// registration order.
#[derive(Debug, Default)]
pub struct RequestClassifier {
    rules: HashMap<CodeType, TypeRules>,
}

impl RequestClassifier {
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = ClassificationRule>,
    {
        let mut by_type: HashMap<CodeType, TypeRules> = HashMap::new();
        for rule in rules {
            let entry = by_type.entry(rule.code_type).or_default();
            let pattern = AntPattern::new(&rule.pattern);
            if pattern.is_literal() {
                entry.exact.insert(normalize_path(&rule.pattern));
            } else {
                entry.patterns.push(pattern);
            }
        }
        Self { rules: by_type }
    }

    /// `None` for GET requests and for URIs no rule covers.
    pub fn classify(&self, method: &str, uri: &str) -> Option<CodeType> {
        if method.eq_ignore_ascii_case("GET") {
            return None;
        }
        let normalized = normalize_path(uri);
        CodeType::PRIORITY.into_iter().find(|code_type| {
            self.rules
                .get(code_type)
                .is_some_and(|r| r.matches(uri, &normalized))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
