//! Case folding used identically by comparisons, LIKE/CONTAINS, and sorting.

use std::collections::BTreeMap;

///
/// StringTransformer
///
/// Locale-aware folding strategy injected into field-value handlers and
/// word-index lookups. The stored sort keys must have been produced by the
/// same transformer for comparisons to agree.
///

pub trait StringTransformer: Send + Sync {
    fn fold(&self, value: &str) -> String;
}

///
/// Lowercase
/// Unicode lowercasing, no further rules.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Lowercase;

impl StringTransformer for Lowercase {
    fn fold(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

///
/// RuleTable
///
/// Lowercasing followed by per-character replacement rules, e.g. `ß → ss`.
/// Rules are applied to the lowercased text; a rule key must therefore be
/// given in lowercase.
///

#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    replacements: BTreeMap<char, String>,
}

impl RuleTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            replacements: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, from: char, to: impl Into<String>) -> Self {
        self.replacements.insert(from, to.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

impl StringTransformer for RuleTable {
    fn fold(&self, value: &str) -> String {
        let lowered = value.to_lowercase();
        if self.replacements.is_empty() {
            return lowered;
        }

        let mut out = String::with_capacity(lowered.len());
        for ch in lowered.chars() {
            match self.replacements.get(&ch) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(ch),
            }
        }
        out
    }
}
