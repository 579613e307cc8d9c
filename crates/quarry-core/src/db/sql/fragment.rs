use std::fmt;

///
/// Fragment
///
/// A boolean SQL expression whose parameters are already bound in the
/// owning [`QueryContext`](super::QueryContext). Fragments are always
/// rendered parenthesized when combined, so callers never reason about
/// operator precedence.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragment(String);

const ALWAYS_TRUE: &str = "1 = 1";
const ALWAYS_FALSE: &str = "1 = 0";

impl Fragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    #[must_use]
    pub fn always_true() -> Self {
        Self::new(ALWAYS_TRUE)
    }

    #[must_use]
    pub fn always_false() -> Self {
        Self::new(ALWAYS_FALSE)
    }

    #[must_use]
    pub fn is_always_true(&self) -> bool {
        self.0 == ALWAYS_TRUE
    }

    /// Conjunction; an empty input is "always true".
    #[must_use]
    pub fn and(mut parts: Vec<Self>) -> Self {
        parts.retain(|part| !part.is_always_true());
        Self::join(parts, " AND ")
    }

    /// Disjunction; an empty input is "always true" (no constraint).
    #[must_use]
    pub fn or(parts: Vec<Self>) -> Self {
        Self::join(parts, " OR ")
    }

    #[must_use]
    pub fn not(inner: Self) -> Self {
        Self(format!("NOT ({})", inner.0))
    }

    fn join(mut parts: Vec<Self>, connective: &str) -> Self {
        match parts.len() {
            0 => Self::always_true(),
            1 => parts.remove(0),
            _ => Self(
                parts
                    .iter()
                    .map(|part| format!("({})", part.0))
                    .collect::<Vec<_>>()
                    .join(connective),
            ),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
