//! LIKE pattern helpers.
//!
//! `*` is the only wildcard accepted from callers. Backend metacharacters in
//! the literal portion of a value are escaped with [`ESCAPE_CHAR`], which every
//! emitted `LIKE` declares through an `ESCAPE` clause.

pub(crate) const ESCAPE_CHAR: char = '\\';
pub(crate) const CALLER_WILDCARD: char = '*';

/// Escape `%`, `_` and the escape character so they match literally.
pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' | '_' | ESCAPE_CHAR => {
                out.push(ESCAPE_CHAR);
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape the literal portions and turn caller wildcards into `%`.
pub(crate) fn translate_wildcards(value: &str) -> String {
    value
        .split(CALLER_WILDCARD)
        .map(escape)
        .collect::<Vec<_>>()
        .join("%")
}

/// Substring pattern: literal portions escaped, caller wildcards kept.
pub(crate) fn contains(value: &str) -> String {
    format!("%{}%", translate_wildcards(value))
}

/// Escape the whole value and append a trailing wildcard.
pub(crate) fn prefix(value: &str) -> String {
    format!("{}%", escape(value))
}

/// Render `<column> LIKE <placeholder> ESCAPE '\'`.
pub(crate) fn predicate(column: &str, placeholder: &str) -> String {
    format!("{column} LIKE {placeholder} ESCAPE '{ESCAPE_CHAR}'")
}
