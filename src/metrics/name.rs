//! Metric name derivation.
//!
//! Record fields are declared with mixed-case identifiers (`NrFreePages`,
//! `NumaHit`) and exposed under lowercase, underscore separated names
//! (`nr_free_pages`, `numa_hit`).

/// Converts a mixed-case identifier into a snake case metric name.
///
/// Two boundary passes are applied before lowercasing:
///
/// 1. an underscore is inserted between any character and a following
///    uppercase letter that starts a lowercase run (`FooBar` -> `Foo_Bar`)
/// 2. an underscore is inserted between a lowercase letter or digit and a
///    following uppercase letter (`fooBAR` -> `foo_BAR`)
///
/// Runs of uppercase letters are only split where one of the two rules
/// applies, so `NUMAHit` becomes `numa_hit`.
pub fn to_snake_case(identifier: &str) -> String {
    let split = split_before_words(identifier);
    let split = split_after_lower(&split);
    split.to_lowercase()
}

/// First pass: `(.)([A-Z][a-z]+)` -> `${1}_${2}`.
///
/// Matches are leftmost and non-overlapping. Each match consumes the
/// preceding character, the uppercase letter and the whole lowercase run.
fn split_before_words(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);

    let mut pos = 0;
    while pos < chars.len() {
        let starts_word = chars[pos] != '\n'
            && chars.get(pos + 1).is_some_and(char::is_ascii_uppercase)
            && chars.get(pos + 2).is_some_and(char::is_ascii_lowercase);

        if !starts_word {
            out.push(chars[pos]);
            pos += 1;
            continue;
        }

        let mut end = pos + 2;
        while chars.get(end).is_some_and(char::is_ascii_lowercase) {
            end += 1;
        }

        out.push(chars[pos]);
        out.push('_');
        out.extend(&chars[pos + 1..end]);
        pos = end;
    }

    out
}

/// Second pass: `([a-z0-9])([A-Z])` -> `${1}_${2}`.
fn split_after_lower(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);

    let mut pos = 0;
    while pos < chars.len() {
        let c = chars[pos];
        let boundary = (c.is_ascii_lowercase() || c.is_ascii_digit())
            && chars.get(pos + 1).is_some_and(char::is_ascii_uppercase);

        out.push(c);

        if boundary {
            out.push('_');
            out.push(chars[pos + 1]);
            pos += 2;
        } else {
            pos += 1;
        }
    }

    out
}

/// Joins the non-empty parts of a metric name with underscores.
pub fn fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Checks a metric name or name prefix against `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        Some(_) => false,
    }
}
