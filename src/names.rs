//! XML name validation and whitespace utilities
//!
//! This module provides validation for NCNames and lexical QNames, and the
//! `collapse` whitespace facet that most schema attribute types apply
//! before their lexical check.

/// XML whitespace characters (space, tab, carriage return, line feed)
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Apply the `collapse` whitespace facet
///
/// Leading and trailing whitespace is removed and every internal run of
/// whitespace becomes a single space.
pub fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for token in value.split(is_xml_whitespace).filter(|t| !t.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// Split a value into whitespace-separated tokens
pub fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(is_xml_whitespace).filter(|t| !t.is_empty())
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Check if a string is a valid lexical QName (`prefix:local` or `local`)
pub fn is_valid_qname(name: &str) -> bool {
    match split_qname(name) {
        (Some(prefix), local) => is_valid_ncname(prefix) && is_valid_ncname(local),
        (None, local) => is_valid_ncname(local),
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}
