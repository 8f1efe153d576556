//! Derivation-set attributes (`final`, `block`, `finalDefault`, `blockDefault`)
//!
//! Each attribute accepts `#all` or a whitespace-separated list drawn from
//! its own keyword set. `#all` sets exactly the flags of that keyword set.

use serde::Serialize;

use crate::error::LexicalError;
use crate::names::{collapse_whitespace, tokens};

/// A single derivation keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// `extension`
    Extension,
    /// `restriction`
    Restriction,
    /// `list`
    List,
    /// `union`
    Union,
    /// `substitution`
    Substitution,
}

impl Derivation {
    /// Keyword as written in a schema
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Restriction => "restriction",
            Self::List => "list",
            Self::Union => "union",
            Self::Substitution => "substitution",
        }
    }
}

/// `finalDefault` on schema
pub const FULL_DERIVATION_SET: &[Derivation] = &[
    Derivation::Extension,
    Derivation::Restriction,
    Derivation::List,
    Derivation::Union,
];

/// `blockDefault` on schema, `block` on elements
pub const BLOCK_SET: &[Derivation] = &[
    Derivation::Extension,
    Derivation::Restriction,
    Derivation::Substitution,
];

/// `final`/`block` on complex types, `final` on elements
pub const DERIVATION_SET: &[Derivation] = &[Derivation::Extension, Derivation::Restriction];

/// `final` on simple types
pub const SIMPLE_DERIVATION_SET: &[Derivation] =
    &[Derivation::List, Derivation::Union, Derivation::Restriction];

/// Flags parsed from a derivation-set attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DerivationSet {
    /// Extension derivation
    pub extension: bool,
    /// Restriction derivation
    pub restriction: bool,
    /// List derivation (simple types)
    pub list: bool,
    /// Union derivation (simple types)
    pub union: bool,
    /// Substitution (block sets only)
    pub substitution: bool,
}

impl DerivationSet {
    /// Parse an attribute value against the keyword set `allowed`
    ///
    /// Repeating a keyword is accepted and changes nothing.
    pub fn parse(value: &str, allowed: &[Derivation]) -> std::result::Result<Self, LexicalError> {
        let mut result = Self::default();

        if collapse_whitespace(value) == "#all" {
            for derivation in allowed {
                result.set(*derivation);
            }
            return Ok(result);
        }

        for token in tokens(value) {
            let derivation = allowed
                .iter()
                .copied()
                .find(|d| d.keyword() == token)
                .ok_or(LexicalError::new("'#all' or a list of derivation keywords"))?;
            result.set(derivation);
        }
        Ok(result)
    }

    fn set(&mut self, derivation: Derivation) {
        match derivation {
            Derivation::Extension => self.extension = true,
            Derivation::Restriction => self.restriction = true,
            Derivation::List => self.list = true,
            Derivation::Union => self.union = true,
            Derivation::Substitution => self.substitution = true,
        }
    }

    /// Check whether a derivation is in the set
    pub fn contains(&self, derivation: Derivation) -> bool {
        match derivation {
            Derivation::Extension => self.extension,
            Derivation::Restriction => self.restriction,
            Derivation::List => self.list,
            Derivation::Union => self.union,
            Derivation::Substitution => self.substitution,
        }
    }

    /// Check if any flag is set
    pub fn is_empty(&self) -> bool {
        !self.extension && !self.restriction && !self.substitution && !self.list && !self.union
    }
}
