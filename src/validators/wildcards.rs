//! Wildcard attribute values
//!
//! This module implements the two attributes shared by `xs:any` and
//! `xs:anyAttribute`:
//! - `processContents` - one of `strict`, `lax`, `skip`
//! - `namespace` - the namespace-list mini-grammar
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Wildcards

use std::str::FromStr;

use serde::Serialize;

use crate::error::LexicalError;
use crate::names::tokens;
use crate::validators::builtins::any_uri;

/// Process contents mode for wildcards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessContents {
    /// Validate strictly - element/attribute must be declared
    #[default]
    Strict,
    /// Validate if declaration found, otherwise accept
    Lax,
    /// Skip validation entirely
    Skip,
}

impl ProcessContents {
    /// `processContents="lax"`
    pub fn is_lax(self) -> bool {
        self == Self::Lax
    }

    /// `processContents="skip"`
    pub fn is_skip(self) -> bool {
        self == Self::Skip
    }

    /// `processContents="strict"`
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

impl FromStr for ProcessContents {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "skip" => Ok(Self::Skip),
            _ => Err(LexicalError::new("one of 'lax', 'skip' or 'strict'")),
        }
    }
}

impl std::fmt::Display for ProcessContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lax => write!(f, "lax"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Parsed `namespace` attribute of a wildcard
///
/// Acceptance is purely syntactic: keyword flags and explicit URIs may be
/// combined freely here, and any exclusivity between them is left to
/// semantic checking of the finished model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceList {
    /// `##any` was present
    pub any: bool,
    /// `##other` was present
    pub other: bool,
    /// `##targetNamespace` was present
    pub target_namespace: bool,
    /// `##local` was present
    pub local: bool,
    /// Explicit namespace URIs in source order
    pub uris: Vec<String>,
}

impl NamespaceList {
    /// Whether nothing at all was listed
    pub fn is_empty(&self) -> bool {
        !self.any && !self.other && !self.target_namespace && !self.local && self.uris.is_empty()
    }
}

impl FromStr for NamespaceList {
    type Err = LexicalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut list = Self::default();
        for token in tokens(value) {
            match token {
                "##any" => list.any = true,
                "##other" => list.other = true,
                "##targetNamespace" => list.target_namespace = true,
                "##local" => list.local = true,
                uri => {
                    let uri = any_uri(uri)
                        .map_err(|_| LexicalError::new("a list of namespace keywords and URIs"))?;
                    list.uris.push(uri);
                }
            }
        }
        Ok(list)
    }
}
