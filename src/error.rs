//! Error types for xsd-grammar
//!
//! Every failure aborts the whole parse, so a single flat error enum is
//! enough: each variant names the failure kind and, where it applies, the
//! grammar context and the attribute or element involved.

use std::fmt;
use thiserror::Error;

use crate::grammar::Context;

/// Result type alias using the xsd-grammar Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema parsing
#[derive(Error, Debug)]
pub enum Error {
    /// The source is not well-formed XML
    #[error("source is not a well-formed XML document")]
    MalformedSource,

    /// An attribute that the context does not declare
    #[error("unexpected attribute '{attribute}' in {context}")]
    UnexpectedAttribute {
        /// Grammar context of the element carrying the attribute
        context: Context,
        /// Attribute name as written in the source
        attribute: String,
    },

    /// An attribute whose value is outside its lexical space
    #[error("invalid value '{value}' for attribute '{attribute}' in {context}: expected {reason}")]
    InvalidAttributeValue {
        /// Grammar context of the element carrying the attribute
        context: Context,
        /// Attribute name
        attribute: String,
        /// Raw attribute value
        value: String,
        /// Description of the expected lexical form
        reason: LexicalError,
    },

    /// A required attribute is absent
    #[error("missing required attribute '{attribute}' in {context}")]
    MissingAttribute {
        /// Grammar context of the element
        context: Context,
        /// Name of the absent attribute
        attribute: &'static str,
    },

    /// A child element or character data the content model forbids
    #[error("unexpected {found} in {context}")]
    UnexpectedContent {
        /// Grammar context of the parent element
        context: Context,
        /// Description of the offending node
        found: String,
    },

    /// A required child is absent
    #[error("missing {expected} in {context}")]
    MissingContent {
        /// Grammar context of the parent element
        context: Context,
        /// Description of the expected children
        expected: String,
    },

    /// A configured resource bound was exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Grammar context the error occurred in, if any
    pub fn context(&self) -> Option<Context> {
        match self {
            Self::UnexpectedAttribute { context, .. }
            | Self::InvalidAttributeValue { context, .. }
            | Self::MissingAttribute { context, .. }
            | Self::UnexpectedContent { context, .. }
            | Self::MissingContent { context, .. } => Some(*context),
            _ => None,
        }
    }
}

/// Failure of a lexical value validator
///
/// Validators do not know which attribute they are checking; the engine
/// wraps this into [`Error::InvalidAttributeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    /// Description of the expected lexical form
    pub expected: &'static str,
}

impl LexicalError {
    /// Create a new lexical error
    pub const fn new(expected: &'static str) -> Self {
        Self { expected }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expected)
    }
}

impl std::error::Error for LexicalError {}
