//! Lexical value validators
//!
//! Every attribute in the grammar table is declared with an
//! [`AttributeKind`]. Validating a raw value against its kind yields a typed
//! [`AttributeValue`] or a [`LexicalError`].

pub mod builtins;
pub mod derivations;
pub mod keywords;
pub mod particles;
pub mod wildcards;

use num_bigint::BigUint;
use serde::Serializer;

use crate::error::LexicalError;
use crate::names::{collapse_whitespace, tokens};
use crate::namespaces::{NamespaceScope, QName};

pub use derivations::{Derivation, DerivationSet};
pub use keywords::{Form, Use, WhiteSpace};
pub use particles::MaxOccurs;
pub use wildcards::{NamespaceList, ProcessContents};

/// Lexical space an attribute is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// xs:boolean
    Boolean,
    /// xs:ID
    Id,
    /// xs:NCName
    NcName,
    /// xs:anyURI
    AnyUri,
    /// xs:language
    Language,
    /// xs:string, not whitespace-processed
    String,
    /// xs:token
    Token,
    /// xs:nonNegativeInteger
    NonNegativeInteger,
    /// xs:positiveInteger
    PositiveInteger,
    /// `minOccurs` inside `all`: 0 or 1
    ZeroOrOne,
    /// `maxOccurs`: non-negative integer or `unbounded`
    MaxOccurs,
    /// `maxOccurs` of an element inside `all`: 0 or 1
    MaxOccursZeroOrOne,
    /// `maxOccurs` of `all` itself: 1
    MaxOccursOne,
    /// xs:QName, resolved against the in-scope namespaces
    QName,
    /// Whitespace-separated list of xs:QName
    QNameList,
    /// `qualified` | `unqualified`
    Form,
    /// `optional` | `prohibited` | `required`
    Use,
    /// `lax` | `skip` | `strict`
    ProcessContents,
    /// `#all` or a list drawn from the given keyword set
    Derivations(&'static [Derivation]),
    /// Wildcard namespace list
    NamespaceList,
    /// `preserve` | `replace` | `collapse`
    WhiteSpace,
}

/// Typed value of a validated attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Boolean value
    Boolean(bool),
    /// Name, URI, token or string value
    String(String),
    /// Integer value
    Integer(BigUint),
    /// `maxOccurs` value
    MaxOccurs(MaxOccurs),
    /// Resolved QName
    QName(QName),
    /// Resolved QNames
    QNameList(Vec<QName>),
    /// Form value
    Form(Form),
    /// Use value
    Use(Use),
    /// Process contents value
    ProcessContents(ProcessContents),
    /// Derivation flags
    Derivations(DerivationSet),
    /// Wildcard namespaces
    NamespaceList(NamespaceList),
    /// whiteSpace facet value
    WhiteSpace(WhiteSpace),
}

type LexicalResult<T> = std::result::Result<T, LexicalError>;

impl AttributeKind {
    /// Validate a raw attribute value
    ///
    /// `scope` is the namespace scope at the element carrying the attribute
    /// and is only consulted by the QName kinds.
    pub fn validate(self, raw: &str, scope: &NamespaceScope<'_>) -> LexicalResult<AttributeValue> {
        use AttributeValue as V;

        Ok(match self {
            Self::Boolean => V::Boolean(builtins::boolean(raw)?),
            Self::Id => V::String(builtins::id(raw)?),
            Self::NcName => V::String(builtins::ncname(raw)?),
            Self::AnyUri => V::String(builtins::any_uri(raw)?),
            Self::Language => V::String(builtins::language(raw)?),
            Self::String => V::String(builtins::string(raw)?),
            Self::Token => V::String(builtins::token(raw)?),
            Self::NonNegativeInteger => V::Integer(builtins::non_negative_integer(raw)?),
            Self::PositiveInteger => V::Integer(builtins::positive_integer(raw)?),
            Self::ZeroOrOne => V::Integer(particles::zero_or_one(raw)?),
            Self::MaxOccurs => V::MaxOccurs(MaxOccurs::parse(raw)?),
            Self::MaxOccursZeroOrOne => {
                V::MaxOccurs(MaxOccurs::Bounded(particles::zero_or_one(raw)?))
            }
            Self::MaxOccursOne => V::MaxOccurs(MaxOccurs::Bounded(particles::exactly_one(raw)?)),
            Self::QName => V::QName(scope.resolve(raw)?),
            Self::QNameList => V::QNameList(
                tokens(raw)
                    .map(|token| scope.resolve(token))
                    .collect::<LexicalResult<Vec<_>>>()?,
            ),
            Self::Form => V::Form(collapse_whitespace(raw).parse()?),
            Self::Use => V::Use(collapse_whitespace(raw).parse()?),
            Self::ProcessContents => V::ProcessContents(collapse_whitespace(raw).parse()?),
            Self::Derivations(allowed) => V::Derivations(DerivationSet::parse(raw, allowed)?),
            Self::NamespaceList => V::NamespaceList(raw.parse()?),
            Self::WhiteSpace => V::WhiteSpace(collapse_whitespace(raw).parse()?),
        })
    }
}

/// Serialize an optional big integer as a decimal string
pub(crate) fn serialize_integer<S: Serializer>(
    value: &Option<BigUint>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) => serializer.collect_str(n),
        None => serializer.serialize_none(),
    }
}
