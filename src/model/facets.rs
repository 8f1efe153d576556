//! Constraining facets
//!
//! All twelve facets share one record shape; [`FacetKind`] says which one it
//! is and the grammar decides how its `value` is validated.

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

use super::{Annotation, Parsed};
use crate::error::Result;
use crate::grammar::Context;
use crate::namespaces::NamespaceDeclarations;
use crate::validators::WhiteSpace;

/// Which facet a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKind {
    /// `minExclusive`
    MinExclusive,
    /// `minInclusive`
    MinInclusive,
    /// `maxExclusive`
    MaxExclusive,
    /// `maxInclusive`
    MaxInclusive,
    /// `totalDigits`
    TotalDigits,
    /// `fractionDigits`
    FractionDigits,
    /// `length`
    Length,
    /// `minLength`
    MinLength,
    /// `maxLength`
    MaxLength,
    /// `enumeration`
    Enumeration,
    /// `whiteSpace`
    WhiteSpace,
    /// `pattern`
    Pattern,
}

impl FacetKind {
    /// Facet kind parsed under a context, if the context is a facet
    pub fn from_context(context: Context) -> Option<Self> {
        Some(match context {
            Context::MinExclusive => Self::MinExclusive,
            Context::MinInclusive => Self::MinInclusive,
            Context::MaxExclusive => Self::MaxExclusive,
            Context::MaxInclusive => Self::MaxInclusive,
            Context::TotalDigits => Self::TotalDigits,
            Context::FractionDigits => Self::FractionDigits,
            Context::Length => Self::Length,
            Context::MinLength => Self::MinLength,
            Context::MaxLength => Self::MaxLength,
            Context::Enumeration => Self::Enumeration,
            Context::WhiteSpace => Self::WhiteSpace,
            Context::Pattern => Self::Pattern,
            _ => return None,
        })
    }

    /// Context the facet is parsed under
    pub fn context(self) -> Context {
        match self {
            Self::MinExclusive => Context::MinExclusive,
            Self::MinInclusive => Context::MinInclusive,
            Self::MaxExclusive => Context::MaxExclusive,
            Self::MaxInclusive => Context::MaxInclusive,
            Self::TotalDigits => Context::TotalDigits,
            Self::FractionDigits => Context::FractionDigits,
            Self::Length => Context::Length,
            Self::MinLength => Context::MinLength,
            Self::MaxLength => Context::MaxLength,
            Self::Enumeration => Context::Enumeration,
            Self::WhiteSpace => Context::WhiteSpace,
            Self::Pattern => Context::Pattern,
        }
    }

    /// Whether the facet accepts a `fixed` attribute
    pub fn accepts_fixed(self) -> bool {
        !matches!(self, Self::Enumeration | Self::Pattern)
    }
}

/// Typed `value` of a facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetValue {
    /// Literal in the base type's lexical space, kept as written
    Literal(String),
    /// Length or digit count
    Integer(BigUint),
    /// `whiteSpace` mode
    WhiteSpace(WhiteSpace),
}

impl Serialize for FacetValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FacetValue::Literal(s) => serializer.serialize_str(s),
            FacetValue::Integer(n) => serializer.collect_str(n),
            FacetValue::WhiteSpace(w) => w.serialize(serializer),
        }
    }
}

/// A constraining facet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    /// Which facet
    pub kind: FacetKind,
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: FacetAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of a facet
///
/// `fixed` is never set on `enumeration` and `pattern`; the grammar rejects
/// it there.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetAttributes {
    /// `id`
    pub id: Option<String>,
    /// `value`
    pub value: Option<FacetValue>,
    /// `fixed`
    pub fixed: Option<bool>,
}

impl Facet {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let kind = FacetKind::from_context(parsed.context).ok_or_else(|| {
            crate::Error::UnexpectedContent {
                context: parsed.context,
                found: "facet record".to_string(),
            }
        })?;
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;

        let value = match kind {
            FacetKind::TotalDigits
            | FacetKind::FractionDigits
            | FacetKind::Length
            | FacetKind::MinLength
            | FacetKind::MaxLength => parsed.attributes.take_integer("value").map(FacetValue::Integer),
            FacetKind::WhiteSpace => parsed
                .attributes
                .take_white_space("value")
                .map(FacetValue::WhiteSpace),
            _ => parsed.attributes.take_string("value").map(FacetValue::Literal),
        };

        Ok(Self {
            kind,
            attributes: FacetAttributes {
                id: parsed.attributes.take_string("id"),
                value,
                fixed: parsed.attributes.take_boolean("fixed"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `fixed`, defaulting to false
    pub fn is_fixed(&self) -> bool {
        self.attributes.fixed.unwrap_or(false)
    }

    /// Literal value of a value-space facet
    pub fn literal(&self) -> Option<&str> {
        match &self.attributes.value {
            Some(FacetValue::Literal(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::parsing::parse_context;
    use crate::Error;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn facet(context: Context, xml: &str) -> Result<Facet> {
        parse_context(context, xml).map(|record| match record {
            Record::Facet(f) => f,
            other => panic!("unexpected record {other:?}"),
        })
    }

    #[test]
    fn test_numeric_facets_keep_magnitude() {
        let xml = format!(r#"<xs:maxLength {XS} value="+0001234567890" fixed="1"/>"#);
        let max_length = facet(Context::MaxLength, &xml).unwrap();
        assert_eq!(max_length.kind, FacetKind::MaxLength);
        assert_eq!(
            max_length.attributes.value,
            Some(FacetValue::Integer(BigUint::from(1_234_567_890u64)))
        );
        assert!(max_length.is_fixed());
    }

    #[test]
    fn test_total_digits_rejects_zero() {
        let xml = format!(r#"<xs:totalDigits {XS} value="000"/>"#);
        assert!(matches!(
            facet(Context::TotalDigits, &xml).unwrap_err(),
            Error::InvalidAttributeValue { context: Context::TotalDigits, .. }
        ));
        let xml = format!(r#"<xs:fractionDigits {XS} value="0"/>"#);
        assert!(facet(Context::FractionDigits, &xml).is_ok());
    }

    #[test]
    fn test_literal_facets_keep_raw_value() {
        let xml = format!(r#"<xs:minInclusive {XS} value=" 10 "/>"#);
        let min = facet(Context::MinInclusive, &xml).unwrap();
        assert_eq!(min.literal(), Some(" 10 "));
        assert!(!min.is_fixed());
    }

    #[test]
    fn test_enumeration_rejects_fixed() {
        let xml = format!(r#"<xs:enumeration {XS} value="a" fixed="true"/>"#);
        assert!(matches!(
            facet(Context::Enumeration, &xml).unwrap_err(),
            Error::UnexpectedAttribute { context: Context::Enumeration, .. }
        ));
        assert!(!FacetKind::Enumeration.accepts_fixed());
        assert!(FacetKind::WhiteSpace.accepts_fixed());
    }

    #[test]
    fn test_white_space_value() {
        let xml = format!(r#"<xs:whiteSpace {XS} value="collapse"/>"#);
        let ws = facet(Context::WhiteSpace, &xml).unwrap();
        assert_eq!(ws.attributes.value, Some(FacetValue::WhiteSpace(WhiteSpace::Collapse)));

        let xml = format!(r#"<xs:whiteSpace {XS} value="trim"/>"#);
        assert!(facet(Context::WhiteSpace, &xml).is_err());
    }

    #[test]
    fn test_facet_requires_value() {
        let xml = format!(r#"<xs:pattern {XS}/>"#);
        assert!(matches!(
            facet(Context::Pattern, &xml).unwrap_err(),
            Error::MissingAttribute { context: Context::Pattern, attribute: "value" }
        ));
    }

    #[test]
    fn test_every_facet_context_round_trips() {
        for kind in [FacetKind::MinExclusive, FacetKind::Length, FacetKind::Pattern] {
            assert_eq!(FacetKind::from_context(kind.context()), Some(kind));
        }
        assert_eq!(FacetKind::from_context(Context::Schema), None);
    }
}
