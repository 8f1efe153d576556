//! Simple type definitions: `simpleType`, `restriction`, `list`, `union`

use serde::Serialize;

use super::{Annotation, Facet, Parsed, Record};
use crate::error::Result;
use crate::grammar::Context;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::DerivationSet;

/// Named `simpleType`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevelSimpleType {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: TopLevelSimpleTypeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// How the type is derived
    pub derivation: SimpleDerivation,
}

/// Attributes of a named `simpleType`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopLevelSimpleTypeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `final`
    #[serde(rename = "final")]
    pub final_derivation: Option<DerivationSet>,
}

/// Anonymous `simpleType`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSimpleType {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: LocalSimpleTypeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// How the type is derived
    pub derivation: SimpleDerivation,
}

/// Attributes of an anonymous `simpleType`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalSimpleTypeAttributes {
    /// `id`
    pub id: Option<String>,
}

/// Derivation of a simple type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SimpleDerivation {
    /// Restriction of a base type
    Restriction(SimpleRestriction),
    /// List of an item type
    List(List),
    /// Union of member types
    Union(Union),
}

/// `restriction` inside `simpleType`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleRestriction {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: SimpleRestrictionAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous base type
    pub simple_type: Option<Box<LocalSimpleType>>,
    /// Facets in document order
    pub facets: Vec<Facet>,
}

/// Attributes of `simpleType/restriction`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimpleRestrictionAttributes {
    /// `id`
    pub id: Option<String>,
    /// `base`
    pub base: Option<QName>,
}

/// `list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: ListAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous item type
    pub simple_type: Option<Box<LocalSimpleType>>,
}

/// Attributes of `list`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAttributes {
    /// `id`
    pub id: Option<String>,
    /// `itemType`
    pub item_type: Option<QName>,
}

/// `union`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Union {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: UnionAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous member types
    pub simple_types: Vec<LocalSimpleType>,
}

/// Attributes of `union`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionAttributes {
    /// `id`
    pub id: Option<String>,
    /// `memberTypes`
    pub member_types: Option<Vec<QName>>,
}

fn derivation(parsed: &mut Parsed) -> Result<SimpleDerivation> {
    parsed
        .children
        .required("one of 'restriction', 'list', 'union'", |record| match record {
            Record::SimpleTypeRestriction(r) => Ok(SimpleDerivation::Restriction(r)),
            Record::List(r) => Ok(SimpleDerivation::List(r)),
            Record::Union(r) => Ok(SimpleDerivation::Union(r)),
            other => Err(other),
        })
}

impl TopLevelSimpleType {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let derivation = derivation(&mut parsed)?;
        parsed.children.finish()?;
        Ok(Self {
            attributes: TopLevelSimpleTypeAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                final_derivation: parsed.attributes.take_derivations("final"),
            },
            annotation,
            derivation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

impl LocalSimpleType {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let derivation = derivation(&mut parsed)?;
        parsed.children.finish()?;
        Ok(Self {
            attributes: LocalSimpleTypeAttributes {
                id: parsed.attributes.take_string("id"),
            },
            annotation,
            derivation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

impl SimpleDerivation {
    /// Context of the derivation element
    pub fn context(&self) -> Context {
        match self {
            SimpleDerivation::Restriction(_) => Context::SimpleTypeRestriction,
            SimpleDerivation::List(_) => Context::List,
            SimpleDerivation::Union(_) => Context::Union,
        }
    }
}

impl SimpleRestriction {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_type = parsed.children.local_simple_type().map(Box::new);
        let facets = parsed.children.remaining(|record| match record {
            Record::Facet(f) => Ok(f),
            other => Err(other),
        })?;
        Ok(Self {
            attributes: SimpleRestrictionAttributes {
                id: parsed.attributes.take_string("id"),
                base: parsed.attributes.take_qname("base"),
            },
            annotation,
            simple_type,
            facets,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

impl List {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_type = parsed.children.local_simple_type().map(Box::new);
        parsed.children.finish()?;
        Ok(Self {
            attributes: ListAttributes {
                id: parsed.attributes.take_string("id"),
                item_type: parsed.attributes.take_qname("itemType"),
            },
            annotation,
            simple_type,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

impl Union {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_types = parsed.children.remaining(|record| match record {
            Record::LocalSimpleType(t) => Ok(t),
            other => Err(other),
        })?;
        Ok(Self {
            attributes: UnionAttributes {
                id: parsed.attributes.take_string("id"),
                member_types: parsed.attributes.take_qname_list("memberTypes"),
            },
            annotation,
            simple_types,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}
