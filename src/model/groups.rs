//! Model groups: `sequence`, `choice`, `all` and `group`

use num_bigint::BigUint;
use serde::Serialize;

use super::{Annotation, Any, Children, LocalElement, Parsed, Record};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::{serialize_integer, MaxOccurs};

/// Occurrence attributes shared by the particle productions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleAttributes {
    /// `id`
    pub id: Option<String>,
    /// `minOccurs`
    #[serde(serialize_with = "serialize_integer")]
    pub min_occurs: Option<BigUint>,
    /// `maxOccurs`
    pub max_occurs: Option<MaxOccurs>,
}

impl ParticleAttributes {
    pub(crate) fn take(parsed: &mut Parsed) -> Self {
        Self {
            id: parsed.attributes.take_string("id"),
            min_occurs: parsed.attributes.take_integer("minOccurs"),
            max_occurs: parsed.attributes.take_max_occurs("maxOccurs"),
        }
    }

    /// `minOccurs`, defaulting to 1
    pub fn min_occurs_or_default(&self) -> BigUint {
        self.min_occurs.clone().unwrap_or_else(|| BigUint::from(1u8))
    }

    /// `maxOccurs`, defaulting to 1
    pub fn max_occurs_or_default(&self) -> MaxOccurs {
        self.max_occurs.clone().unwrap_or_else(MaxOccurs::one)
    }
}

/// `sequence` or `choice`
///
/// Inside a named group the occurrence attributes are not accepted and stay
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplicitGroup {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: ParticleAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Nested particles in document order
    pub particles: Vec<NestedParticle>,
}

/// Particle nested in a `sequence` or `choice`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedParticle {
    /// Local element
    Element(LocalElement),
    /// Group reference
    Group(GroupRef),
    /// Nested `choice`
    Choice(ExplicitGroup),
    /// Nested `sequence`
    Sequence(ExplicitGroup),
    /// Element wildcard
    Any(Any),
}

impl ExplicitGroup {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let attributes = ParticleAttributes::take(&mut parsed);
        let particles = parsed.children.remaining(|record| match record {
            Record::LocalElement(e) => Ok(NestedParticle::Element(e)),
            Record::GroupRef(g) => Ok(NestedParticle::Group(g)),
            Record::Choice(c) => Ok(NestedParticle::Choice(c)),
            Record::Sequence(s) => Ok(NestedParticle::Sequence(s)),
            Record::Any(a) => Ok(NestedParticle::Any(a)),
            other => Err(other),
        })?;
        Ok(Self {
            namespace_declarations: parsed.namespace_declarations,
            attributes,
            annotation,
            particles,
        })
    }

    /// Local elements directly inside the group
    pub fn elements(&self) -> impl Iterator<Item = &LocalElement> {
        self.particles.iter().filter_map(|p| match p {
            NestedParticle::Element(e) => Some(e),
            _ => None,
        })
    }
}

/// `all`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct All {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: ParticleAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Member elements
    pub elements: Vec<LocalElement>,
}

impl All {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let attributes = ParticleAttributes::take(&mut parsed);
        let elements = parsed.children.remaining(|record| match record {
            Record::AllElement(e) => Ok(e),
            other => Err(other),
        })?;
        Ok(Self {
            namespace_declarations: parsed.namespace_declarations,
            attributes,
            annotation,
            elements,
        })
    }
}

/// Content particle of a complex type or content derivation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeDefParticle {
    /// Group reference
    Group(GroupRef),
    /// `all`
    All(All),
    /// `choice`
    Choice(ExplicitGroup),
    /// `sequence`
    Sequence(ExplicitGroup),
}

impl TypeDefParticle {
    pub(crate) fn take(children: &mut Children) -> Option<Self> {
        children.next_if(|record| match record {
            Record::GroupRef(g) => Ok(TypeDefParticle::Group(g)),
            Record::All(a) => Ok(TypeDefParticle::All(a)),
            Record::Choice(c) => Ok(TypeDefParticle::Choice(c)),
            Record::Sequence(s) => Ok(TypeDefParticle::Sequence(s)),
            other => Err(other),
        })
    }
}

/// Named `group`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedGroup {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: NamedGroupAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// The group's single model group
    pub model: NamedGroupModel,
}

/// Attributes of a named `group`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedGroupAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
}

/// Model group of a named group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NamedGroupModel {
    /// `all`
    All(All),
    /// `choice`
    Choice(ExplicitGroup),
    /// `sequence`
    Sequence(ExplicitGroup),
}

impl NamedGroup {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let model = parsed
            .children
            .required("one of 'all', 'choice', 'sequence'", |record| match record {
                Record::NamedGroupAll(a) => Ok(NamedGroupModel::All(a)),
                Record::NamedGroupChoice(c) => Ok(NamedGroupModel::Choice(c)),
                Record::NamedGroupSequence(s) => Ok(NamedGroupModel::Sequence(s)),
                other => Err(other),
            })?;
        parsed.children.finish()?;
        Ok(Self {
            attributes: NamedGroupAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
            },
            annotation,
            model,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `group` reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRef {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: GroupRefAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of a `group` reference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRefAttributes {
    /// `id`
    pub id: Option<String>,
    /// `ref`
    #[serde(rename = "ref")]
    pub reference: Option<QName>,
    /// `minOccurs`
    #[serde(serialize_with = "serialize_integer")]
    pub min_occurs: Option<BigUint>,
    /// `maxOccurs`
    pub max_occurs: Option<MaxOccurs>,
}

impl GroupRef {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: GroupRefAttributes {
                id: parsed.attributes.take_string("id"),
                reference: parsed.attributes.take_qname("ref"),
                min_occurs: parsed.attributes.take_integer("minOccurs"),
                max_occurs: parsed.attributes.take_max_occurs("maxOccurs"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `minOccurs`, defaulting to 1
    pub fn min_occurs_or_default(&self) -> BigUint {
        self.attributes.min_occurs.clone().unwrap_or_else(|| BigUint::from(1u8))
    }

    /// `maxOccurs`, defaulting to 1
    pub fn max_occurs_or_default(&self) -> MaxOccurs {
        self.attributes.max_occurs.clone().unwrap_or_else(MaxOccurs::one)
    }
}
