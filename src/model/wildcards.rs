//! Wildcards: `any` and `anyAttribute`

use num_bigint::BigUint;
use serde::Serialize;

use super::{Annotation, Parsed};
use crate::error::Result;
use crate::namespaces::NamespaceDeclarations;
use crate::validators::{serialize_integer, MaxOccurs, NamespaceList, ProcessContents};

/// `any`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Any {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: AnyAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `any`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyAttributes {
    /// `id`
    pub id: Option<String>,
    /// `namespace`
    pub namespace: Option<NamespaceList>,
    /// `processContents`
    pub process_contents: Option<ProcessContents>,
    /// `minOccurs`
    #[serde(serialize_with = "serialize_integer")]
    pub min_occurs: Option<BigUint>,
    /// `maxOccurs`
    pub max_occurs: Option<MaxOccurs>,
}

impl Any {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: AnyAttributes {
                id: parsed.attributes.take_string("id"),
                namespace: parsed.attributes.take_namespace_list("namespace"),
                process_contents: parsed.attributes.take_process_contents("processContents"),
                min_occurs: parsed.attributes.take_integer("minOccurs"),
                max_occurs: parsed.attributes.take_max_occurs("maxOccurs"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `processContents`, defaulting to strict
    pub fn process_contents_or_default(&self) -> ProcessContents {
        self.attributes.process_contents.unwrap_or_default()
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

/// `anyAttribute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnyAttribute {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: AnyAttributeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `anyAttribute`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyAttributeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `namespace`
    pub namespace: Option<NamespaceList>,
    /// `processContents`
    pub process_contents: Option<ProcessContents>,
}

impl AnyAttribute {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: AnyAttributeAttributes {
                id: parsed.attributes.take_string("id"),
                namespace: parsed.attributes.take_namespace_list("namespace"),
                process_contents: parsed.attributes.take_process_contents("processContents"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `processContents`, defaulting to strict
    pub fn process_contents_or_default(&self) -> ProcessContents {
        self.attributes.process_contents.unwrap_or_default()
    }
}
