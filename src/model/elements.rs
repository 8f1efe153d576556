//! Element declarations

use num_bigint::BigUint;
use serde::Serialize;

use super::{Annotation, Children, IdentityConstraint, LocalComplexType, LocalSimpleType, Parsed, Record};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::{serialize_integer, DerivationSet, Form, MaxOccurs};

/// Anonymous type of an element declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LocalType {
    /// Anonymous `simpleType`
    SimpleType(LocalSimpleType),
    /// Anonymous `complexType`
    ComplexType(LocalComplexType),
}

fn local_type(children: &mut Children) -> Option<LocalType> {
    children.next_if(|record| match record {
        Record::LocalSimpleType(t) => Ok(LocalType::SimpleType(t)),
        Record::LocalComplexType(t) => Ok(LocalType::ComplexType(t)),
        other => Err(other),
    })
}

fn identity_constraints(children: Children) -> Result<Vec<IdentityConstraint>> {
    children.remaining(|record| match record {
        Record::Unique(u) => Ok(IdentityConstraint::Unique(u)),
        Record::Key(k) => Ok(IdentityConstraint::Key(k)),
        Record::Keyref(k) => Ok(IdentityConstraint::Keyref(k)),
        other => Err(other),
    })
}

/// Global `element`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevelElement {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: TopLevelElementAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous type
    pub type_definition: Option<LocalType>,
    /// `unique`, `key` and `keyref` in document order
    pub identity_constraints: Vec<IdentityConstraint>,
}

/// Attributes of a global `element`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelElementAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `type`
    #[serde(rename = "type")]
    pub type_name: Option<QName>,
    /// `substitutionGroup`
    pub substitution_group: Option<QName>,
    /// `default`
    pub default: Option<String>,
    /// `fixed`
    pub fixed: Option<String>,
    /// `nillable`
    pub nillable: Option<bool>,
    /// `abstract`
    #[serde(rename = "abstract")]
    pub abstract_element: Option<bool>,
    /// `final`
    #[serde(rename = "final")]
    pub final_derivation: Option<DerivationSet>,
    /// `block`
    pub block: Option<DerivationSet>,
}

impl TopLevelElement {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let type_definition = local_type(&mut parsed.children);
        let identity_constraints = identity_constraints(parsed.children)?;
        let attributes = &mut parsed.attributes;
        Ok(Self {
            attributes: TopLevelElementAttributes {
                id: attributes.take_string("id"),
                name: attributes.take_string("name"),
                type_name: attributes.take_qname("type"),
                substitution_group: attributes.take_qname("substitutionGroup"),
                default: attributes.take_string("default"),
                fixed: attributes.take_string("fixed"),
                nillable: attributes.take_boolean("nillable"),
                abstract_element: attributes.take_boolean("abstract"),
                final_derivation: attributes.take_derivations("final"),
                block: attributes.take_derivations("block"),
            },
            annotation,
            type_definition,
            identity_constraints,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `abstract`, defaulting to false
    pub fn is_abstract(&self) -> bool {
        self.attributes.abstract_element.unwrap_or(false)
    }

    /// `nillable`, defaulting to false
    pub fn is_nillable(&self) -> bool {
        self.attributes.nillable.unwrap_or(false)
    }
}

/// Local `element`, either a declaration or a reference
///
/// Also used for members of `all`, where the grammar has already narrowed
/// the occurrence bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalElement {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: LocalElementAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous type
    pub type_definition: Option<LocalType>,
    /// `unique`, `key` and `keyref` in document order
    pub identity_constraints: Vec<IdentityConstraint>,
}

/// Attributes of a local `element`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalElementAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `ref`
    #[serde(rename = "ref")]
    pub reference: Option<QName>,
    /// `type`
    #[serde(rename = "type")]
    pub type_name: Option<QName>,
    /// `minOccurs`
    #[serde(serialize_with = "serialize_integer")]
    pub min_occurs: Option<BigUint>,
    /// `maxOccurs`
    pub max_occurs: Option<MaxOccurs>,
    /// `default`
    pub default: Option<String>,
    /// `fixed`
    pub fixed: Option<String>,
    /// `nillable`
    pub nillable: Option<bool>,
    /// `block`
    pub block: Option<DerivationSet>,
    /// `form`
    pub form: Option<Form>,
}

impl LocalElement {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let type_definition = local_type(&mut parsed.children);
        let identity_constraints = identity_constraints(parsed.children)?;
        let attributes = &mut parsed.attributes;
        Ok(Self {
            attributes: LocalElementAttributes {
                id: attributes.take_string("id"),
                name: attributes.take_string("name"),
                reference: attributes.take_qname("ref"),
                type_name: attributes.take_qname("type"),
                min_occurs: attributes.take_integer("minOccurs"),
                max_occurs: attributes.take_max_occurs("maxOccurs"),
                default: attributes.take_string("default"),
                fixed: attributes.take_string("fixed"),
                nillable: attributes.take_boolean("nillable"),
                block: attributes.take_derivations("block"),
                form: attributes.take_form("form"),
            },
            annotation,
            type_definition,
            identity_constraints,
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

    /// `nillable`, defaulting to false
    pub fn is_nillable(&self) -> bool {
        self.attributes.nillable.unwrap_or(false)
    }

    /// Whether this is a reference to a global element
    pub fn is_reference(&self) -> bool {
        self.attributes.reference.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Context;
    use crate::parsing::parse_context;
    use crate::validators::Derivation;
    use crate::Error;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn top_level(xml: &str) -> Result<TopLevelElement> {
        parse_context(Context::TopLevelElement, xml).map(|record| match record {
            Record::TopLevelElement(e) => e,
            other => panic!("unexpected record {other:?}"),
        })
    }

    #[test]
    fn test_top_level_element_attributes() {
        let xml = format!(
            r##"<xs:element {XS} xmlns:t="urn:t" name="order" type="t:Order"
                   substitutionGroup="t:item" abstract="true" block="#all" final="restriction"/>"##
        );
        let element = top_level(&xml).unwrap();
        assert_eq!(element.attributes.name.as_deref(), Some("order"));
        assert_eq!(element.attributes.type_name, Some(QName::namespaced("urn:t", "Order")));
        assert!(element.is_abstract());
        assert!(!element.is_nillable());
        let block = element.attributes.block.unwrap();
        assert!(block.contains(Derivation::Substitution));
        assert!(block.contains(Derivation::Extension));
        assert!(element.attributes.final_derivation.unwrap().contains(Derivation::Restriction));
    }

    #[test]
    fn test_top_level_element_rejects_occurrence() {
        let xml = format!(r#"<xs:element {XS} name="a" minOccurs="0"/>"#);
        assert!(matches!(
            top_level(&xml).unwrap_err(),
            Error::UnexpectedAttribute { context: Context::TopLevelElement, ref attribute }
                if attribute == "minOccurs"
        ));
    }

    #[test]
    fn test_final_rejects_substitution() {
        let xml = format!(r#"<xs:element {XS} name="a" final="substitution"/>"#);
        assert!(matches!(
            top_level(&xml).unwrap_err(),
            Error::InvalidAttributeValue { context: Context::TopLevelElement, .. }
        ));
    }

    #[test]
    fn test_anonymous_type_and_identity_constraints() {
        let xml = format!(
            r#"<xs:element {XS} name="root">
                 <xs:complexType><xs:sequence><xs:element name="item" maxOccurs="unbounded"/></xs:sequence></xs:complexType>
                 <xs:key name="k"><xs:selector xpath="item"/><xs:field xpath="@id"/></xs:key>
                 <xs:keyref name="r" refer="k"><xs:selector xpath="item"/><xs:field xpath="@ref"/></xs:keyref>
               </xs:element>"#
        );
        let element = top_level(&xml).unwrap();
        assert!(matches!(element.type_definition, Some(LocalType::ComplexType(_))));
        assert_eq!(element.identity_constraints.len(), 2);
        assert!(matches!(element.identity_constraints[0], IdentityConstraint::Key(_)));
        assert!(matches!(element.identity_constraints[1], IdentityConstraint::Keyref(_)));
    }

    #[test]
    fn test_type_after_identity_constraint_is_rejected() {
        let xml = format!(
            r#"<xs:element {XS} name="root">
                 <xs:unique name="u"><xs:selector xpath="a"/><xs:field xpath="b"/></xs:unique>
                 <xs:simpleType><xs:list itemType="xs:int"/></xs:simpleType>
               </xs:element>"#
        );
        assert!(matches!(
            top_level(&xml).unwrap_err(),
            Error::UnexpectedContent { context: Context::TopLevelElement, .. }
        ));
    }

    #[test]
    fn test_local_element_occurrence() {
        let xml = format!(r#"<xs:element {XS} ref="a" minOccurs="0" maxOccurs="100000000000000000000"/>"#);
        let Record::LocalElement(element) = parse_context(Context::LocalElement, &xml).unwrap() else {
            panic!("expected local element");
        };
        assert!(element.is_reference());
        assert_eq!(element.min_occurs_or_default(), BigUint::from(0u8));
        assert_eq!(
            element.max_occurs_or_default(),
            MaxOccurs::Bounded("100000000000000000000".parse().unwrap())
        );
    }

    #[test]
    fn test_local_element_defaults() {
        let xml = format!(r#"<xs:element {XS} name="a"/>"#);
        let Record::LocalElement(element) = parse_context(Context::LocalElement, &xml).unwrap() else {
            panic!("expected local element");
        };
        assert_eq!(element.attributes.min_occurs, None);
        assert_eq!(element.min_occurs_or_default(), BigUint::from(1u8));
        assert_eq!(element.max_occurs_or_default(), MaxOccurs::one());
        assert_eq!(element.attributes.form, None);
    }

    #[test]
    fn test_all_element_bounds() {
        let xml = format!(r#"<xs:element {XS} name="a" minOccurs="2"/>"#);
        assert!(matches!(
            parse_context(Context::AllElement, &xml).unwrap_err(),
            Error::InvalidAttributeValue { context: Context::AllElement, .. }
        ));
        let xml = format!(r#"<xs:element {XS} name="a" minOccurs="0" maxOccurs="0"/>"#);
        assert!(matches!(
            parse_context(Context::AllElement, &xml).unwrap(),
            Record::AllElement(_)
        ));
    }
}
