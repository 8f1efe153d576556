//! Attribute declarations and attribute groups

use serde::Serialize;

use super::{Annotation, AnyAttribute, Children, LocalSimpleType, Parsed, Record};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::{Form, Use};

/// Global `attribute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevelAttribute {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: TopLevelAttributeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous type
    pub simple_type: Option<LocalSimpleType>,
}

/// Attributes of a global `attribute`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopLevelAttributeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `type`
    #[serde(rename = "type")]
    pub type_name: Option<QName>,
    /// `default`
    pub default: Option<String>,
    /// `fixed`
    pub fixed: Option<String>,
}

impl TopLevelAttribute {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_type = parsed.children.local_simple_type();
        parsed.children.finish()?;
        Ok(Self {
            attributes: TopLevelAttributeAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                type_name: parsed.attributes.take_qname("type"),
                default: parsed.attributes.take_string("default"),
                fixed: parsed.attributes.take_string("fixed"),
            },
            annotation,
            simple_type,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// Local `attribute`, either a declaration or a reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalAttribute {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: LocalAttributeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous type
    pub simple_type: Option<LocalSimpleType>,
}

/// Attributes of a local `attribute`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalAttributeAttributes {
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
    /// `use`
    #[serde(rename = "use")]
    pub use_mode: Option<Use>,
    /// `default`
    pub default: Option<String>,
    /// `fixed`
    pub fixed: Option<String>,
    /// `form`
    pub form: Option<Form>,
}

impl LocalAttribute {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_type = parsed.children.local_simple_type();
        parsed.children.finish()?;
        Ok(Self {
            attributes: LocalAttributeAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                reference: parsed.attributes.take_qname("ref"),
                type_name: parsed.attributes.take_qname("type"),
                use_mode: parsed.attributes.take_use("use"),
                default: parsed.attributes.take_string("default"),
                fixed: parsed.attributes.take_string("fixed"),
                form: parsed.attributes.take_form("form"),
            },
            annotation,
            simple_type,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `use`, defaulting to optional
    pub fn use_or_default(&self) -> Use {
        self.attributes.use_mode.unwrap_or_default()
    }

    /// Whether this is a reference to a global attribute
    pub fn is_reference(&self) -> bool {
        self.attributes.reference.is_some()
    }
}

/// Attribute uses and wildcard of a complex type, derivation or group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeDeclarations {
    /// `attribute` and `attributeGroup` children in document order
    pub attributes: Vec<AttributeUse>,
    /// Trailing `anyAttribute`
    pub any_attribute: Option<AnyAttribute>,
}

/// One attribute use
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeUse {
    /// Local declaration or reference
    Attribute(LocalAttribute),
    /// Attribute group reference
    AttributeGroup(AttributeGroupRef),
}

impl AttributeDeclarations {
    pub(crate) fn take(children: &mut Children) -> Self {
        let attributes = children.repeated(|record| match record {
            Record::LocalAttribute(a) => Ok(AttributeUse::Attribute(a)),
            Record::AttributeGroupRef(g) => Ok(AttributeUse::AttributeGroup(g)),
            other => Err(other),
        });
        let any_attribute = children.next_if(|record| match record {
            Record::AnyAttribute(a) => Ok(a),
            other => Err(other),
        });
        Self {
            attributes,
            any_attribute,
        }
    }

    /// Whether no attribute use or wildcard is declared
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.any_attribute.is_none()
    }
}

/// Named `attributeGroup`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAttributeGroup {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: NamedAttributeGroupAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Member attribute uses
    pub attribute_declarations: AttributeDeclarations,
}

/// Attributes of a named `attributeGroup`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedAttributeGroupAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
}

impl NamedAttributeGroup {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let attribute_declarations = AttributeDeclarations::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: NamedAttributeGroupAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
            },
            annotation,
            attribute_declarations,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `attributeGroup` reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeGroupRef {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: AttributeGroupRefAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of an `attributeGroup` reference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeGroupRefAttributes {
    /// `id`
    pub id: Option<String>,
    /// `ref`
    #[serde(rename = "ref")]
    pub reference: Option<QName>,
}

impl AttributeGroupRef {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: AttributeGroupRefAttributes {
                id: parsed.attributes.take_string("id"),
                reference: parsed.attributes.take_qname("ref"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Context;
    use crate::parsing::parse_context;
    use crate::Error;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    #[test]
    fn test_local_attribute_defaults() {
        let xml = format!(r#"<xs:attribute {XS} name="lang" type="xs:language"/>"#);
        let Record::LocalAttribute(attribute) = parse_context(Context::LocalAttribute, &xml).unwrap() else {
            panic!("expected attribute");
        };
        assert_eq!(attribute.attributes.use_mode, None);
        assert_eq!(attribute.use_or_default(), Use::Optional);
        assert!(!attribute.is_reference());
    }

    #[test]
    fn test_local_attribute_use_keyword() {
        let xml = format!(r#"<xs:attribute {XS} ref="xml:lang" use="required"/>"#);
        let Record::LocalAttribute(attribute) = parse_context(Context::LocalAttribute, &xml).unwrap() else {
            panic!("expected attribute");
        };
        assert_eq!(attribute.use_or_default(), Use::Required);
        assert_eq!(
            attribute.attributes.reference,
            Some(QName::namespaced(crate::XML_NAMESPACE, "lang"))
        );

        let xml = format!(r#"<xs:attribute {XS} name="a" use="mandatory"/>"#);
        assert!(matches!(
            parse_context(Context::LocalAttribute, &xml).unwrap_err(),
            Error::InvalidAttributeValue { context: Context::LocalAttribute, ref value, .. }
                if value == "mandatory"
        ));
    }

    #[test]
    fn test_top_level_attribute_rejects_use() {
        let xml = format!(r#"<xs:attribute {XS} name="a" use="required"/>"#);
        assert!(matches!(
            parse_context(Context::TopLevelAttribute, &xml).unwrap_err(),
            Error::UnexpectedAttribute { context: Context::TopLevelAttribute, .. }
        ));
    }

    #[test]
    fn test_named_attribute_group() {
        let xml = format!(
            r###"<xs:attributeGroup {XS} name="common">
                 <xs:attribute name="id" type="xs:ID"/>
                 <xs:attributeGroup ref="other"/>
                 <xs:anyAttribute namespace="##other" processContents="lax"/>
               </xs:attributeGroup>"###
        );
        let Record::NamedAttributeGroup(group) =
            parse_context(Context::NamedAttributeGroup, &xml).unwrap()
        else {
            panic!("expected attribute group");
        };
        assert_eq!(group.attributes.name.as_deref(), Some("common"));
        assert_eq!(group.attribute_declarations.attributes.len(), 2);
        assert!(group.attribute_declarations.any_attribute.is_some());
    }

    #[test]
    fn test_any_attribute_must_be_last() {
        let xml = format!(
            r#"<xs:attributeGroup {XS} name="g"><xs:anyAttribute/><xs:attribute name="a"/></xs:attributeGroup>"#
        );
        assert!(matches!(
            parse_context(Context::NamedAttributeGroup, &xml).unwrap_err(),
            Error::UnexpectedContent { context: Context::NamedAttributeGroup, .. }
        ));
    }

    #[test]
    fn test_attribute_group_ref_requires_ref() {
        let xml = format!(r#"<xs:attributeGroup {XS}/>"#);
        assert!(matches!(
            parse_context(Context::AttributeGroupRef, &xml).unwrap_err(),
            Error::MissingAttribute { attribute: "ref", .. }
        ));
    }
}
