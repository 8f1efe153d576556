//! `schema` and the composition records (`include`, `import`, `redefine`),
//! plus `notation`

use serde::Serialize;

use super::{
    Annotation, LocalType, NamedAttributeGroup, NamedGroup, Parsed, Record, TopLevelAttribute,
    TopLevelComplexType, TopLevelElement, TopLevelSimpleType,
};
use crate::error::Result;
use crate::namespaces::NamespaceDeclarations;
use crate::validators::{DerivationSet, Form};

/// `schema`, the root of the object model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: SchemaAttributes,
    /// Leading `include`, `import`, `redefine` and `annotation` children
    pub composition: Vec<Composition>,
    /// Definitions and declarations that follow, with their annotations
    pub definitions: Vec<SchemaTop>,
}

/// Attributes of `schema`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttributes {
    /// `id`
    pub id: Option<String>,
    /// `targetNamespace`
    pub target_namespace: Option<String>,
    /// `version`
    pub version: Option<String>,
    /// `finalDefault`
    pub final_default: Option<DerivationSet>,
    /// `blockDefault`
    pub block_default: Option<DerivationSet>,
    /// `attributeFormDefault`
    pub attribute_form_default: Option<Form>,
    /// `elementFormDefault`
    pub element_form_default: Option<Form>,
    /// `xml:lang`
    pub lang: Option<String>,
}

/// Composition child of `schema`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Composition {
    /// `include`
    Include(Include),
    /// `import`
    Import(Import),
    /// `redefine`
    Redefine(Redefine),
    /// `annotation`
    Annotation(Annotation),
}

/// Definition or declaration child of `schema`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaTop {
    /// Named simple type
    SimpleType(TopLevelSimpleType),
    /// Named complex type
    ComplexType(TopLevelComplexType),
    /// Named model group
    Group(NamedGroup),
    /// Named attribute group
    AttributeGroup(NamedAttributeGroup),
    /// Global element
    Element(TopLevelElement),
    /// Global attribute
    Attribute(TopLevelAttribute),
    /// Notation
    Notation(Notation),
    /// Annotation between definitions
    Annotation(Annotation),
}

macro_rules! top_level_iter {
    ($(#[$doc:meta] $method:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            #[$doc]
            pub fn $method(&self) -> impl Iterator<Item = &$ty> {
                self.definitions.iter().filter_map(|top| match top {
                    SchemaTop::$variant(item) => Some(item),
                    _ => None,
                })
            }
        )*
    };
}

impl Schema {
    top_level_iter! {
        /// Global element declarations
        elements => Element(TopLevelElement),
        /// Named complex types
        complex_types => ComplexType(TopLevelComplexType),
        /// Named simple types
        simple_types => SimpleType(TopLevelSimpleType),
        /// Global attribute declarations
        attributes => Attribute(TopLevelAttribute),
        /// Named model groups
        groups => Group(NamedGroup),
        /// Named attribute groups
        attribute_groups => AttributeGroup(NamedAttributeGroup),
        /// Notations
        notations => Notation(Notation),
    }

    /// Target namespace, if declared
    pub fn target_namespace(&self) -> Option<&str> {
        self.attributes.target_namespace.as_deref()
    }

    /// `elementFormDefault`, defaulting to unqualified
    pub fn element_form_default_or_default(&self) -> Form {
        self.attributes.element_form_default.unwrap_or_default()
    }

    /// `attributeFormDefault`, defaulting to unqualified
    pub fn attribute_form_default_or_default(&self) -> Form {
        self.attributes.attribute_form_default.unwrap_or_default()
    }

    /// Find a global element declaration by name
    pub fn element(&self, name: &str) -> Option<&TopLevelElement> {
        self.elements()
            .find(|e| e.attributes.name.as_deref() == Some(name))
    }

    /// Find a named complex type by name
    pub fn complex_type(&self, name: &str) -> Option<&TopLevelComplexType> {
        self.complex_types()
            .find(|t| t.attributes.name.as_deref() == Some(name))
    }

    /// Find a named simple type by name
    pub fn simple_type(&self, name: &str) -> Option<&TopLevelSimpleType> {
        self.simple_types()
            .find(|t| t.attributes.name.as_deref() == Some(name))
    }

    /// Anonymous types of global elements
    pub fn anonymous_types(&self) -> impl Iterator<Item = &LocalType> {
        self.elements().filter_map(|e| e.type_definition.as_ref())
    }

    pub(crate) fn build(parsed: Parsed) -> Result<Self> {
        let Parsed {
            namespace_declarations,
            mut attributes,
            mut children,
            ..
        } = parsed;

        let composition = children.repeated(|record| match record {
            Record::Include(r) => Ok(Composition::Include(r)),
            Record::Import(r) => Ok(Composition::Import(r)),
            Record::Redefine(r) => Ok(Composition::Redefine(r)),
            Record::Annotation(r) => Ok(Composition::Annotation(r)),
            other => Err(other),
        });
        let definitions = children.remaining(|record| match record {
            Record::TopLevelSimpleType(r) => Ok(SchemaTop::SimpleType(r)),
            Record::TopLevelComplexType(r) => Ok(SchemaTop::ComplexType(r)),
            Record::NamedGroup(r) => Ok(SchemaTop::Group(r)),
            Record::NamedAttributeGroup(r) => Ok(SchemaTop::AttributeGroup(r)),
            Record::TopLevelElement(r) => Ok(SchemaTop::Element(r)),
            Record::TopLevelAttribute(r) => Ok(SchemaTop::Attribute(r)),
            Record::Notation(r) => Ok(SchemaTop::Notation(r)),
            Record::Annotation(r) => Ok(SchemaTop::Annotation(r)),
            other => Err(other),
        })?;

        Ok(Self {
            namespace_declarations,
            attributes: SchemaAttributes {
                id: attributes.take_string("id"),
                target_namespace: attributes.take_string("targetNamespace"),
                version: attributes.take_string("version"),
                final_default: attributes.take_derivations("finalDefault"),
                block_default: attributes.take_derivations("blockDefault"),
                attribute_form_default: attributes.take_form("attributeFormDefault"),
                element_form_default: attributes.take_form("elementFormDefault"),
                lang: attributes.take_string("lang"),
            },
            composition,
            definitions,
        })
    }
}

/// `include`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Include {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: IncludeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `include` and `redefine`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `schemaLocation`
    pub schema_location: Option<String>,
}

impl Include {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: IncludeAttributes {
                id: parsed.attributes.take_string("id"),
                schema_location: parsed.attributes.take_string("schemaLocation"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `import`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: ImportAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `import`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAttributes {
    /// `id`
    pub id: Option<String>,
    /// `namespace`
    pub namespace: Option<String>,
    /// `schemaLocation`
    pub schema_location: Option<String>,
}

impl Import {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: ImportAttributes {
                id: parsed.attributes.take_string("id"),
                namespace: parsed.attributes.take_string("namespace"),
                schema_location: parsed.attributes.take_string("schemaLocation"),
            },
            annotation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `redefine`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redefine {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: IncludeAttributes,
    /// Redefined components and annotations in document order
    pub items: Vec<RedefineItem>,
}

/// Child of `redefine`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RedefineItem {
    /// `annotation`
    Annotation(Annotation),
    /// Redefined simple type
    SimpleType(TopLevelSimpleType),
    /// Redefined complex type
    ComplexType(TopLevelComplexType),
    /// Redefined model group
    Group(NamedGroup),
    /// Redefined attribute group
    AttributeGroup(NamedAttributeGroup),
}

impl Redefine {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let items = parsed.children.remaining(|record| match record {
            Record::Annotation(r) => Ok(RedefineItem::Annotation(r)),
            Record::TopLevelSimpleType(r) => Ok(RedefineItem::SimpleType(r)),
            Record::TopLevelComplexType(r) => Ok(RedefineItem::ComplexType(r)),
            Record::NamedGroup(r) => Ok(RedefineItem::Group(r)),
            Record::NamedAttributeGroup(r) => Ok(RedefineItem::AttributeGroup(r)),
            other => Err(other),
        })?;
        Ok(Self {
            attributes: IncludeAttributes {
                id: parsed.attributes.take_string("id"),
                schema_location: parsed.attributes.take_string("schemaLocation"),
            },
            items,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `notation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notation {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: NotationAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `notation`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotationAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `public`
    pub public: Option<String>,
    /// `system`
    pub system: Option<String>,
}

impl Notation {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: NotationAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                public: parsed.attributes.take_string("public"),
                system: parsed.attributes.take_string("system"),
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
    fn test_schema_slots() {
        let xml = format!(
            r#"<xs:schema {XS} targetNamespace="urn:t" elementFormDefault="qualified">
                 <xs:annotation/>
                 <xs:include schemaLocation="a.xsd"/>
                 <xs:import namespace="urn:b"/>
                 <xs:element name="root"/>
                 <xs:annotation/>
                 <xs:simpleType name="code"><xs:restriction base="xs:string"/></xs:simpleType>
               </xs:schema>"#
        );
        let Record::Schema(schema) = parse_context(Context::Schema, &xml).unwrap() else {
            panic!("expected schema");
        };
        assert_eq!(schema.composition.len(), 3);
        assert_eq!(schema.definitions.len(), 3);
        assert_eq!(schema.target_namespace(), Some("urn:t"));
        assert!(schema.element_form_default_or_default().is_qualified());
        assert!(!schema.attribute_form_default_or_default().is_qualified());
        assert!(schema.element("root").is_some());
        assert!(schema.simple_type("code").is_some());
        assert_eq!(schema.elements().count(), 1);
        assert_eq!(schema.complex_types().count(), 0);
    }

    #[test]
    fn test_include_after_definition_is_unexpected() {
        let xml = format!(
            r#"<xs:schema {XS}><xs:element name="a"/><xs:include schemaLocation="b.xsd"/></xs:schema>"#
        );
        let err = parse_context(Context::Schema, &xml).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContent { context: Context::Schema, ref found }
                if found == "element 'xs:include'"
        ));
    }

    #[test]
    fn test_include_requires_schema_location() {
        let xml = format!(r#"<xs:include {XS}/>"#);
        let err = parse_context(Context::Include, &xml).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { context: Context::Include, attribute: "schemaLocation" }
        ));
    }

    #[test]
    fn test_redefine_items() {
        let xml = format!(
            r#"<xs:redefine {XS} schemaLocation="base.xsd">
                 <xs:annotation/>
                 <xs:group name="g"><xs:sequence/></xs:group>
                 <xs:attributeGroup name="ag"/>
               </xs:redefine>"#
        );
        let Record::Redefine(redefine) = parse_context(Context::Redefine, &xml).unwrap() else {
            panic!("expected redefine");
        };
        assert_eq!(redefine.attributes.schema_location.as_deref(), Some("base.xsd"));
        assert_eq!(redefine.items.len(), 3);
        assert!(matches!(redefine.items[1], RedefineItem::Group(_)));
    }

    #[test]
    fn test_notation() {
        let xml = format!(r#"<xs:notation {XS} name="gif" public="image/gif" system="viewer.exe"/>"#);
        let Record::Notation(notation) = parse_context(Context::Notation, &xml).unwrap() else {
            panic!("expected notation");
        };
        assert_eq!(notation.attributes.name.as_deref(), Some("gif"));
        assert_eq!(notation.attributes.public.as_deref(), Some("image/gif"));
        assert_eq!(notation.attributes.system.as_deref(), Some("viewer.exe"));
        assert!(notation.annotation.is_none());
    }
}
