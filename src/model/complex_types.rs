//! Complex type definitions and their content derivations

use serde::Serialize;

use super::{
    Annotation, AttributeDeclarations, AttributeMap, Children, Facet, LocalSimpleType, Parsed, Record,
    TypeDefParticle,
};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::DerivationSet;

/// Named `complexType`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevelComplexType {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: TopLevelComplexTypeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Content definition
    pub content: ComplexTypeContent,
}

/// Attributes of a named `complexType`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopLevelComplexTypeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `mixed`
    pub mixed: Option<bool>,
    /// `abstract`
    #[serde(rename = "abstract")]
    pub abstract_type: Option<bool>,
    /// `final`
    #[serde(rename = "final")]
    pub final_derivation: Option<DerivationSet>,
    /// `block`
    pub block: Option<DerivationSet>,
}

/// Anonymous `complexType`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalComplexType {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: LocalComplexTypeAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Content definition
    pub content: ComplexTypeContent,
}

/// Attributes of an anonymous `complexType`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalComplexTypeAttributes {
    /// `id`
    pub id: Option<String>,
    /// `mixed`
    pub mixed: Option<bool>,
}

/// Content of a complex type; the three forms are exclusive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplexTypeContent {
    /// `simpleContent`
    Simple(SimpleContent),
    /// `complexContent`
    Complex(ComplexContent),
    /// Shorthand for a restriction of `anyType`
    Implicit(ImplicitContent),
}

/// Particle and attribute uses written directly in a `complexType`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImplicitContent {
    /// Model group or group reference
    pub particle: Option<TypeDefParticle>,
    /// Attribute uses and wildcard
    pub attribute_declarations: AttributeDeclarations,
}

impl ComplexTypeContent {
    fn take(children: &mut Children) -> Self {
        if let Some(simple) = children.next_if(|record| match record {
            Record::SimpleContent(s) => Ok(s),
            other => Err(other),
        }) {
            return ComplexTypeContent::Simple(simple);
        }
        if let Some(complex) = children.next_if(|record| match record {
            Record::ComplexContent(c) => Ok(c),
            other => Err(other),
        }) {
            return ComplexTypeContent::Complex(complex);
        }
        ComplexTypeContent::Implicit(ImplicitContent {
            particle: TypeDefParticle::take(children),
            attribute_declarations: AttributeDeclarations::take(children),
        })
    }
}

impl TopLevelComplexType {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let content = ComplexTypeContent::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: TopLevelComplexTypeAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                mixed: parsed.attributes.take_boolean("mixed"),
                abstract_type: parsed.attributes.take_boolean("abstract"),
                final_derivation: parsed.attributes.take_derivations("final"),
                block: parsed.attributes.take_derivations("block"),
            },
            annotation,
            content,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `abstract`, defaulting to false
    pub fn is_abstract(&self) -> bool {
        self.attributes.abstract_type.unwrap_or(false)
    }

    /// Effective `mixed`: the `complexContent` flag wins when present
    pub fn is_mixed(&self) -> bool {
        effective_mixed(self.attributes.mixed, &self.content)
    }
}

impl LocalComplexType {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let content = ComplexTypeContent::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: LocalComplexTypeAttributes {
                id: parsed.attributes.take_string("id"),
                mixed: parsed.attributes.take_boolean("mixed"),
            },
            annotation,
            content,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// Effective `mixed`: the `complexContent` flag wins when present
    pub fn is_mixed(&self) -> bool {
        effective_mixed(self.attributes.mixed, &self.content)
    }
}

fn effective_mixed(own: Option<bool>, content: &ComplexTypeContent) -> bool {
    match content {
        ComplexTypeContent::Complex(c) => c.attributes.mixed.or(own).unwrap_or(false),
        _ => own.unwrap_or(false),
    }
}

/// `simpleContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleContent {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: IdAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Restriction or extension
    pub derivation: SimpleContentDerivation,
}

/// Attribute set of productions that only accept `id`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdAttributes {
    /// `id`
    pub id: Option<String>,
}

/// Derivation inside `simpleContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SimpleContentDerivation {
    /// `restriction`
    Restriction(SimpleContentRestriction),
    /// `extension`
    Extension(SimpleContentExtension),
}

impl SimpleContent {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let derivation =
            parsed
                .children
                .required("one of 'restriction', 'extension'", |record| match record {
                    Record::SimpleContentRestriction(r) => Ok(SimpleContentDerivation::Restriction(r)),
                    Record::SimpleContentExtension(e) => Ok(SimpleContentDerivation::Extension(e)),
                    other => Err(other),
                })?;
        parsed.children.finish()?;
        Ok(Self {
            attributes: IdAttributes {
                id: parsed.attributes.take_string("id"),
            },
            annotation,
            derivation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// Base type of the derivation
    pub fn base(&self) -> Option<&QName> {
        match &self.derivation {
            SimpleContentDerivation::Restriction(r) => r.attributes.base.as_ref(),
            SimpleContentDerivation::Extension(e) => e.attributes.base.as_ref(),
        }
    }
}

/// Attributes of the content derivations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivationAttributes {
    /// `id`
    pub id: Option<String>,
    /// `base`
    pub base: Option<QName>,
}

impl DerivationAttributes {
    fn take(attributes: &mut AttributeMap) -> Self {
        Self {
            id: attributes.take_string("id"),
            base: attributes.take_qname("base"),
        }
    }
}

/// `restriction` inside `simpleContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleContentRestriction {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: DerivationAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Anonymous base type
    pub simple_type: Option<LocalSimpleType>,
    /// Facets in document order
    pub facets: Vec<Facet>,
    /// Attribute uses and wildcard
    pub attribute_declarations: AttributeDeclarations,
}

impl SimpleContentRestriction {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let simple_type = parsed.children.local_simple_type();
        let facets = parsed.children.repeated(|record| match record {
            Record::Facet(f) => Ok(f),
            other => Err(other),
        });
        let attribute_declarations = AttributeDeclarations::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: DerivationAttributes::take(&mut parsed.attributes),
            annotation,
            simple_type,
            facets,
            attribute_declarations,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `extension` inside `simpleContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleContentExtension {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: DerivationAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Attribute uses and wildcard
    pub attribute_declarations: AttributeDeclarations,
}

impl SimpleContentExtension {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let attribute_declarations = AttributeDeclarations::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: DerivationAttributes::take(&mut parsed.attributes),
            annotation,
            attribute_declarations,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `complexContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexContent {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: ComplexContentAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Restriction or extension
    pub derivation: ComplexContentDerivation,
}

/// Attributes of `complexContent`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplexContentAttributes {
    /// `id`
    pub id: Option<String>,
    /// `mixed`
    pub mixed: Option<bool>,
}

/// Derivation inside `complexContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplexContentDerivation {
    /// `restriction`
    Restriction(ComplexDerivation),
    /// `extension`
    Extension(ComplexDerivation),
}

impl ComplexContentDerivation {
    /// The derivation body, whichever kind it is
    pub fn body(&self) -> &ComplexDerivation {
        match self {
            ComplexContentDerivation::Restriction(d) | ComplexContentDerivation::Extension(d) => d,
        }
    }

    /// Whether this is an extension
    pub fn is_extension(&self) -> bool {
        matches!(self, ComplexContentDerivation::Extension(_))
    }
}

impl ComplexContent {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let derivation =
            parsed
                .children
                .required("one of 'restriction', 'extension'", |record| match record {
                    Record::ComplexContentRestriction(r) => Ok(ComplexContentDerivation::Restriction(r)),
                    Record::ComplexContentExtension(e) => Ok(ComplexContentDerivation::Extension(e)),
                    other => Err(other),
                })?;
        parsed.children.finish()?;
        Ok(Self {
            attributes: ComplexContentAttributes {
                id: parsed.attributes.take_string("id"),
                mixed: parsed.attributes.take_boolean("mixed"),
            },
            annotation,
            derivation,
            namespace_declarations: parsed.namespace_declarations,
        })
    }

    /// `mixed`, defaulting to false
    pub fn is_mixed(&self) -> bool {
        self.attributes.mixed.unwrap_or(false)
    }
}

/// `restriction` or `extension` inside `complexContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexDerivation {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: DerivationAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// Model group or group reference
    pub particle: Option<TypeDefParticle>,
    /// Attribute uses and wildcard
    pub attribute_declarations: AttributeDeclarations,
}

impl ComplexDerivation {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        let particle = TypeDefParticle::take(&mut parsed.children);
        let attribute_declarations = AttributeDeclarations::take(&mut parsed.children);
        parsed.children.finish()?;
        Ok(Self {
            attributes: DerivationAttributes::take(&mut parsed.attributes),
            annotation,
            particle,
            attribute_declarations,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Context;
    use crate::parsing::parse_context;
    use crate::validators::Derivation;
    use crate::{Error, XSD_NAMESPACE};

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn top_level(xml: &str) -> Result<TopLevelComplexType> {
        parse_context(Context::TopLevelComplexType, xml).map(|record| match record {
            Record::TopLevelComplexType(t) => t,
            other => panic!("unexpected record {other:?}"),
        })
    }

    #[test]
    fn test_implicit_content() {
        let xml = format!(
            r##"<xs:complexType {XS} name="person" abstract="true" block="#all">
                 <xs:sequence>
                   <xs:element name="name" type="xs:string"/>
                 </xs:sequence>
                 <xs:attribute name="id" type="xs:ID" use="required"/>
                 <xs:anyAttribute/>
               </xs:complexType>"##
        );
        let complex_type = top_level(&xml).unwrap();
        assert!(complex_type.is_abstract());
        assert!(!complex_type.is_mixed());
        let block = complex_type.attributes.block.unwrap();
        assert!(block.contains(Derivation::Extension) && block.contains(Derivation::Restriction));

        let ComplexTypeContent::Implicit(content) = &complex_type.content else {
            panic!("expected implicit content");
        };
        assert!(matches!(content.particle, Some(TypeDefParticle::Sequence(_))));
        assert_eq!(content.attribute_declarations.attributes.len(), 1);
        assert!(content.attribute_declarations.any_attribute.is_some());
    }

    #[test]
    fn test_empty_complex_type() {
        let xml = format!(r#"<xs:complexType {XS} name="empty"/>"#);
        let complex_type = top_level(&xml).unwrap();
        assert_eq!(
            complex_type.content,
            ComplexTypeContent::Implicit(ImplicitContent::default())
        );
    }

    #[test]
    fn test_simple_content_extension() {
        let xml = format!(
            r#"<xs:complexType {XS} name="price">
                 <xs:simpleContent>
                   <xs:extension base="xs:decimal">
                     <xs:attribute name="currency" type="xs:string"/>
                   </xs:extension>
                 </xs:simpleContent>
               </xs:complexType>"#
        );
        let complex_type = top_level(&xml).unwrap();
        let ComplexTypeContent::Simple(simple) = &complex_type.content else {
            panic!("expected simple content");
        };
        assert_eq!(simple.base(), Some(&QName::namespaced(XSD_NAMESPACE, "decimal")));
    }

    #[test]
    fn test_simple_content_requires_a_derivation() {
        let xml = format!(r#"<xs:simpleContent {XS}><xs:annotation/></xs:simpleContent>"#);
        assert!(matches!(
            parse_context(Context::SimpleContent, &xml).unwrap_err(),
            Error::MissingContent { context: Context::SimpleContent, .. }
        ));
    }

    #[test]
    fn test_complex_content_rejects_second_derivation() {
        let xml = format!(
            r#"<xs:complexContent {XS}>
                 <xs:restriction base="xs:anyType"/>
                 <xs:extension base="xs:anyType"/>
               </xs:complexContent>"#
        );
        assert!(matches!(
            parse_context(Context::ComplexContent, &xml).unwrap_err(),
            Error::UnexpectedContent { context: Context::ComplexContent, .. }
        ));
    }

    #[test]
    fn test_complex_content_mixed_overrides_type() {
        let xml = format!(
            r#"<xs:complexType {XS} name="t" mixed="false">
                 <xs:complexContent mixed="true">
                   <xs:extension base="base"><xs:sequence/></xs:extension>
                 </xs:complexContent>
               </xs:complexType>"#
        );
        let complex_type = top_level(&xml).unwrap();
        assert!(complex_type.is_mixed());
        let ComplexTypeContent::Complex(content) = &complex_type.content else {
            panic!("expected complex content");
        };
        assert!(content.derivation.is_extension());
        assert_eq!(content.derivation.body().attributes.base, Some(QName::local("base")));
    }

    #[test]
    fn test_derivation_requires_base() {
        let xml = format!(r#"<xs:restriction {XS}/>"#);
        assert!(matches!(
            parse_context(Context::ComplexContentRestriction, &xml).unwrap_err(),
            Error::MissingAttribute { context: Context::ComplexContentRestriction, attribute: "base" }
        ));
    }

    #[test]
    fn test_final_rejects_substitution() {
        let xml = format!(r#"<xs:complexType {XS} name="t" final="substitution"/>"#);
        assert!(matches!(
            top_level(&xml).unwrap_err(),
            Error::InvalidAttributeValue { ref attribute, .. } if attribute == "final"
        ));
    }

    #[test]
    fn test_local_complex_type_rejects_name() {
        let xml = format!(r#"<xs:complexType {XS} name="t"/>"#);
        assert!(matches!(
            parse_context(Context::LocalComplexType, &xml).unwrap_err(),
            Error::UnexpectedAttribute { context: Context::LocalComplexType, .. }
        ));
    }
}
