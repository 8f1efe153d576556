//! Identity constraints: `unique`, `key`, `keyref`

use serde::Serialize;

use super::{Annotation, Children, Parsed, Record};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};

/// Identity constraint of an element declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityConstraint {
    /// `unique`
    Unique(IdentityDefinition),
    /// `key`
    Key(IdentityDefinition),
    /// `keyref`
    Keyref(Keyref),
}

impl IdentityConstraint {
    /// `name` of the constraint
    pub fn name(&self) -> Option<&str> {
        match self {
            IdentityConstraint::Unique(d) | IdentityConstraint::Key(d) => d.attributes.name.as_deref(),
            IdentityConstraint::Keyref(k) => k.attributes.name.as_deref(),
        }
    }
}

/// Attributes of `unique` and `key`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
}

/// Selector and fields shared by every identity constraint
#[derive(Debug)]
struct Selection {
    annotation: Option<Annotation>,
    selector: XPathSelection,
    fields: Vec<XPathSelection>,
}

impl Selection {
    fn take(mut children: Children) -> Result<Self> {
        let annotation = children.annotation();
        let selector = children.required("element 'selector'", |record| match record {
            Record::Selector(s) => Ok(s),
            other => Err(other),
        })?;
        let fields = children.remaining(|record| match record {
            Record::Field(f) => Ok(f),
            other => Err(other),
        })?;
        Ok(Self {
            annotation,
            selector,
            fields,
        })
    }
}

/// `unique` or `key`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityDefinition {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: IdentityAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// `selector`
    pub selector: XPathSelection,
    /// One or more `field`
    pub fields: Vec<XPathSelection>,
}

impl IdentityDefinition {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let selection = Selection::take(parsed.children)?;
        Ok(Self {
            attributes: IdentityAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
            },
            annotation: selection.annotation,
            selector: selection.selector,
            fields: selection.fields,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `keyref`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyref {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: KeyrefAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
    /// `selector`
    pub selector: XPathSelection,
    /// One or more `field`
    pub fields: Vec<XPathSelection>,
}

/// Attributes of `keyref`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyrefAttributes {
    /// `id`
    pub id: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `refer`
    pub refer: Option<QName>,
}

impl Keyref {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let selection = Selection::take(parsed.children)?;
        Ok(Self {
            attributes: KeyrefAttributes {
                id: parsed.attributes.take_string("id"),
                name: parsed.attributes.take_string("name"),
                refer: parsed.attributes.take_qname("refer"),
            },
            annotation: selection.annotation,
            selector: selection.selector,
            fields: selection.fields,
            namespace_declarations: parsed.namespace_declarations,
        })
    }
}

/// `selector` or `field`
///
/// The XPath subset is not checked; `xpath` is kept as a collapsed token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XPathSelection {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: XPathAttributes,
    /// Optional annotation
    pub annotation: Option<Annotation>,
}

/// Attributes of `selector` and `field`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XPathAttributes {
    /// `id`
    pub id: Option<String>,
    /// `xpath`
    pub xpath: Option<String>,
}

impl XPathSelection {
    pub(crate) fn build(mut parsed: Parsed) -> Result<Self> {
        let annotation = parsed.children.annotation();
        parsed.children.finish()?;
        Ok(Self {
            attributes: XPathAttributes {
                id: parsed.attributes.take_string("id"),
                xpath: parsed.attributes.take_string("xpath"),
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
    fn test_key_with_fields() {
        let xml = format!(
            r#"<xs:key {XS} name="pk">
                 <xs:annotation/>
                 <xs:selector xpath=" .//item "/>
                 <xs:field xpath="@id"/>
                 <xs:field xpath="@version"/>
               </xs:key>"#
        );
        let Record::Key(key) = parse_context(Context::Key, &xml).unwrap() else {
            panic!("expected key");
        };
        assert_eq!(key.attributes.name.as_deref(), Some("pk"));
        assert!(key.annotation.is_some());
        assert_eq!(key.selector.attributes.xpath.as_deref(), Some(".//item"));
        assert_eq!(key.fields.len(), 2);
    }

    #[test]
    fn test_keyref_refer_resolves() {
        let xml = format!(
            r#"<xs:keyref {XS} xmlns:t="urn:t" name="fk" refer="t:pk">
                 <xs:selector xpath="ref"/><xs:field xpath="@to"/>
               </xs:keyref>"#
        );
        let Record::Keyref(keyref) = parse_context(Context::Keyref, &xml).unwrap() else {
            panic!("expected keyref");
        };
        assert_eq!(keyref.attributes.refer, Some(QName::namespaced("urn:t", "pk")));
        assert_eq!(IdentityConstraint::Keyref(keyref).name(), Some("fk"));
    }

    #[test]
    fn test_keyref_requires_refer() {
        let xml = format!(r#"<xs:keyref {XS} name="fk"><xs:selector xpath="a"/><xs:field xpath="b"/></xs:keyref>"#);
        assert!(matches!(
            parse_context(Context::Keyref, &xml).unwrap_err(),
            Error::MissingAttribute { context: Context::Keyref, attribute: "refer" }
        ));
    }

    #[test]
    fn test_unique_requires_field() {
        let xml = format!(r#"<xs:unique {XS} name="u"><xs:selector xpath="a"/></xs:unique>"#);
        assert!(matches!(
            parse_context(Context::Unique, &xml).unwrap_err(),
            Error::MissingContent { context: Context::Unique, ref expected } if expected == "element 'field'"
        ));
    }

    #[test]
    fn test_field_before_selector_is_rejected() {
        let xml = format!(r#"<xs:unique {XS} name="u"><xs:field xpath="b"/><xs:selector xpath="a"/></xs:unique>"#);
        assert!(matches!(
            parse_context(Context::Unique, &xml).unwrap_err(),
            Error::UnexpectedContent { context: Context::Unique, ref found } if found == "element 'xs:field'"
        ));
    }
}
