//! Context engine
//!
//! Walks the document tree top-down. For each element the engine validates
//! the attributes its context declares, matches the child elements against
//! the context's content model, descends into every child under the context
//! its particle names, and finally hands everything to the model builder
//! for that context. Open elements live on an explicit stack.
//!
//! The only public entry points parse a whole document. Parsing from an
//! arbitrary context is kept crate-internal for the tests.

use std::path::Path;

use tracing::{debug, trace};

use crate::documents::{Document, Element, Node};
use crate::error::{Error, Result};
use crate::grammar::{describe, is_foreign_namespace, match_content, Content, Context, Production};
use crate::limits::Limits;
use crate::model::{AttributeMap, Children, ForeignNode, Parsed, Record, Schema};
use crate::names::is_xml_whitespace;
use crate::namespaces::NamespaceScope;
use crate::XSD_NAMESPACE;

/// Parse a schema document with default limits
///
/// # Example
///
/// ```rust
/// let schema = xsd_grammar::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///          <xs:element name="note" type="xs:string"/>
///        </xs:schema>"#,
/// )?;
/// assert_eq!(schema.elements().count(), 1);
/// # Ok::<(), xsd_grammar::Error>(())
/// ```
pub fn parse(source: impl AsRef<[u8]>) -> Result<Schema> {
    parse_with_limits(source, &Limits::default())
}

/// Parse a schema document
pub fn parse_with_limits(source: impl AsRef<[u8]>, limits: &Limits) -> Result<Schema> {
    let source = source.as_ref();
    debug!(bytes = source.len(), "parsing schema document");
    let document = Document::parse_with_limits(source, limits)?;
    let schema = Engine { limits }.document(&document)?;
    debug!(
        components = schema.definitions.len(),
        target_namespace = schema.target_namespace().unwrap_or(""),
        "parsed schema document"
    );
    Ok(schema)
}

/// Read and parse a schema file with default limits
pub fn parse_file(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading schema file");
    let source = std::fs::read(path)?;
    parse(source)
}

/// Parse a document whose root is parsed under `context`
///
/// The root must be the XSD element `context` names.
#[cfg(test)]
pub(crate) fn parse_context(context: Context, source: &str) -> Result<Record> {
    let limits = Limits::default();
    let document = Document::parse_with_limits(source.as_bytes(), &limits)?;
    let root = document.root();
    if root.namespace() != Some(XSD_NAMESPACE) || context.element_name() != Some(root.local_name()) {
        return Err(Error::UnexpectedContent {
            context: Context::Document,
            found: describe(root),
        });
    }
    Engine { limits: &limits }.element(context, root, &NamespaceScope::new(), 1)
}

struct Engine<'l> {
    limits: &'l Limits,
}

/// An element whose attributes are validated and whose children are being
/// parsed
struct Open<'d> {
    context: Context,
    element: &'d Element,
    scope: NamespaceScope<'d>,
    attributes: AttributeMap,
    pending: std::vec::IntoIter<(Context, &'d Element)>,
    records: Vec<Record>,
    content: Vec<ForeignNode>,
}

impl Open<'_> {
    fn close(self) -> Result<Record> {
        Record::build(Parsed {
            context: self.context,
            namespace_declarations: self.element.namespace_declarations.clone(),
            attributes: self.attributes,
            children: Children::new(self.context, self.records),
            content: self.content,
        })
    }
}

impl Engine<'_> {
    fn document(&self, document: &Document) -> Result<Schema> {
        let root = document.root();
        if !root.qname.is(Some(XSD_NAMESPACE), "schema") {
            return Err(Error::UnexpectedContent {
                context: Context::Document,
                found: describe(root),
            });
        }
        match self.element(Context::Schema, root, &NamespaceScope::new(), 1)? {
            Record::Schema(schema) => Ok(*schema),
            other => Err(Error::UnexpectedContent {
                context: Context::Document,
                found: format!("{} record", other.context()),
            }),
        }
    }

    /// Parse `element` and its subtree under `context`
    ///
    /// The walk keeps the open ancestors on an explicit stack, so nesting
    /// depth is bounded by `Limits::max_depth` and not by the thread's stack.
    fn element<'d>(
        &self,
        context: Context,
        element: &'d Element,
        parent: &NamespaceScope<'d>,
        depth: usize,
    ) -> Result<Record> {
        let mut current = self.open(context, element, parent, depth)?;
        let mut ancestors: Vec<Open<'d>> = Vec::new();
        loop {
            if let Some((child_context, child)) = current.pending.next() {
                let child_depth = depth + ancestors.len() + 1;
                let opened = self.open(child_context, child, &current.scope, child_depth)?;
                ancestors.push(std::mem::replace(&mut current, opened));
                continue;
            }
            let record = current.close()?;
            match ancestors.pop() {
                Some(enclosing) => {
                    current = enclosing;
                    current.records.push(record);
                }
                None => return Ok(record),
            }
        }
    }

    fn open<'d>(
        &self,
        context: Context,
        element: &'d Element,
        parent: &NamespaceScope<'d>,
        depth: usize,
    ) -> Result<Open<'d>> {
        self.limits.check_depth(depth)?;
        self.limits.check_attributes(element.attributes.len())?;
        trace!(%context, element = %element.name, depth, "entering element");

        let scope = parent.enter(&element.namespace_declarations);
        let production = context.production();
        let attributes = attributes(context, production, element, &scope)?;

        if !production.permits_text() {
            reject_text(context, element)?;
        }
        let (pending, content) = match production.content {
            Content::Model(model) => {
                let children: Vec<&Element> = element.child_elements().collect();
                (match_content(context, model, &children)?, Vec::new())
            }
            Content::Any => {
                let content = element.children.iter().map(ForeignNode::from_node).collect();
                (Vec::new(), content)
            }
        };

        Ok(Open {
            context,
            element,
            scope,
            attributes,
            records: Vec::with_capacity(pending.len()),
            pending: pending.into_iter(),
            content,
        })
    }
}

/// Validate the attributes present on an element
///
/// Namespace declarations were split off by the front-end, so `scope`
/// already includes the element's own bindings when QNames are resolved.
fn attributes(
    context: Context,
    production: &Production,
    element: &Element,
    scope: &NamespaceScope<'_>,
) -> Result<AttributeMap> {
    let mut map = AttributeMap::default();
    for attribute in &element.attributes {
        let namespace = attribute.qname.namespace();
        let Some(spec) = production.attribute(namespace, &attribute.qname.local_name) else {
            if is_foreign_namespace(namespace) {
                trace!(%context, attribute = %attribute.name, "ignoring foreign attribute");
                continue;
            }
            return Err(Error::UnexpectedAttribute {
                context,
                attribute: attribute.name.clone(),
            });
        };
        let value = spec
            .kind
            .validate(&attribute.value, scope)
            .map_err(|reason| Error::InvalidAttributeValue {
                context,
                attribute: attribute.name.clone(),
                value: attribute.value.clone(),
                reason,
            })?;
        map.insert(spec.name, value);
    }

    if let Some(missing) = production
        .attributes
        .iter()
        .find(|spec| spec.required && !map.contains(spec.name))
    {
        return Err(Error::MissingAttribute {
            context,
            attribute: missing.name,
        });
    }
    Ok(map)
}

fn reject_text(context: Context, element: &Element) -> Result<()> {
    let stray = element.children.iter().any(|node| match node {
        Node::Text(text) => !text.chars().all(is_xml_whitespace),
        Node::Element(_) => false,
    });
    if stray {
        return Err(Error::UnexpectedContent {
            context,
            found: "character data".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::QName;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    #[test]
    fn test_parse_minimal_schema() {
        let schema = parse(format!(r#"<xs:schema {XS}/>"#)).unwrap();
        assert!(schema.definitions.is_empty());
        assert!(schema.composition.is_empty());
        assert_eq!(schema.namespace_declarations.get("xs"), Some(XSD_NAMESPACE));
    }

    #[test]
    fn test_root_must_be_schema() {
        let err = parse(format!(r#"<xs:element {XS} name="a"/>"#)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContent { context: Context::Document, ref found }
                if found == "element 'xs:element'"
        ));

        let err = parse(r#"<schema xmlns="urn:not-xsd"/>"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedContent { context: Context::Document, .. }));
    }

    #[test]
    fn test_malformed_source() {
        let err = parse(format!(r#"<xs:schema {XS}><xs:element name="a"></xs:schema>"#)).unwrap_err();
        assert!(matches!(err, Error::MalformedSource));
        assert_eq!(err.to_string(), "source is not a well-formed XML document");
        assert!(matches!(parse(""), Err(Error::MalformedSource)));
    }

    #[test]
    fn test_foreign_attributes_are_ignored() {
        let schema = parse(format!(
            r#"<xs:schema {XS} xmlns:ext="urn:ext" ext:owner="team">
                 <xs:element name="a" ext:hint="x"/>
               </xs:schema>"#
        ))
        .unwrap();
        assert_eq!(schema.elements().count(), 1);
    }

    #[test]
    fn test_unknown_attributes_are_rejected() {
        let err = parse(format!(r#"<xs:schema {XS} colour="red"/>"#)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedAttribute { context: Context::Schema, ref attribute } if attribute == "colour"
        ));

        let err = parse(format!(r#"<xs:schema {XS} xs:version="1"/>"#)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedAttribute { context: Context::Schema, ref attribute } if attribute == "xs:version"
        ));
    }

    #[test]
    fn test_invalid_value_names_attribute_and_value() {
        let err = parse(format!(
            r#"<xs:schema {XS}><xs:complexType name="t" mixed="yes"/></xs:schema>"#
        ))
        .unwrap_err();
        match err {
            Error::InvalidAttributeValue {
                context,
                attribute,
                value,
                ..
            } => {
                assert_eq!(context, Context::TopLevelComplexType);
                assert_eq!(attribute, "mixed");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_attribute() {
        let err = parse(format!(r#"<xs:schema {XS}><xs:element type="xs:int"/></xs:schema>"#)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { context: Context::TopLevelElement, attribute: "name" }
        ));
    }

    #[test]
    fn test_character_data_is_rejected() {
        let err = parse(format!(r#"<xs:schema {XS}>text</xs:schema>"#)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContent { context: Context::Schema, ref found } if found == "character data"
        ));
        assert!(parse(format!("<xs:schema {XS}>\n\t <!-- note --> \n</xs:schema>")).is_ok());
    }

    #[test]
    fn test_foreign_elements_are_rejected_outside_annotations() {
        let err = parse(format!(
            r#"<xs:schema {XS} xmlns:ext="urn:ext"><ext:extra/></xs:schema>"#
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContent { context: Context::Schema, ref found } if found == "element 'ext:extra'"
        ));
    }

    #[test]
    fn test_qnames_resolve_against_ancestor_scope() {
        let schema = parse(format!(
            r#"<xs:schema {XS} xmlns:t="urn:outer" xmlns="urn:default">
                 <xs:element name="a" type="t:A"/>
                 <xs:element name="b" type="B"/>
                 <xs:element name="c" xmlns:t="urn:inner" type="t:C"/>
               </xs:schema>"#
        ))
        .unwrap();
        let types: Vec<Option<QName>> = schema
            .elements()
            .map(|e| e.attributes.type_name.clone())
            .collect();
        assert_eq!(
            types,
            vec![
                Some(QName::namespaced("urn:outer", "A")),
                Some(QName::namespaced("urn:default", "B")),
                Some(QName::namespaced("urn:inner", "C")),
            ]
        );
        let c = schema.element("c").unwrap();
        assert_eq!(c.namespace_declarations.get("t"), Some("urn:inner"));
        assert_eq!(c.namespace_declarations.len(), 1);
    }

    #[test]
    fn test_unbound_qname_prefix() {
        let err = parse(format!(r#"<xs:schema {XS}><xs:element name="a" type="nope:A"/></xs:schema>"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAttributeValue { context: Context::TopLevelElement, ref attribute, .. }
                if attribute == "type"
        ));
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let nested = format!(
            r#"<xs:schema {XS}><xs:complexType name="t"><xs:sequence><xs:element name="a"/></xs:sequence></xs:complexType></xs:schema>"#
        );
        assert!(matches!(
            parse_with_limits(&nested, &limits),
            Err(Error::LimitExceeded(_))
        ));
        assert!(parse_with_limits(&nested, &Limits::default()).is_ok());
    }

    #[test]
    fn test_attribute_limit() {
        let limits = Limits {
            max_attributes: 2,
            ..Limits::default()
        };
        let source = format!(r#"<xs:schema {XS} id="s" version="1" targetNamespace="urn:t"/>"#);
        assert!(matches!(
            parse_with_limits(&source, &limits),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<?xml version="1.0"?><xs:schema {XS} targetNamespace="urn:file"/>"#
        )
        .unwrap();
        let schema = parse_file(file.path()).unwrap();
        assert_eq!(schema.target_namespace(), Some("urn:file"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(parse_file(missing), Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_context_checks_root() {
        let xml = format!(r#"<xs:sequence {XS}/>"#);
        assert!(matches!(
            parse_context(Context::Choice, &xml),
            Err(Error::UnexpectedContent { context: Context::Document, .. })
        ));
        assert!(matches!(
            parse_context(Context::Sequence, &xml),
            Ok(Record::Sequence(_))
        ));
    }
}
