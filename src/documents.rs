//! XML document front-end
//!
//! Turns source bytes into a namespace-aware node tree. Element and
//! attribute names are resolved while reading, each element keeps only the
//! namespace declarations written on it, and text is kept in document
//! order. Comments, processing instructions, the XML declaration and the
//! DOCTYPE are dropped.
//!
//! Any well-formedness failure surfaces as [`Error::MalformedSource`]; the
//! underlying reason is only logged. Element nesting is bounded by
//! [`Limits::max_depth`] while reading, so every later walk over the tree
//! sees a bounded depth.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::{is_valid_ncname, is_xml_whitespace, split_qname};
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::XML_NAMESPACE;

/// Attribute of an element, excluding namespace declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Resolved attribute name; unprefixed attributes have no namespace
    pub qname: QName,
    /// Attribute name as written in the source
    pub name: String,
    /// Attribute value with references expanded
    pub value: String,
}

/// Node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Character data (text and CDATA sections, merged when contiguous)
    Text(String),
}

impl Node {
    /// Get the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Resolved element name
    pub qname: QName,
    /// Element name as written in the source
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// Namespace declarations written on this element
    pub namespace_declarations: NamespaceDeclarations,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            qname: QName::local(""),
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            namespace_declarations: NamespaceDeclarations::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an unqualified attribute value by name
    #[cfg(test)]
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.qname.is(None, name))
            .map(|a| a.value.as_str())
    }

    /// Iterate over child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of the direct text children
    #[cfg(test)]
    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// XML Document representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

/// Why the front-end rejected a source
#[derive(Debug)]
enum Rejection {
    /// Not well-formed; the reason is logged, never returned
    Malformed(String),
    /// A configured bound was exceeded
    Limit(Error),
}

impl<E: std::error::Error> From<E> for Rejection {
    fn from(err: E) -> Self {
        Rejection::Malformed(err.to_string())
    }
}

fn malformed(reason: impl Into<String>) -> Rejection {
    Rejection::Malformed(reason.into())
}

impl Document {
    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_source_size(xml.len())?;
        let xml = xml.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(xml);
        Self::read(xml, limits).map_err(|rejection| match rejection {
            Rejection::Malformed(reason) => {
                tracing::debug!(%reason, "rejecting malformed XML source");
                Error::MalformedSource
            }
            Rejection::Limit(err) => err,
        })
    }

    fn read(xml: &[u8], limits: &Limits) -> std::result::Result<Self, Rejection> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(false);
        reader.check_end_names(true);

        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits
                        .check_depth(element_stack.len() + 1)
                        .map_err(Rejection::Limit)?;
                    let element = Self::open_element(&e, &element_stack, root.is_some())?;
                    element_stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    limits
                        .check_depth(element_stack.len() + 1)
                        .map_err(Rejection::Limit)?;
                    let element = Self::open_element(&e, &element_stack, root.is_some())?;
                    Self::close_element(element, &mut element_stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    let element = element_stack
                        .pop()
                        .ok_or_else(|| malformed("end tag without a start tag"))?;
                    Self::close_element(element, &mut element_stack, &mut root);
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape()?;
                    match element_stack.last_mut() {
                        Some(current) => current.push_text(&text),
                        None if text.chars().all(is_xml_whitespace) => {}
                        None => return Err(malformed("character data outside the root element")),
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8(e.into_inner().into_owned())?;
                    match element_stack.last_mut() {
                        Some(current) => current.push_text(&text),
                        None => return Err(malformed("CDATA section outside the root element")),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(malformed(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                // Comments, processing instructions, declaration, DOCTYPE
                Ok(_) => {}
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(malformed("unclosed element at end of input"));
        }
        let root = root.ok_or_else(|| malformed("no root element"))?;
        Ok(Document { root })
    }

    /// Build an element from a start tag, resolving names against the
    /// declarations of its ancestors and its own
    fn open_element(
        start: &BytesStart,
        ancestors: &[Element],
        root_seen: bool,
    ) -> std::result::Result<Element, Rejection> {
        if ancestors.is_empty() && root_seen {
            return Err(malformed("more than one root element"));
        }

        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut element = Element::new(name);
        let mut raw_attributes = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result?;
            let attr_name = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let raw_value = std::str::from_utf8(&attr.value)?;
            let attr_value = unescape(&normalize_attribute_value(raw_value))?.into_owned();

            if attr_name == "xmlns" {
                element.namespace_declarations.declare("", attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                if attr_value.is_empty() {
                    return Err(malformed(format!("empty binding for prefix '{prefix}'")));
                }
                if prefix == "xmlns" || (prefix == "xml" && attr_value != XML_NAMESPACE) {
                    return Err(malformed(format!("reserved prefix '{prefix}' rebound")));
                }
                element.namespace_declarations.declare(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        let lookup = |prefix: &str| -> Option<String> {
            if prefix == "xml" {
                return Some(XML_NAMESPACE.to_string());
            }
            std::iter::once(&element.namespace_declarations)
                .chain(ancestors.iter().rev().map(|a| &a.namespace_declarations))
                .find_map(|d| d.get(prefix))
                .filter(|ns| !ns.is_empty())
                .map(str::to_string)
        };

        let qname = match split_qname(&element.name) {
            (Some(prefix), local) => {
                let namespace = lookup(prefix)
                    .ok_or_else(|| malformed(format!("unbound element prefix '{prefix}'")))?;
                check_local_part(local)?;
                QName::namespaced(namespace, local)
            }
            (None, local) => QName::new(lookup(""), local),
        };

        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for (name, value) in raw_attributes {
            let qname = match split_qname(&name) {
                (Some(prefix), local) => {
                    let namespace = lookup(prefix)
                        .ok_or_else(|| malformed(format!("unbound attribute prefix '{prefix}'")))?;
                    check_local_part(local)?;
                    QName::namespaced(namespace, local)
                }
                (None, local) => QName::local(local),
            };
            if attributes.iter().any(|a: &Attribute| a.qname == qname) {
                return Err(malformed(format!("attribute '{qname}' repeated")));
            }
            attributes.push(Attribute { qname, name, value });
        }

        element.qname = qname;
        element.attributes = attributes;
        Ok(element)
    }

    fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element(element));
        } else {
            *root = Some(element);
        }
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Replace literal tabs and line breaks in an attribute value with spaces
///
/// Character references are expanded afterwards, so `&#10;` still yields a
/// line feed.
fn normalize_attribute_value(raw: &str) -> Cow<'_, str> {
    if raw.contains(['\t', '\n', '\r']) {
        Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(raw)
    }
}

fn check_local_part(local: &str) -> std::result::Result<(), Rejection> {
    if is_valid_ncname(local) {
        Ok(())
    } else {
        Err(malformed(format!("'{local}' is not a valid local name")))
    }
}
