//! `annotation`, `appinfo` and `documentation` records

use serde::Serialize;

use super::{Parsed, Record};
use crate::documents::{Element, Node};
use crate::error::Result;
use crate::namespaces::{NamespaceDeclarations, QName};

/// `annotation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: AnnotationAttributes,
    /// `appinfo` and `documentation` children in document order
    pub items: Vec<AnnotationItem>,
}

/// Attributes of `annotation`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationAttributes {
    /// `id`
    pub id: Option<String>,
}

/// Child of an annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationItem {
    /// Machine-readable content
    Appinfo(Appinfo),
    /// Human-readable content
    Documentation(Documentation),
}

/// `appinfo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appinfo {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: AppinfoAttributes,
    /// Concatenated character data directly inside the element
    pub text_content: String,
    /// Full mixed content in document order
    pub content: Vec<ForeignNode>,
}

/// Attributes of `appinfo`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppinfoAttributes {
    /// `source`
    pub source: Option<String>,
}

/// `documentation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Documentation {
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Attributes
    pub attributes: DocumentationAttributes,
    /// Concatenated character data directly inside the element
    pub text_content: String,
    /// Full mixed content in document order
    pub content: Vec<ForeignNode>,
}

/// Attributes of `documentation`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentationAttributes {
    /// `source`
    pub source: Option<String>,
    /// `xml:lang`
    pub lang: Option<String>,
}

/// Node of free-form annotation content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ForeignNode {
    /// Element in any namespace
    Element(ForeignElement),
    /// Character data
    Text(String),
}

/// Element inside `appinfo` or `documentation`, kept as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignElement {
    /// Resolved element name
    pub name: QName,
    /// Resolved attribute names and raw values
    pub attributes: Vec<(QName, String)>,
    /// Namespace declarations written on the element
    pub namespace_declarations: NamespaceDeclarations,
    /// Child nodes in document order
    pub children: Vec<ForeignNode>,
}

impl ForeignNode {
    pub(crate) fn from_node(node: &Node) -> Self {
        match node {
            Node::Element(e) => ForeignNode::Element(ForeignElement::from_element(e)),
            Node::Text(t) => ForeignNode::Text(t.clone()),
        }
    }
}

impl ForeignElement {
    /// Copy a front-end subtree without recursing on its depth
    pub(crate) fn from_element(element: &Element) -> Self {
        let mut current = Copying::new(element);
        let mut ancestors: Vec<Copying<'_>> = Vec::new();
        loop {
            match current.nodes.next() {
                Some(Node::Text(t)) => current.children.push(ForeignNode::Text(t.clone())),
                Some(Node::Element(e)) => {
                    ancestors.push(std::mem::replace(&mut current, Copying::new(e)));
                }
                None => {
                    let copied = current.finish();
                    match ancestors.pop() {
                        Some(parent) => {
                            current = parent;
                            current.children.push(ForeignNode::Element(copied));
                        }
                        None => return copied,
                    }
                }
            }
        }
    }

    /// Concatenated text of the whole subtree
    pub fn text(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.children.iter()];
        while let Some(nodes) = stack.last_mut() {
            match nodes.next() {
                Some(ForeignNode::Text(t)) => text.push_str(t),
                Some(ForeignNode::Element(e)) => stack.push(e.children.iter()),
                None => {
                    stack.pop();
                }
            }
        }
        text
    }
}

/// A foreign element whose children are still being copied
struct Copying<'e> {
    element: &'e Element,
    nodes: std::slice::Iter<'e, Node>,
    children: Vec<ForeignNode>,
}

impl<'e> Copying<'e> {
    fn new(element: &'e Element) -> Self {
        Self {
            element,
            nodes: element.children.iter(),
            children: Vec::with_capacity(element.children.len()),
        }
    }

    fn finish(self) -> ForeignElement {
        ForeignElement {
            name: self.element.qname.clone(),
            attributes: self
                .element
                .attributes
                .iter()
                .map(|a| (a.qname.clone(), a.value.clone()))
                .collect(),
            namespace_declarations: self.element.namespace_declarations.clone(),
            children: self.children,
        }
    }
}

fn direct_text(nodes: &[ForeignNode]) -> String {
    nodes
        .iter()
        .filter_map(|n| match n {
            ForeignNode::Text(t) => Some(t.as_str()),
            ForeignNode::Element(_) => None,
        })
        .collect()
}

impl Annotation {
    pub(crate) fn build(parsed: Parsed) -> Result<Self> {
        let Parsed {
            namespace_declarations,
            mut attributes,
            children,
            ..
        } = parsed;

        let items = children.remaining(|record| match record {
            Record::Appinfo(a) => Ok(AnnotationItem::Appinfo(a)),
            Record::Documentation(d) => Ok(AnnotationItem::Documentation(d)),
            other => Err(other),
        })?;

        Ok(Self {
            namespace_declarations,
            attributes: AnnotationAttributes {
                id: attributes.take_string("id"),
            },
            items,
        })
    }

    /// Text of every `documentation` child, in order
    pub fn documentation(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            AnnotationItem::Documentation(d) => Some(d.text_content.as_str()),
            AnnotationItem::Appinfo(_) => None,
        })
    }
}

impl Appinfo {
    pub(crate) fn build(mut parsed: Parsed) -> Self {
        Self {
            attributes: AppinfoAttributes {
                source: parsed.attributes.take_string("source"),
            },
            text_content: direct_text(&parsed.content),
            content: parsed.content,
            namespace_declarations: parsed.namespace_declarations,
        }
    }
}

impl Documentation {
    pub(crate) fn build(mut parsed: Parsed) -> Self {
        Self {
            attributes: DocumentationAttributes {
                source: parsed.attributes.take_string("source"),
                lang: parsed.attributes.take_string("lang"),
            },
            text_content: direct_text(&parsed.content),
            content: parsed.content,
            namespace_declarations: parsed.namespace_declarations,
        }
    }
}
