//! XML namespace handling
//!
//! This module provides qualified names, the per-element record of
//! namespace declarations, and the scope chain used to resolve QName-valued
//! attributes against the bindings in force at a given element.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::LexicalError;
use crate::names::{collapse_whitespace, is_valid_qname, split_qname};
use crate::XML_NAMESPACE;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Namespace URI as a string slice
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check whether this name is `local_name` in namespace `namespace`
    pub fn is(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace bindings physically declared on one element
///
/// The empty prefix is the default namespace. Insertion order follows the
/// source but carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamespaceDeclarations(IndexMap<Prefix, NamespaceUri>);

impl NamespaceDeclarations {
    /// Create an empty set of declarations
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding; a repeated prefix keeps its first position
    pub fn declare(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.0.insert(prefix.into(), namespace.into());
    }

    /// Get the namespace bound to a prefix (`""` for the default namespace)
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace declared here
    pub fn default_namespace(&self) -> Option<&str> {
        self.get("")
    }

    /// Iterate over (prefix, namespace) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no namespace is declared here
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>, N: Into<String>> FromIterator<(P, N)> for NamespaceDeclarations {
    fn from_iter<I: IntoIterator<Item = (P, N)>>(iter: I) -> Self {
        let mut decls = Self::new();
        for (prefix, namespace) in iter {
            decls.declare(prefix, namespace);
        }
        decls
    }
}

/// Chain of in-scope namespace bindings
///
/// Each frame borrows the declarations of one element and shares the frame
/// of its parent, so descending is a constant-time copy and the parent's
/// view is never disturbed. Scopes are owned values and can be kept on an
/// explicit stack while a tree is walked.
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope<'a> {
    top: Option<Rc<ScopeFrame<'a>>>,
}

#[derive(Debug)]
struct ScopeFrame<'a> {
    declarations: &'a NamespaceDeclarations,
    parent: Option<Rc<ScopeFrame<'a>>>,
}

impl<'a> NamespaceScope<'a> {
    /// Create an empty root scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay the declarations of a child element on this scope
    pub fn enter(&self, declarations: &'a NamespaceDeclarations) -> NamespaceScope<'a> {
        NamespaceScope {
            top: Some(Rc::new(ScopeFrame {
                declarations,
                parent: self.top.clone(),
            })),
        }
    }

    /// Get the namespace bound to a prefix (`""` for the default namespace)
    ///
    /// The `xml` prefix is always bound.
    pub fn lookup(&self, prefix: &str) -> Option<&'a str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        let mut frame = self.top.as_deref();
        while let Some(scope) = frame {
            if let Some(namespace) = scope.declarations.get(prefix) {
                return Some(namespace);
            }
            frame = scope.parent.as_deref();
        }
        None
    }

    /// Get the default namespace, treating `xmlns=""` as undeclared
    pub fn default_namespace(&self) -> Option<&'a str> {
        self.lookup("").filter(|ns| !ns.is_empty())
    }

    /// Resolve a lexical QName attribute value
    ///
    /// A prefixed name must use a prefix in scope. An unprefixed name takes
    /// the default namespace when one is declared and no namespace otherwise.
    pub fn resolve(&self, value: &str) -> std::result::Result<QName, LexicalError> {
        let value = collapse_whitespace(value);
        if !is_valid_qname(&value) {
            return Err(LexicalError::new("a QName"));
        }
        match split_qname(&value) {
            (Some(prefix), local) => {
                let namespace = self
                    .lookup(prefix)
                    .filter(|ns| !ns.is_empty())
                    .ok_or(LexicalError::new("a QName with a declared prefix"))?;
                Ok(QName::namespaced(namespace, local))
            }
            (None, local) => Ok(QName::new(self.default_namespace(), local)),
        }
    }
}
