//! XSD 1.0 grammar table
//!
//! Each [`Context`] is one production of the schema-for-schemas. Its
//! [`Production`] lists the attributes it accepts and the content model its
//! children must follow. The table is plain `'static` data; nothing in it
//! is mutated, so it is shared freely between parses on any thread.

mod content;
mod table;

use std::fmt;

use crate::validators::AttributeKind;
use crate::XSD_NAMESPACE;

pub(crate) use content::{describe, match_content};

/// Grammar production an element is parsed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The document itself, expecting a single `schema` element
    Document,
    /// `schema`
    Schema,
    /// `annotation`
    Annotation,
    /// `appinfo`
    Appinfo,
    /// `documentation`
    Documentation,
    /// `import`
    Import,
    /// `include`
    Include,
    /// `redefine`
    Redefine,
    /// `notation`
    Notation,
    /// Named `simpleType` at schema level
    TopLevelSimpleType,
    /// Anonymous `simpleType`
    LocalSimpleType,
    /// `restriction` inside `simpleType`
    SimpleTypeRestriction,
    /// `list`
    List,
    /// `union`
    Union,
    /// `minExclusive` facet
    MinExclusive,
    /// `minInclusive` facet
    MinInclusive,
    /// `maxExclusive` facet
    MaxExclusive,
    /// `maxInclusive` facet
    MaxInclusive,
    /// `totalDigits` facet
    TotalDigits,
    /// `fractionDigits` facet
    FractionDigits,
    /// `length` facet
    Length,
    /// `minLength` facet
    MinLength,
    /// `maxLength` facet
    MaxLength,
    /// `enumeration` facet
    Enumeration,
    /// `whiteSpace` facet
    WhiteSpace,
    /// `pattern` facet
    Pattern,
    /// Named `complexType` at schema level
    TopLevelComplexType,
    /// Anonymous `complexType`
    LocalComplexType,
    /// `simpleContent`
    SimpleContent,
    /// `restriction` inside `simpleContent`
    SimpleContentRestriction,
    /// `extension` inside `simpleContent`
    SimpleContentExtension,
    /// `complexContent`
    ComplexContent,
    /// `restriction` inside `complexContent`
    ComplexContentRestriction,
    /// `extension` inside `complexContent`
    ComplexContentExtension,
    /// Global `element` declaration
    TopLevelElement,
    /// `element` particle inside `sequence` or `choice`
    LocalElement,
    /// `element` particle inside `all`
    AllElement,
    /// Global `attribute` declaration
    TopLevelAttribute,
    /// Local `attribute` declaration or reference
    LocalAttribute,
    /// Named `attributeGroup` definition
    NamedAttributeGroup,
    /// `attributeGroup` reference
    AttributeGroupRef,
    /// Named `group` definition
    NamedGroup,
    /// `group` reference
    GroupRef,
    /// `sequence` particle
    Sequence,
    /// `choice` particle
    Choice,
    /// `all` particle
    All,
    /// `sequence` directly inside a named group
    NamedGroupSequence,
    /// `choice` directly inside a named group
    NamedGroupChoice,
    /// `all` directly inside a named group
    NamedGroupAll,
    /// `any` wildcard
    Any,
    /// `anyAttribute` wildcard
    AnyAttribute,
    /// `unique` identity constraint
    Unique,
    /// `key` identity constraint
    Key,
    /// `keyref` identity constraint
    Keyref,
    /// `selector`
    Selector,
    /// `field`
    Field,
}

impl Context {
    /// Local name of the XSD element this context parses
    pub fn element_name(self) -> Option<&'static str> {
        use Context::*;

        Some(match self {
            Document => return None,
            Schema => "schema",
            Annotation => "annotation",
            Appinfo => "appinfo",
            Documentation => "documentation",
            Import => "import",
            Include => "include",
            Redefine => "redefine",
            Notation => "notation",
            TopLevelSimpleType | LocalSimpleType => "simpleType",
            SimpleTypeRestriction | SimpleContentRestriction | ComplexContentRestriction => {
                "restriction"
            }
            List => "list",
            Union => "union",
            MinExclusive => "minExclusive",
            MinInclusive => "minInclusive",
            MaxExclusive => "maxExclusive",
            MaxInclusive => "maxInclusive",
            TotalDigits => "totalDigits",
            FractionDigits => "fractionDigits",
            Length => "length",
            MinLength => "minLength",
            MaxLength => "maxLength",
            Enumeration => "enumeration",
            WhiteSpace => "whiteSpace",
            Pattern => "pattern",
            TopLevelComplexType | LocalComplexType => "complexType",
            SimpleContent => "simpleContent",
            SimpleContentExtension | ComplexContentExtension => "extension",
            ComplexContent => "complexContent",
            TopLevelElement | LocalElement | AllElement => "element",
            TopLevelAttribute | LocalAttribute => "attribute",
            NamedAttributeGroup | AttributeGroupRef => "attributeGroup",
            NamedGroup | GroupRef => "group",
            Sequence | NamedGroupSequence => "sequence",
            Choice | NamedGroupChoice => "choice",
            All | NamedGroupAll => "all",
            Any => "any",
            AnyAttribute => "anyAttribute",
            Unique => "unique",
            Key => "key",
            Keyref => "keyref",
            Selector => "selector",
            Field => "field",
        })
    }

    /// Grammar production for this context
    pub fn production(self) -> &'static Production {
        table::production(self)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Context::*;

        let qualifier = match self {
            Document => return write!(f, "document"),
            TopLevelSimpleType | TopLevelComplexType | TopLevelElement | TopLevelAttribute => {
                " (top-level)"
            }
            LocalSimpleType | LocalComplexType | LocalElement | LocalAttribute => " (local)",
            AllElement => " (in all)",
            NamedAttributeGroup | NamedGroup => " (definition)",
            AttributeGroupRef | GroupRef => " (reference)",
            NamedGroupSequence | NamedGroupChoice | NamedGroupAll => " (in named group)",
            SimpleTypeRestriction => return write!(f, "simpleType/restriction"),
            SimpleContentRestriction => return write!(f, "simpleContent/restriction"),
            SimpleContentExtension => return write!(f, "simpleContent/extension"),
            ComplexContentRestriction => return write!(f, "complexContent/restriction"),
            ComplexContentExtension => return write!(f, "complexContent/extension"),
            _ => "",
        };
        write!(f, "{}{}", self.element_name().unwrap_or_default(), qualifier)
    }
}

/// Attribute accepted by a production
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Local name
    pub name: &'static str,
    /// Namespace; `None` for the unqualified schema attributes
    pub namespace: Option<&'static str>,
    /// Lexical space of the value
    pub kind: AttributeKind,
    /// Whether the attribute must be present
    pub required: bool,
}

impl AttributeSpec {
    /// Optional unqualified attribute
    pub const fn optional(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            namespace: None,
            kind,
            required: false,
        }
    }

    /// Required unqualified attribute
    pub const fn required(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            namespace: None,
            kind,
            required: true,
        }
    }

    /// Optional attribute in a foreign namespace (`xml:lang`)
    pub const fn qualified(namespace: &'static str, name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            namespace: Some(namespace),
            kind,
            required: false,
        }
    }
}

/// Occurrence bounds of a particle in a content model
///
/// `max: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences
    pub min: u32,
    /// Maximum number of occurrences
    pub max: Option<u32>,
}

impl Occurs {
    /// Exactly once
    pub const ONCE: Self = Self { min: 1, max: Some(1) };
    /// Zero or one
    pub const OPTIONAL: Self = Self { min: 0, max: Some(1) };
    /// Zero or more
    pub const ZERO_OR_MORE: Self = Self { min: 0, max: None };
    /// One or more
    pub const ONE_OR_MORE: Self = Self { min: 1, max: None };

    /// Check whether `count` more occurrences are allowed
    pub fn allows(&self, count: u32) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

/// What a particle matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// An XSD element with the given local name, parsed under `context`
    Element {
        /// Local name in the XSD namespace
        name: &'static str,
        /// Context the matched child is parsed under
        context: Context,
    },
    /// Particles in order
    Sequence(&'static [Particle]),
    /// Exactly one of the particles
    Choice(&'static [Particle]),
}

/// A term with occurrence bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    /// What is matched
    pub term: Term,
    /// How often
    pub occurs: Occurs,
}

impl Particle {
    /// Required single element
    pub const fn element(name: &'static str, context: Context) -> Self {
        Self {
            term: Term::Element { name, context },
            occurs: Occurs::ONCE,
        }
    }

    /// Required sequence
    pub const fn sequence(items: &'static [Particle]) -> Self {
        Self {
            term: Term::Sequence(items),
            occurs: Occurs::ONCE,
        }
    }

    /// Required exclusive choice
    pub const fn choice(alternatives: &'static [Particle]) -> Self {
        Self {
            term: Term::Choice(alternatives),
            occurs: Occurs::ONCE,
        }
    }

    /// Zero or one occurrence
    pub const fn optional(self) -> Self {
        Self {
            occurs: Occurs::OPTIONAL,
            ..self
        }
    }

    /// Zero or more occurrences
    pub const fn zero_or_more(self) -> Self {
        Self {
            occurs: Occurs::ZERO_OR_MORE,
            ..self
        }
    }

    /// One or more occurrences
    pub const fn one_or_more(self) -> Self {
        Self {
            occurs: Occurs::ONE_OR_MORE,
            ..self
        }
    }

    /// Whether the particle can match nothing
    pub fn is_nullable(&self) -> bool {
        self.occurs.min == 0 || self.term.is_nullable()
    }
}

impl Term {
    /// Whether the term can match nothing
    pub fn is_nullable(&self) -> bool {
        match self {
            Term::Element { .. } => false,
            Term::Sequence(items) => items.iter().all(Particle::is_nullable),
            Term::Choice(alternatives) => alternatives.iter().any(Particle::is_nullable),
        }
    }

    /// Whether an XSD element with this local name can begin the term
    pub fn starts_with(&self, local_name: &str) -> bool {
        match self {
            Term::Element { name, .. } => *name == local_name,
            Term::Sequence(items) => {
                for item in items.iter() {
                    if item.term.starts_with(local_name) {
                        return true;
                    }
                    if !item.is_nullable() {
                        return false;
                    }
                }
                false
            }
            Term::Choice(alternatives) => alternatives.iter().any(|a| a.term.starts_with(local_name)),
        }
    }

    /// Element names that can begin the term, for error messages
    pub fn first_names(&self, names: &mut Vec<&'static str>) {
        match self {
            Term::Element { name, .. } => {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
            Term::Sequence(items) => {
                for item in items.iter() {
                    item.term.first_names(names);
                    if !item.is_nullable() {
                        break;
                    }
                }
            }
            Term::Choice(alternatives) => {
                for alternative in alternatives.iter() {
                    alternative.term.first_names(names);
                }
            }
        }
    }
}

/// What a production allows between its start and end tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// XSD child elements following the model in order; no character data
    Model(&'static [Particle]),
    /// Any well-formed XML and character data
    Any,
}

/// One grammar production
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// Attributes the production accepts
    pub attributes: &'static [AttributeSpec],
    /// Content the production accepts
    pub content: Content,
}

impl Production {
    /// Find the declaration of an attribute
    pub fn attribute(&self, namespace: Option<&str>, local_name: &str) -> Option<&'static AttributeSpec> {
        self.attributes
            .iter()
            .find(|spec| spec.namespace == namespace && spec.name == local_name)
    }

    /// Whether the production permits character data
    pub fn permits_text(&self) -> bool {
        matches!(self.content, Content::Any)
    }
}

/// Check whether an attribute namespace is outside the schema vocabulary
///
/// Unqualified attributes and attributes in the XSD namespace belong to the
/// grammar; everything else is foreign.
pub fn is_foreign_namespace(namespace: Option<&str>) -> bool {
    matches!(namespace, Some(ns) if ns != XSD_NAMESPACE)
}
