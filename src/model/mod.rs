//! Schema object model
//!
//! One typed record per grammar production. Every record keeps the
//! namespace declarations written on its element, a typed attribute struct
//! whose fields are all optional (absent is distinct from a default value),
//! and its children in the slots the content model defines. Records are
//! plain data and are never mutated after a parse.

mod annotations;
mod attributes;
mod complex_types;
mod elements;
mod facets;
mod groups;
mod identities;
mod schema;
mod simple_types;
mod wildcards;

use std::collections::VecDeque;

use indexmap::IndexMap;
use num_bigint::BigUint;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::grammar::Context;
use crate::namespaces::{NamespaceDeclarations, QName};
use crate::validators::{
    AttributeValue, DerivationSet, Form, MaxOccurs, NamespaceList, ProcessContents, Use,
    WhiteSpace,
};

pub use annotations::*;
pub use attributes::*;
pub use complex_types::*;
pub use elements::*;
pub use facets::*;
pub use groups::*;
pub use identities::*;
pub use schema::*;
pub use simple_types::*;
pub use wildcards::*;

/// Parsed element record, tagged by the context it was parsed under
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "context", rename_all = "camelCase")]
pub enum Record {
    /// `schema`
    Schema(Box<Schema>),
    /// `annotation`
    Annotation(Annotation),
    /// `appinfo`
    Appinfo(Appinfo),
    /// `documentation`
    Documentation(Documentation),
    /// `import`
    Import(Import),
    /// `include`
    Include(Include),
    /// `redefine`
    Redefine(Redefine),
    /// `notation`
    Notation(Notation),
    /// Named `simpleType`
    TopLevelSimpleType(TopLevelSimpleType),
    /// Anonymous `simpleType`
    LocalSimpleType(LocalSimpleType),
    /// `simpleType/restriction`
    SimpleTypeRestriction(SimpleRestriction),
    /// `list`
    List(List),
    /// `union`
    Union(Union),
    /// Any of the twelve facets; the kind is kept on the record
    Facet(Facet),
    /// Named `complexType`
    TopLevelComplexType(TopLevelComplexType),
    /// Anonymous `complexType`
    LocalComplexType(LocalComplexType),
    /// `simpleContent`
    SimpleContent(SimpleContent),
    /// `simpleContent/restriction`
    SimpleContentRestriction(SimpleContentRestriction),
    /// `simpleContent/extension`
    SimpleContentExtension(SimpleContentExtension),
    /// `complexContent`
    ComplexContent(ComplexContent),
    /// `complexContent/restriction`
    ComplexContentRestriction(ComplexDerivation),
    /// `complexContent/extension`
    ComplexContentExtension(ComplexDerivation),
    /// Global `element`
    TopLevelElement(TopLevelElement),
    /// Local `element`
    LocalElement(LocalElement),
    /// `element` inside `all`
    AllElement(LocalElement),
    /// Global `attribute`
    TopLevelAttribute(TopLevelAttribute),
    /// Local `attribute`
    LocalAttribute(LocalAttribute),
    /// Named `attributeGroup`
    NamedAttributeGroup(NamedAttributeGroup),
    /// `attributeGroup` reference
    AttributeGroupRef(AttributeGroupRef),
    /// Named `group`
    NamedGroup(NamedGroup),
    /// `group` reference
    GroupRef(GroupRef),
    /// `sequence` particle
    Sequence(ExplicitGroup),
    /// `choice` particle
    Choice(ExplicitGroup),
    /// `all` particle
    All(All),
    /// `sequence` of a named group
    NamedGroupSequence(ExplicitGroup),
    /// `choice` of a named group
    NamedGroupChoice(ExplicitGroup),
    /// `all` of a named group
    NamedGroupAll(All),
    /// `any`
    Any(Any),
    /// `anyAttribute`
    AnyAttribute(AnyAttribute),
    /// `unique`
    Unique(IdentityDefinition),
    /// `key`
    Key(IdentityDefinition),
    /// `keyref`
    Keyref(Keyref),
    /// `selector`
    Selector(XPathSelection),
    /// `field`
    Field(XPathSelection),
}

impl Record {
    /// Context the record was parsed under
    pub fn context(&self) -> Context {
        match self {
            Record::Schema(_) => Context::Schema,
            Record::Annotation(_) => Context::Annotation,
            Record::Appinfo(_) => Context::Appinfo,
            Record::Documentation(_) => Context::Documentation,
            Record::Import(_) => Context::Import,
            Record::Include(_) => Context::Include,
            Record::Redefine(_) => Context::Redefine,
            Record::Notation(_) => Context::Notation,
            Record::TopLevelSimpleType(_) => Context::TopLevelSimpleType,
            Record::LocalSimpleType(_) => Context::LocalSimpleType,
            Record::SimpleTypeRestriction(_) => Context::SimpleTypeRestriction,
            Record::List(_) => Context::List,
            Record::Union(_) => Context::Union,
            Record::Facet(facet) => facet.kind.context(),
            Record::TopLevelComplexType(_) => Context::TopLevelComplexType,
            Record::LocalComplexType(_) => Context::LocalComplexType,
            Record::SimpleContent(_) => Context::SimpleContent,
            Record::SimpleContentRestriction(_) => Context::SimpleContentRestriction,
            Record::SimpleContentExtension(_) => Context::SimpleContentExtension,
            Record::ComplexContent(_) => Context::ComplexContent,
            Record::ComplexContentRestriction(_) => Context::ComplexContentRestriction,
            Record::ComplexContentExtension(_) => Context::ComplexContentExtension,
            Record::TopLevelElement(_) => Context::TopLevelElement,
            Record::LocalElement(_) => Context::LocalElement,
            Record::AllElement(_) => Context::AllElement,
            Record::TopLevelAttribute(_) => Context::TopLevelAttribute,
            Record::LocalAttribute(_) => Context::LocalAttribute,
            Record::NamedAttributeGroup(_) => Context::NamedAttributeGroup,
            Record::AttributeGroupRef(_) => Context::AttributeGroupRef,
            Record::NamedGroup(_) => Context::NamedGroup,
            Record::GroupRef(_) => Context::GroupRef,
            Record::Sequence(_) => Context::Sequence,
            Record::Choice(_) => Context::Choice,
            Record::All(_) => Context::All,
            Record::NamedGroupSequence(_) => Context::NamedGroupSequence,
            Record::NamedGroupChoice(_) => Context::NamedGroupChoice,
            Record::NamedGroupAll(_) => Context::NamedGroupAll,
            Record::Any(_) => Context::Any,
            Record::AnyAttribute(_) => Context::AnyAttribute,
            Record::Unique(_) => Context::Unique,
            Record::Key(_) => Context::Key,
            Record::Keyref(_) => Context::Keyref,
            Record::Selector(_) => Context::Selector,
            Record::Field(_) => Context::Field,
        }
    }

    /// Namespace declarations written on the record's element
    pub fn namespace_declarations(&self) -> &NamespaceDeclarations {
        match self {
            Record::Schema(r) => &r.namespace_declarations,
            Record::Annotation(r) => &r.namespace_declarations,
            Record::Appinfo(r) => &r.namespace_declarations,
            Record::Documentation(r) => &r.namespace_declarations,
            Record::Import(r) => &r.namespace_declarations,
            Record::Include(r) => &r.namespace_declarations,
            Record::Redefine(r) => &r.namespace_declarations,
            Record::Notation(r) => &r.namespace_declarations,
            Record::TopLevelSimpleType(r) => &r.namespace_declarations,
            Record::LocalSimpleType(r) => &r.namespace_declarations,
            Record::SimpleTypeRestriction(r) => &r.namespace_declarations,
            Record::List(r) => &r.namespace_declarations,
            Record::Union(r) => &r.namespace_declarations,
            Record::Facet(r) => &r.namespace_declarations,
            Record::TopLevelComplexType(r) => &r.namespace_declarations,
            Record::LocalComplexType(r) => &r.namespace_declarations,
            Record::SimpleContent(r) => &r.namespace_declarations,
            Record::SimpleContentRestriction(r) => &r.namespace_declarations,
            Record::SimpleContentExtension(r) => &r.namespace_declarations,
            Record::ComplexContent(r) => &r.namespace_declarations,
            Record::ComplexContentRestriction(r) | Record::ComplexContentExtension(r) => {
                &r.namespace_declarations
            }
            Record::TopLevelElement(r) => &r.namespace_declarations,
            Record::LocalElement(r) | Record::AllElement(r) => &r.namespace_declarations,
            Record::TopLevelAttribute(r) => &r.namespace_declarations,
            Record::LocalAttribute(r) => &r.namespace_declarations,
            Record::NamedAttributeGroup(r) => &r.namespace_declarations,
            Record::AttributeGroupRef(r) => &r.namespace_declarations,
            Record::NamedGroup(r) => &r.namespace_declarations,
            Record::GroupRef(r) => &r.namespace_declarations,
            Record::Sequence(r)
            | Record::Choice(r)
            | Record::NamedGroupSequence(r)
            | Record::NamedGroupChoice(r) => &r.namespace_declarations,
            Record::All(r) | Record::NamedGroupAll(r) => &r.namespace_declarations,
            Record::Any(r) => &r.namespace_declarations,
            Record::AnyAttribute(r) => &r.namespace_declarations,
            Record::Unique(r) | Record::Key(r) => &r.namespace_declarations,
            Record::Keyref(r) => &r.namespace_declarations,
            Record::Selector(r) | Record::Field(r) => &r.namespace_declarations,
        }
    }

    /// Assemble the record for a parsed element
    pub(crate) fn build(parsed: Parsed) -> Result<Self> {
        use Context as C;

        Ok(match parsed.context {
            C::Document => {
                return Err(Error::UnexpectedContent {
                    context: C::Document,
                    found: "document record".to_string(),
                })
            }
            C::Schema => Record::Schema(Box::new(Schema::build(parsed)?)),
            C::Annotation => Record::Annotation(Annotation::build(parsed)?),
            C::Appinfo => Record::Appinfo(Appinfo::build(parsed)),
            C::Documentation => Record::Documentation(Documentation::build(parsed)),
            C::Import => Record::Import(Import::build(parsed)?),
            C::Include => Record::Include(Include::build(parsed)?),
            C::Redefine => Record::Redefine(Redefine::build(parsed)?),
            C::Notation => Record::Notation(Notation::build(parsed)?),
            C::TopLevelSimpleType => Record::TopLevelSimpleType(TopLevelSimpleType::build(parsed)?),
            C::LocalSimpleType => Record::LocalSimpleType(LocalSimpleType::build(parsed)?),
            C::SimpleTypeRestriction => {
                Record::SimpleTypeRestriction(SimpleRestriction::build(parsed)?)
            }
            C::List => Record::List(List::build(parsed)?),
            C::Union => Record::Union(Union::build(parsed)?),
            C::MinExclusive
            | C::MinInclusive
            | C::MaxExclusive
            | C::MaxInclusive
            | C::TotalDigits
            | C::FractionDigits
            | C::Length
            | C::MinLength
            | C::MaxLength
            | C::Enumeration
            | C::WhiteSpace
            | C::Pattern => Record::Facet(Facet::build(parsed)?),
            C::TopLevelComplexType => {
                Record::TopLevelComplexType(TopLevelComplexType::build(parsed)?)
            }
            C::LocalComplexType => Record::LocalComplexType(LocalComplexType::build(parsed)?),
            C::SimpleContent => Record::SimpleContent(SimpleContent::build(parsed)?),
            C::SimpleContentRestriction => {
                Record::SimpleContentRestriction(SimpleContentRestriction::build(parsed)?)
            }
            C::SimpleContentExtension => {
                Record::SimpleContentExtension(SimpleContentExtension::build(parsed)?)
            }
            C::ComplexContent => Record::ComplexContent(ComplexContent::build(parsed)?),
            C::ComplexContentRestriction => {
                Record::ComplexContentRestriction(ComplexDerivation::build(parsed)?)
            }
            C::ComplexContentExtension => {
                Record::ComplexContentExtension(ComplexDerivation::build(parsed)?)
            }
            C::TopLevelElement => Record::TopLevelElement(TopLevelElement::build(parsed)?),
            C::LocalElement => Record::LocalElement(LocalElement::build(parsed)?),
            C::AllElement => Record::AllElement(LocalElement::build(parsed)?),
            C::TopLevelAttribute => Record::TopLevelAttribute(TopLevelAttribute::build(parsed)?),
            C::LocalAttribute => Record::LocalAttribute(LocalAttribute::build(parsed)?),
            C::NamedAttributeGroup => {
                Record::NamedAttributeGroup(NamedAttributeGroup::build(parsed)?)
            }
            C::AttributeGroupRef => Record::AttributeGroupRef(AttributeGroupRef::build(parsed)?),
            C::NamedGroup => Record::NamedGroup(NamedGroup::build(parsed)?),
            C::GroupRef => Record::GroupRef(GroupRef::build(parsed)?),
            C::Sequence => Record::Sequence(ExplicitGroup::build(parsed)?),
            C::Choice => Record::Choice(ExplicitGroup::build(parsed)?),
            C::All => Record::All(All::build(parsed)?),
            C::NamedGroupSequence => Record::NamedGroupSequence(ExplicitGroup::build(parsed)?),
            C::NamedGroupChoice => Record::NamedGroupChoice(ExplicitGroup::build(parsed)?),
            C::NamedGroupAll => Record::NamedGroupAll(All::build(parsed)?),
            C::Any => Record::Any(Any::build(parsed)?),
            C::AnyAttribute => Record::AnyAttribute(AnyAttribute::build(parsed)?),
            C::Unique => Record::Unique(IdentityDefinition::build(parsed)?),
            C::Key => Record::Key(IdentityDefinition::build(parsed)?),
            C::Keyref => Record::Keyref(Keyref::build(parsed)?),
            C::Selector => Record::Selector(XPathSelection::build(parsed)?),
            C::Field => Record::Field(XPathSelection::build(parsed)?),
        })
    }
}

/// Everything the engine gathered for one element, ready to be typed
#[derive(Debug)]
pub(crate) struct Parsed {
    pub context: Context,
    pub namespace_declarations: NamespaceDeclarations,
    pub attributes: AttributeMap,
    pub children: Children,
    /// Mixed content, only filled for contexts that permit it
    pub content: Vec<ForeignNode>,
}

/// Validated attributes of one element, keyed by local name
#[derive(Debug, Default)]
pub(crate) struct AttributeMap(IndexMap<&'static str, AttributeValue>);

macro_rules! take_as {
    ($($method:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $method(&mut self, name: &str) -> Option<$ty> {
                match self.0.shift_remove(name)? {
                    AttributeValue::$variant(value) => Some(value),
                    _ => None,
                }
            }
        )*
    };
}

impl AttributeMap {
    pub fn insert(&mut self, name: &'static str, value: AttributeValue) {
        self.0.insert(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    take_as! {
        take_string => String(String),
        take_boolean => Boolean(bool),
        take_integer => Integer(BigUint),
        take_max_occurs => MaxOccurs(MaxOccurs),
        take_qname => QName(QName),
        take_qname_list => QNameList(Vec<QName>),
        take_form => Form(Form),
        take_use => Use(Use),
        take_process_contents => ProcessContents(ProcessContents),
        take_derivations => Derivations(DerivationSet),
        take_namespace_list => NamespaceList(NamespaceList),
        take_white_space => WhiteSpace(WhiteSpace),
    }
}

/// Child records of one element in document order
///
/// The content model has already been matched, so builders only sort the
/// records into slots. A record that fits no slot is still reported rather
/// than dropped.
#[derive(Debug)]
pub(crate) struct Children {
    context: Context,
    records: VecDeque<Record>,
}

impl Children {
    pub fn new(context: Context, records: Vec<Record>) -> Self {
        Self {
            context,
            records: records.into(),
        }
    }

    /// Take the next record if `select` accepts it
    pub fn next_if<T>(&mut self, select: impl FnOnce(Record) -> std::result::Result<T, Record>) -> Option<T> {
        let record = self.records.pop_front()?;
        match select(record) {
            Ok(value) => Some(value),
            Err(record) => {
                self.records.push_front(record);
                None
            }
        }
    }

    /// Take records for a repeatable slot
    pub fn repeated<T>(&mut self, mut select: impl FnMut(Record) -> std::result::Result<T, Record>) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.next_if(&mut select) {
            values.push(value);
        }
        values
    }

    /// Take every remaining record for the final slot
    pub fn remaining<T>(
        mut self,
        select: impl FnMut(Record) -> std::result::Result<T, Record>,
    ) -> Result<Vec<T>> {
        let values = self.repeated(select);
        self.finish()?;
        Ok(values)
    }

    /// Take the next record, which the content model guarantees is there
    pub fn required<T>(
        &mut self,
        expected: &str,
        select: impl FnOnce(Record) -> std::result::Result<T, Record>,
    ) -> Result<T> {
        self.next_if(select).ok_or_else(|| Error::MissingContent {
            context: self.context,
            expected: expected.to_string(),
        })
    }

    /// Optional leading annotation
    pub fn annotation(&mut self) -> Option<Annotation> {
        self.next_if(|record| match record {
            Record::Annotation(a) => Ok(a),
            other => Err(other),
        })
    }

    /// Optional anonymous simple type
    pub fn local_simple_type(&mut self) -> Option<LocalSimpleType> {
        self.next_if(|record| match record {
            Record::LocalSimpleType(t) => Ok(t),
            other => Err(other),
        })
    }

    /// Error for a record that fits no slot
    pub fn unexpected(&self, record: &Record) -> Error {
        Error::UnexpectedContent {
            context: self.context,
            found: format!("{} record", record.context()),
        }
    }

    /// Check that every record was consumed
    pub fn finish(mut self) -> Result<()> {
        match self.records.pop_front() {
            Some(record) => Err(self.unexpected(&record)),
            None => Ok(()),
        }
    }
}

impl Iterator for Children {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.records.pop_front()
    }
}
