//! Productions of the XSD 1.0 schema-for-schemas
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#normative-schemaSchema

use super::{AttributeSpec, Content, Context, Particle, Production};
use crate::validators::derivations::{
    BLOCK_SET, DERIVATION_SET, FULL_DERIVATION_SET, SIMPLE_DERIVATION_SET,
};
use crate::validators::AttributeKind as K;
use crate::XML_NAMESPACE;

type A = AttributeSpec;
type P = Particle;

const ID: A = A::optional("id", K::Id);
const ANNOTATION: P = P::element("annotation", Context::Annotation).optional();

// Shared content models

const ANNOTATED: &[P] = &[ANNOTATION];

const LOCAL_SIMPLE_TYPE: P = P::element("simpleType", Context::LocalSimpleType);

const FACET_CHOICE: &[P] = &[
    P::element("minExclusive", Context::MinExclusive),
    P::element("minInclusive", Context::MinInclusive),
    P::element("maxExclusive", Context::MaxExclusive),
    P::element("maxInclusive", Context::MaxInclusive),
    P::element("totalDigits", Context::TotalDigits),
    P::element("fractionDigits", Context::FractionDigits),
    P::element("length", Context::Length),
    P::element("minLength", Context::MinLength),
    P::element("maxLength", Context::MaxLength),
    P::element("enumeration", Context::Enumeration),
    P::element("whiteSpace", Context::WhiteSpace),
    P::element("pattern", Context::Pattern),
];

const ATTRIBUTE_CHOICE: &[P] = &[
    P::element("attribute", Context::LocalAttribute),
    P::element("attributeGroup", Context::AttributeGroupRef),
];

const TYPE_DEF_PARTICLE: &[P] = &[
    P::element("group", Context::GroupRef),
    P::element("all", Context::All),
    P::element("choice", Context::Choice),
    P::element("sequence", Context::Sequence),
];

const NESTED_PARTICLE: &[P] = &[
    P::element("element", Context::LocalElement),
    P::element("group", Context::GroupRef),
    P::element("choice", Context::Choice),
    P::element("sequence", Context::Sequence),
    P::element("any", Context::Any),
];

const IDENTITY_CONSTRAINT: &[P] = &[
    P::element("unique", Context::Unique),
    P::element("key", Context::Key),
    P::element("keyref", Context::Keyref),
];

const LOCAL_TYPE: &[P] = &[
    P::element("simpleType", Context::LocalSimpleType),
    P::element("complexType", Context::LocalComplexType),
];

const SIMPLE_DERIVATION: &[P] = &[
    P::element("restriction", Context::SimpleTypeRestriction),
    P::element("list", Context::List),
    P::element("union", Context::Union),
];

const SIMPLE_TYPE_CONTENT: &[P] = &[ANNOTATION, P::choice(SIMPLE_DERIVATION)];

const IMPLICIT_COMPLEX_CONTENT: &[P] = &[
    P::choice(TYPE_DEF_PARTICLE).optional(),
    P::choice(ATTRIBUTE_CHOICE).zero_or_more(),
    P::element("anyAttribute", Context::AnyAttribute).optional(),
];

const COMPLEX_TYPE_MODEL: &[P] = &[
    P::element("simpleContent", Context::SimpleContent),
    P::element("complexContent", Context::ComplexContent),
    P::sequence(IMPLICIT_COMPLEX_CONTENT),
];

const COMPLEX_TYPE_CONTENT: &[P] = &[ANNOTATION, P::choice(COMPLEX_TYPE_MODEL)];

const ELEMENT_CONTENT: &[P] = &[
    ANNOTATION,
    P::choice(LOCAL_TYPE).optional(),
    P::choice(IDENTITY_CONSTRAINT).zero_or_more(),
];

const ATTRIBUTE_CONTENT: &[P] = &[ANNOTATION, LOCAL_SIMPLE_TYPE.optional()];

const EXPLICIT_GROUP_CONTENT: &[P] = &[ANNOTATION, P::choice(NESTED_PARTICLE).zero_or_more()];

const ALL_CONTENT: &[P] = &[
    ANNOTATION,
    P::element("element", Context::AllElement).zero_or_more(),
];

const IDENTITY_CONTENT: &[P] = &[
    ANNOTATION,
    P::element("selector", Context::Selector),
    P::element("field", Context::Field).one_or_more(),
];

// schema

const SCHEMA_ATTRIBUTES: &[A] = &[
    ID,
    A::optional("targetNamespace", K::AnyUri),
    A::optional("version", K::Token),
    A::optional("finalDefault", K::Derivations(FULL_DERIVATION_SET)),
    A::optional("blockDefault", K::Derivations(BLOCK_SET)),
    A::optional("attributeFormDefault", K::Form),
    A::optional("elementFormDefault", K::Form),
    A::qualified(XML_NAMESPACE, "lang", K::Language),
];

const SCHEMA_COMPOSITION: &[P] = &[
    P::element("include", Context::Include),
    P::element("import", Context::Import),
    P::element("redefine", Context::Redefine),
    P::element("annotation", Context::Annotation),
];

const SCHEMA_TOP: &[P] = &[
    P::element("simpleType", Context::TopLevelSimpleType),
    P::element("complexType", Context::TopLevelComplexType),
    P::element("group", Context::NamedGroup),
    P::element("attributeGroup", Context::NamedAttributeGroup),
    P::element("element", Context::TopLevelElement),
    P::element("attribute", Context::TopLevelAttribute),
    P::element("notation", Context::Notation),
    P::element("annotation", Context::Annotation),
];

const SCHEMA_CONTENT: &[P] = &[
    P::choice(SCHEMA_COMPOSITION).zero_or_more(),
    P::choice(SCHEMA_TOP).zero_or_more(),
];

const DOCUMENT_CONTENT: &[P] = &[P::element("schema", Context::Schema)];

static DOCUMENT: Production = Production {
    attributes: &[],
    content: Content::Model(DOCUMENT_CONTENT),
};

static SCHEMA: Production = Production {
    attributes: SCHEMA_ATTRIBUTES,
    content: Content::Model(SCHEMA_CONTENT),
};

// Annotations

const ANNOTATION_ITEM: &[P] = &[
    P::element("appinfo", Context::Appinfo),
    P::element("documentation", Context::Documentation),
];

const ANNOTATION_ITEMS: &[P] = &[P::choice(ANNOTATION_ITEM).zero_or_more()];

static ANNOTATION_PRODUCTION: Production = Production {
    attributes: &[ID],
    content: Content::Model(ANNOTATION_ITEMS),
};

static APPINFO: Production = Production {
    attributes: &[A::optional("source", K::AnyUri)],
    content: Content::Any,
};

static DOCUMENTATION: Production = Production {
    attributes: &[
        A::optional("source", K::AnyUri),
        A::qualified(XML_NAMESPACE, "lang", K::Language),
    ],
    content: Content::Any,
};

// Composition

static IMPORT: Production = Production {
    attributes: &[
        ID,
        A::optional("namespace", K::AnyUri),
        A::optional("schemaLocation", K::AnyUri),
    ],
    content: Content::Model(ANNOTATED),
};

static INCLUDE: Production = Production {
    attributes: &[ID, A::required("schemaLocation", K::AnyUri)],
    content: Content::Model(ANNOTATED),
};

const REDEFINE_ITEMS: &[P] = &[
    P::element("annotation", Context::Annotation),
    P::element("simpleType", Context::TopLevelSimpleType),
    P::element("complexType", Context::TopLevelComplexType),
    P::element("group", Context::NamedGroup),
    P::element("attributeGroup", Context::NamedAttributeGroup),
];

const REDEFINE_CONTENT: &[P] = &[P::choice(REDEFINE_ITEMS).zero_or_more()];

static REDEFINE: Production = Production {
    attributes: &[ID, A::required("schemaLocation", K::AnyUri)],
    content: Content::Model(REDEFINE_CONTENT),
};

static NOTATION: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::optional("public", K::Token),
        A::optional("system", K::AnyUri),
    ],
    content: Content::Model(ANNOTATED),
};

// Simple types

static TOP_LEVEL_SIMPLE_TYPE: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::optional("final", K::Derivations(SIMPLE_DERIVATION_SET)),
    ],
    content: Content::Model(SIMPLE_TYPE_CONTENT),
};

static LOCAL_SIMPLE_TYPE_PRODUCTION: Production = Production {
    attributes: &[ID],
    content: Content::Model(SIMPLE_TYPE_CONTENT),
};

const SIMPLE_RESTRICTION_CONTENT: &[P] = &[
    ANNOTATION,
    LOCAL_SIMPLE_TYPE.optional(),
    P::choice(FACET_CHOICE).zero_or_more(),
];

static SIMPLE_TYPE_RESTRICTION: Production = Production {
    attributes: &[ID, A::optional("base", K::QName)],
    content: Content::Model(SIMPLE_RESTRICTION_CONTENT),
};

static LIST: Production = Production {
    attributes: &[ID, A::optional("itemType", K::QName)],
    content: Content::Model(ATTRIBUTE_CONTENT),
};

const UNION_CONTENT: &[P] = &[ANNOTATION, LOCAL_SIMPLE_TYPE.zero_or_more()];

static UNION: Production = Production {
    attributes: &[ID, A::optional("memberTypes", K::QNameList)],
    content: Content::Model(UNION_CONTENT),
};

// Facets

static FACET: Production = Production {
    attributes: &[
        ID,
        A::required("value", K::String),
        A::optional("fixed", K::Boolean),
    ],
    content: Content::Model(ANNOTATED),
};

static NUMERIC_FACET: Production = Production {
    attributes: &[
        ID,
        A::required("value", K::NonNegativeInteger),
        A::optional("fixed", K::Boolean),
    ],
    content: Content::Model(ANNOTATED),
};

static TOTAL_DIGITS: Production = Production {
    attributes: &[
        ID,
        A::required("value", K::PositiveInteger),
        A::optional("fixed", K::Boolean),
    ],
    content: Content::Model(ANNOTATED),
};

static NO_FIXED_FACET: Production = Production {
    attributes: &[ID, A::required("value", K::String)],
    content: Content::Model(ANNOTATED),
};

static WHITE_SPACE: Production = Production {
    attributes: &[
        ID,
        A::required("value", K::WhiteSpace),
        A::optional("fixed", K::Boolean),
    ],
    content: Content::Model(ANNOTATED),
};

// Complex types

static TOP_LEVEL_COMPLEX_TYPE: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::optional("mixed", K::Boolean),
        A::optional("abstract", K::Boolean),
        A::optional("final", K::Derivations(DERIVATION_SET)),
        A::optional("block", K::Derivations(DERIVATION_SET)),
    ],
    content: Content::Model(COMPLEX_TYPE_CONTENT),
};

static LOCAL_COMPLEX_TYPE: Production = Production {
    attributes: &[ID, A::optional("mixed", K::Boolean)],
    content: Content::Model(COMPLEX_TYPE_CONTENT),
};

const SIMPLE_CONTENT_DERIVATION: &[P] = &[
    P::element("restriction", Context::SimpleContentRestriction),
    P::element("extension", Context::SimpleContentExtension),
];

const SIMPLE_CONTENT_CONTENT: &[P] = &[ANNOTATION, P::choice(SIMPLE_CONTENT_DERIVATION)];

static SIMPLE_CONTENT: Production = Production {
    attributes: &[ID],
    content: Content::Model(SIMPLE_CONTENT_CONTENT),
};

const SIMPLE_CONTENT_RESTRICTION_CONTENT: &[P] = &[
    ANNOTATION,
    LOCAL_SIMPLE_TYPE.optional(),
    P::choice(FACET_CHOICE).zero_or_more(),
    P::choice(ATTRIBUTE_CHOICE).zero_or_more(),
    P::element("anyAttribute", Context::AnyAttribute).optional(),
];

const SIMPLE_CONTENT_EXTENSION_CONTENT: &[P] = &[
    ANNOTATION,
    P::choice(ATTRIBUTE_CHOICE).zero_or_more(),
    P::element("anyAttribute", Context::AnyAttribute).optional(),
];

const DERIVATION_ATTRIBUTES: &[A] = &[ID, A::required("base", K::QName)];

static SIMPLE_CONTENT_RESTRICTION: Production = Production {
    attributes: DERIVATION_ATTRIBUTES,
    content: Content::Model(SIMPLE_CONTENT_RESTRICTION_CONTENT),
};

static SIMPLE_CONTENT_EXTENSION: Production = Production {
    attributes: DERIVATION_ATTRIBUTES,
    content: Content::Model(SIMPLE_CONTENT_EXTENSION_CONTENT),
};

const COMPLEX_CONTENT_DERIVATION_CHOICE: &[P] = &[
    P::element("restriction", Context::ComplexContentRestriction),
    P::element("extension", Context::ComplexContentExtension),
];

const COMPLEX_CONTENT_CONTENT: &[P] = &[ANNOTATION, P::choice(COMPLEX_CONTENT_DERIVATION_CHOICE)];

static COMPLEX_CONTENT: Production = Production {
    attributes: &[ID, A::optional("mixed", K::Boolean)],
    content: Content::Model(COMPLEX_CONTENT_CONTENT),
};

const COMPLEX_DERIVATION_CONTENT: &[P] = &[
    ANNOTATION,
    P::choice(TYPE_DEF_PARTICLE).optional(),
    P::choice(ATTRIBUTE_CHOICE).zero_or_more(),
    P::element("anyAttribute", Context::AnyAttribute).optional(),
];

static COMPLEX_CONTENT_DERIVATION: Production = Production {
    attributes: DERIVATION_ATTRIBUTES,
    content: Content::Model(COMPLEX_DERIVATION_CONTENT),
};

// Element declarations

static TOP_LEVEL_ELEMENT: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::optional("type", K::QName),
        A::optional("substitutionGroup", K::QName),
        A::optional("default", K::String),
        A::optional("fixed", K::String),
        A::optional("nillable", K::Boolean),
        A::optional("abstract", K::Boolean),
        A::optional("final", K::Derivations(DERIVATION_SET)),
        A::optional("block", K::Derivations(BLOCK_SET)),
    ],
    content: Content::Model(ELEMENT_CONTENT),
};

static LOCAL_ELEMENT: Production = Production {
    attributes: &[
        ID,
        A::optional("name", K::NcName),
        A::optional("ref", K::QName),
        A::optional("type", K::QName),
        A::optional("minOccurs", K::NonNegativeInteger),
        A::optional("maxOccurs", K::MaxOccurs),
        A::optional("default", K::String),
        A::optional("fixed", K::String),
        A::optional("nillable", K::Boolean),
        A::optional("block", K::Derivations(BLOCK_SET)),
        A::optional("form", K::Form),
    ],
    content: Content::Model(ELEMENT_CONTENT),
};

static ALL_ELEMENT: Production = Production {
    attributes: &[
        ID,
        A::optional("name", K::NcName),
        A::optional("ref", K::QName),
        A::optional("type", K::QName),
        A::optional("minOccurs", K::ZeroOrOne),
        A::optional("maxOccurs", K::MaxOccursZeroOrOne),
        A::optional("default", K::String),
        A::optional("fixed", K::String),
        A::optional("nillable", K::Boolean),
        A::optional("block", K::Derivations(BLOCK_SET)),
        A::optional("form", K::Form),
    ],
    content: Content::Model(ELEMENT_CONTENT),
};

// Attribute declarations

static TOP_LEVEL_ATTRIBUTE: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::optional("type", K::QName),
        A::optional("default", K::String),
        A::optional("fixed", K::String),
    ],
    content: Content::Model(ATTRIBUTE_CONTENT),
};

static LOCAL_ATTRIBUTE: Production = Production {
    attributes: &[
        ID,
        A::optional("name", K::NcName),
        A::optional("ref", K::QName),
        A::optional("type", K::QName),
        A::optional("use", K::Use),
        A::optional("default", K::String),
        A::optional("fixed", K::String),
        A::optional("form", K::Form),
    ],
    content: Content::Model(ATTRIBUTE_CONTENT),
};

const NAMED_ATTRIBUTE_GROUP_CONTENT: &[P] = &[
    ANNOTATION,
    P::choice(ATTRIBUTE_CHOICE).zero_or_more(),
    P::element("anyAttribute", Context::AnyAttribute).optional(),
];

static NAMED_ATTRIBUTE_GROUP: Production = Production {
    attributes: &[ID, A::required("name", K::NcName)],
    content: Content::Model(NAMED_ATTRIBUTE_GROUP_CONTENT),
};

static ATTRIBUTE_GROUP_REF: Production = Production {
    attributes: &[ID, A::required("ref", K::QName)],
    content: Content::Model(ANNOTATED),
};

// Model groups

const NAMED_GROUP_MODEL: &[P] = &[
    P::element("all", Context::NamedGroupAll),
    P::element("choice", Context::NamedGroupChoice),
    P::element("sequence", Context::NamedGroupSequence),
];

const NAMED_GROUP_CONTENT: &[P] = &[ANNOTATION, P::choice(NAMED_GROUP_MODEL)];

static NAMED_GROUP: Production = Production {
    attributes: &[ID, A::required("name", K::NcName)],
    content: Content::Model(NAMED_GROUP_CONTENT),
};

static GROUP_REF: Production = Production {
    attributes: &[
        ID,
        A::required("ref", K::QName),
        A::optional("minOccurs", K::NonNegativeInteger),
        A::optional("maxOccurs", K::MaxOccurs),
    ],
    content: Content::Model(ANNOTATED),
};

static EXPLICIT_GROUP: Production = Production {
    attributes: &[
        ID,
        A::optional("minOccurs", K::NonNegativeInteger),
        A::optional("maxOccurs", K::MaxOccurs),
    ],
    content: Content::Model(EXPLICIT_GROUP_CONTENT),
};

static ALL: Production = Production {
    attributes: &[
        ID,
        A::optional("minOccurs", K::ZeroOrOne),
        A::optional("maxOccurs", K::MaxOccursOne),
    ],
    content: Content::Model(ALL_CONTENT),
};

static NAMED_GROUP_EXPLICIT: Production = Production {
    attributes: &[ID],
    content: Content::Model(EXPLICIT_GROUP_CONTENT),
};

static NAMED_GROUP_ALL: Production = Production {
    attributes: &[ID],
    content: Content::Model(ALL_CONTENT),
};

// Wildcards

static ANY: Production = Production {
    attributes: &[
        ID,
        A::optional("namespace", K::NamespaceList),
        A::optional("processContents", K::ProcessContents),
        A::optional("minOccurs", K::NonNegativeInteger),
        A::optional("maxOccurs", K::MaxOccurs),
    ],
    content: Content::Model(ANNOTATED),
};

static ANY_ATTRIBUTE: Production = Production {
    attributes: &[
        ID,
        A::optional("namespace", K::NamespaceList),
        A::optional("processContents", K::ProcessContents),
    ],
    content: Content::Model(ANNOTATED),
};

// Identity constraints

static UNIQUE_OR_KEY: Production = Production {
    attributes: &[ID, A::required("name", K::NcName)],
    content: Content::Model(IDENTITY_CONTENT),
};

static KEYREF: Production = Production {
    attributes: &[
        ID,
        A::required("name", K::NcName),
        A::required("refer", K::QName),
    ],
    content: Content::Model(IDENTITY_CONTENT),
};

static XPATH: Production = Production {
    attributes: &[ID, A::required("xpath", K::Token)],
    content: Content::Model(ANNOTATED),
};

pub(super) fn production(context: Context) -> &'static Production {
    use Context::*;

    match context {
        Document => &DOCUMENT,
        Schema => &SCHEMA,
        Annotation => &ANNOTATION_PRODUCTION,
        Appinfo => &APPINFO,
        Documentation => &DOCUMENTATION,
        Import => &IMPORT,
        Include => &INCLUDE,
        Redefine => &REDEFINE,
        Notation => &NOTATION,
        TopLevelSimpleType => &TOP_LEVEL_SIMPLE_TYPE,
        LocalSimpleType => &LOCAL_SIMPLE_TYPE_PRODUCTION,
        SimpleTypeRestriction => &SIMPLE_TYPE_RESTRICTION,
        List => &LIST,
        Union => &UNION,
        MinExclusive | MinInclusive | MaxExclusive | MaxInclusive => &FACET,
        TotalDigits => &TOTAL_DIGITS,
        FractionDigits | Length | MinLength | MaxLength => &NUMERIC_FACET,
        Enumeration | Pattern => &NO_FIXED_FACET,
        WhiteSpace => &WHITE_SPACE,
        TopLevelComplexType => &TOP_LEVEL_COMPLEX_TYPE,
        LocalComplexType => &LOCAL_COMPLEX_TYPE,
        SimpleContent => &SIMPLE_CONTENT,
        SimpleContentRestriction => &SIMPLE_CONTENT_RESTRICTION,
        SimpleContentExtension => &SIMPLE_CONTENT_EXTENSION,
        ComplexContent => &COMPLEX_CONTENT,
        ComplexContentRestriction | ComplexContentExtension => &COMPLEX_CONTENT_DERIVATION,
        TopLevelElement => &TOP_LEVEL_ELEMENT,
        LocalElement => &LOCAL_ELEMENT,
        AllElement => &ALL_ELEMENT,
        TopLevelAttribute => &TOP_LEVEL_ATTRIBUTE,
        LocalAttribute => &LOCAL_ATTRIBUTE,
        NamedAttributeGroup => &NAMED_ATTRIBUTE_GROUP,
        AttributeGroupRef => &ATTRIBUTE_GROUP_REF,
        NamedGroup => &NAMED_GROUP,
        GroupRef => &GROUP_REF,
        Sequence | Choice => &EXPLICIT_GROUP,
        All => &ALL,
        NamedGroupSequence | NamedGroupChoice => &NAMED_GROUP_EXPLICIT,
        NamedGroupAll => &NAMED_GROUP_ALL,
        Any => &ANY,
        AnyAttribute => &ANY_ATTRIBUTE,
        Unique | Key => &UNIQUE_OR_KEY,
        Keyref => &KEYREF,
        Selector | Field => &XPATH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Term;

    fn child_contexts(particles: &[P], out: &mut Vec<Context>) {
        for particle in particles {
            match particle.term {
                Term::Element { context, .. } => out.push(context),
                Term::Sequence(items) | Term::Choice(items) => child_contexts(items, out),
            }
        }
    }

    #[test]
    fn test_child_element_names_match_contexts() {
        let mut pending = vec![Context::Document];
        let mut seen = Vec::new();
        while let Some(context) = pending.pop() {
            if seen.contains(&context) {
                continue;
            }
            seen.push(context);
            if let Content::Model(model) = context.production().content {
                let mut children = Vec::new();
                child_contexts(model, &mut children);
                for child in children {
                    assert!(child.element_name().is_some());
                    pending.push(child);
                }
            }
        }
        // every context is reachable from the document
        assert_eq!(seen.len(), 56);
    }

    #[test]
    fn test_required_attributes() {
        let required = |context: Context| -> Vec<&str> {
            context
                .production()
                .attributes
                .iter()
                .filter(|a| a.required)
                .map(|a| a.name)
                .collect()
        };
        assert_eq!(required(Context::Include), vec!["schemaLocation"]);
        assert_eq!(required(Context::Keyref), vec!["name", "refer"]);
        assert_eq!(required(Context::SimpleContentExtension), vec!["base"]);
        assert!(required(Context::LocalElement).is_empty());
        assert!(required(Context::Import).is_empty());
    }

    #[test]
    fn test_enumeration_and_pattern_have_no_fixed() {
        for context in [Context::Enumeration, Context::Pattern] {
            assert!(context.production().attribute(None, "fixed").is_none());
        }
        assert!(Context::Length.production().attribute(None, "fixed").is_some());
    }

    #[test]
    fn test_xml_lang_is_qualified() {
        let schema = Context::Schema.production();
        assert!(schema.attribute(Some(XML_NAMESPACE), "lang").is_some());
        assert!(schema.attribute(None, "lang").is_none());
    }

    #[test]
    fn test_text_only_in_annotation_leaves() {
        assert!(Context::Appinfo.production().permits_text());
        assert!(Context::Documentation.production().permits_text());
        assert!(!Context::Annotation.production().permits_text());
        assert!(!Context::Schema.production().permits_text());
    }
}
