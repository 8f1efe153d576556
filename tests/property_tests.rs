//! Property tests for lexical values, driven through whole-document parses

use num_bigint::BigUint;
use proptest::prelude::*;

use xsd_grammar::model::{FacetValue, SimpleDerivation};
use xsd_grammar::namespaces::QName;
use xsd_grammar::validators::Derivation;
use xsd_grammar::{parse, Context, Error, Schema};

// =============================================================================
// Helpers
// =============================================================================

fn schema(body: &str) -> Result<Schema, Error> {
    parse(format!(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{body}</xs:schema>"#
    ))
}

fn padding() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![" ", "\t", "\n", "\r\n"]), 0..3)
        .prop_map(|parts| parts.concat())
}

fn nillable(raw: &str) -> Result<Option<bool>, Error> {
    let parsed = schema(&format!(r#"<xs:element name="a" nillable="{raw}"/>"#))?;
    Ok(parsed.element("a").and_then(|e| e.attributes.nillable))
}

fn length_facet(raw: &str) -> Result<Option<FacetValue>, Error> {
    let parsed = schema(&format!(
        r#"<xs:simpleType name="s"><xs:restriction base="xs:string"><xs:length value="{raw}"/></xs:restriction></xs:simpleType>"#
    ))?;
    let simple_type = parsed.simple_type("s").unwrap();
    let SimpleDerivation::Restriction(restriction) = &simple_type.derivation else {
        panic!("expected restriction");
    };
    Ok(restriction.facets[0].attributes.value.clone())
}

const SIMPLE_FINAL: [(&str, Derivation); 3] = [
    ("list", Derivation::List),
    ("union", Derivation::Union),
    ("restriction", Derivation::Restriction),
];

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn boolean_true_forms_accept_padding(
        value in prop::sample::select(vec!["true", "1"]),
        before in padding(),
        after in padding(),
    ) {
        prop_assert_eq!(nillable(&format!("{before}{value}{after}")).unwrap(), Some(true));
    }

    #[test]
    fn boolean_false_forms_accept_padding(
        value in prop::sample::select(vec!["false", "0"]),
        before in padding(),
        after in padding(),
    ) {
        prop_assert_eq!(nillable(&format!("{before}{value}{after}")).unwrap(), Some(false));
    }

    #[test]
    fn boolean_rejects_other_forms(
        value in "[a-zA-Z0-9]{1,8}".prop_filter("boolean literal", |v| {
            !matches!(v.as_str(), "true" | "false" | "1" | "0")
        }),
    ) {
        let err = nillable(&value).unwrap_err();
        let is_invalid = matches!(
            err,
            Error::InvalidAttributeValue { context: Context::TopLevelElement, .. }
        );
        prop_assert!(is_invalid);
    }

    #[test]
    fn integers_keep_magnitude(
        n in any::<u64>(),
        zeros in 0usize..6,
        plus in any::<bool>(),
    ) {
        let raw = format!("{}{}{}", if plus { "+" } else { "" }, "0".repeat(zeros), n);
        prop_assert_eq!(
            length_facet(&raw).unwrap(),
            Some(FacetValue::Integer(BigUint::from(n)))
        );
    }

    #[test]
    fn integers_are_unbounded(digits in "[1-9][0-9]{20,60}") {
        let value = length_facet(&digits).unwrap();
        let Some(FacetValue::Integer(n)) = value else {
            panic!("expected integer facet value");
        };
        prop_assert_eq!(n.to_string(), digits);
    }

    #[test]
    fn negative_integers_are_rejected(n in 1u32..u32::MAX) {
        let is_invalid = matches!(
            length_facet(&format!("-{n}")),
            Err(Error::InvalidAttributeValue { context: Context::Length, .. })
        );
        prop_assert!(is_invalid);
    }

    #[test]
    fn derivation_tokens_are_idempotent(picks in prop::collection::vec(0usize..3, 1..8)) {
        let raw: Vec<&str> = picks.iter().map(|&i| SIMPLE_FINAL[i].0).collect();
        let parsed = schema(&format!(
            r#"<xs:simpleType name="s" final="{}"><xs:list itemType="xs:int"/></xs:simpleType>"#,
            raw.join(" ")
        ))
        .unwrap();
        let finals = parsed.simple_type("s").unwrap().attributes.final_derivation.unwrap();
        for (index, (_, derivation)) in SIMPLE_FINAL.iter().enumerate() {
            prop_assert_eq!(finals.contains(*derivation), picks.contains(&index));
        }
    }

    #[test]
    fn prefixed_qnames_resolve(prefix in "p[a-z0-9]{0,6}", local in "[a-zA-Z_][a-zA-Z0-9._-]{0,10}") {
        let parsed = schema(&format!(
            r#"<xs:element name="a" xmlns:{prefix}="http://example.org/{prefix}" type="{prefix}:{local}"/>"#
        ))
        .unwrap();
        prop_assert_eq!(
            parsed.element("a").unwrap().attributes.type_name.clone(),
            Some(QName::namespaced(format!("http://example.org/{prefix}"), local))
        );
    }

    #[test]
    fn unprefixed_qnames_take_default_namespace(local in "[a-zA-Z_][a-zA-Z0-9._-]{0,10}") {
        let parsed = schema(&format!(
            r#"<xs:element name="a" xmlns="http://example.org" type="{local}"/>"#
        ))
        .unwrap();
        prop_assert_eq!(
            parsed.element("a").unwrap().attributes.type_name.clone(),
            Some(QName::namespaced("http://example.org", local))
        );
    }
}
