//! Validators for the built-in datatypes schema attributes are declared with
//!
//! Each validator applies the datatype's whitespace facet (`collapse` for
//! everything except `xs:string`) and then checks the lexical space.

use num_bigint::BigUint;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LexicalError;
use crate::names::{collapse_whitespace, is_valid_ncname};

type LexicalResult<T> = std::result::Result<T, LexicalError>;

/// Primary subtag of 1-8 letters, then any number of alphanumeric subtags
static LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]+)*$").expect("valid language pattern"));

/// xs:boolean
pub fn boolean(value: &str) -> LexicalResult<bool> {
    match collapse_whitespace(value).as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(LexicalError::new("a boolean (true, false, 1 or 0)")),
    }
}

/// xs:NCName
pub fn ncname(value: &str) -> LexicalResult<String> {
    let value = collapse_whitespace(value);
    if is_valid_ncname(&value) {
        Ok(value)
    } else {
        Err(LexicalError::new("an NCName"))
    }
}

/// xs:ID, lexically an NCName
pub fn id(value: &str) -> LexicalResult<String> {
    ncname(value).map_err(|_| LexicalError::new("an ID"))
}

/// xs:anyURI; only emptiness is rejected
pub fn any_uri(value: &str) -> LexicalResult<String> {
    let value = collapse_whitespace(value);
    if value.is_empty() {
        Err(LexicalError::new("a non-empty URI"))
    } else {
        Ok(value)
    }
}

/// xs:language
pub fn language(value: &str) -> LexicalResult<String> {
    let value = collapse_whitespace(value);
    if LANGUAGE.is_match(&value) {
        Ok(value)
    } else {
        Err(LexicalError::new("a language tag"))
    }
}

/// xs:nonNegativeInteger with arbitrary precision
pub fn non_negative_integer(value: &str) -> LexicalResult<BigUint> {
    let value = collapse_whitespace(value);
    let digits = value.strip_prefix('+').unwrap_or(&value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LexicalError::new("a non-negative integer"));
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(LexicalError::new("a non-negative integer"))
}

/// xs:positiveInteger with arbitrary precision
pub fn positive_integer(value: &str) -> LexicalResult<BigUint> {
    let integer = non_negative_integer(value).map_err(|_| LexicalError::new("a positive integer"))?;
    if integer == BigUint::from(0u8) {
        Err(LexicalError::new("a positive integer"))
    } else {
        Ok(integer)
    }
}

/// xs:token; any collapsed value
pub fn token(value: &str) -> LexicalResult<String> {
    Ok(collapse_whitespace(value))
}

/// xs:string; the value is kept as written
pub fn string(value: &str) -> LexicalResult<String> {
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boolean() {
        assert_eq!(boolean("true"), Ok(true));
        assert_eq!(boolean(" 1\n"), Ok(true));
        assert_eq!(boolean("false"), Ok(false));
        assert_eq!(boolean("\t0 "), Ok(false));

        assert!(boolean("TRUE").is_err());
        assert!(boolean("yes").is_err());
        assert!(boolean("").is_err());
        assert!(boolean("t rue").is_err());
    }

    #[test]
    fn test_ncname_and_id() {
        assert_eq!(ncname("  foo.bar-baz_1 ").as_deref(), Ok("foo.bar-baz_1"));
        assert!(ncname("1abc").is_err());
        assert!(ncname("a:b").is_err());
        assert!(ncname("a b").is_err());
        assert_eq!(id("_x").as_deref(), Ok("_x"));
        assert!(id("").is_err());
    }

    #[test]
    fn test_any_uri() {
        assert_eq!(any_uri(" http://example.org/foo ").as_deref(), Ok("http://example.org/foo"));
        assert_eq!(any_uri("relative/path.xsd").as_deref(), Ok("relative/path.xsd"));
        assert!(any_uri("").is_err());
        assert!(any_uri("  ").is_err());
    }

    #[test]
    fn test_language() {
        assert!(language("en").is_ok());
        assert!(language("en-US").is_ok());
        assert!(language("x-klingon-1234567890abc").is_ok());
        assert!(language(" de ").is_ok());

        assert!(language("").is_err());
        assert!(language("toolongtag").is_err());
        assert!(language("en_US").is_err());
        assert!(language("en-").is_err());
        assert!(language("1en").is_err());
    }

    #[test]
    fn test_non_negative_integer() {
        assert_eq!(
            non_negative_integer("+0001234567890"),
            Ok(BigUint::from(1234567890u64))
        );
        assert_eq!(non_negative_integer("0"), Ok(BigUint::from(0u32)));
        assert_eq!(non_negative_integer(" 42 "), Ok(BigUint::from(42u32)));

        let huge = "123456789012345678901234567890123456789012345678901234567890";
        assert_eq!(non_negative_integer(huge).unwrap().to_string(), huge);

        assert!(non_negative_integer("-1").is_err());
        assert!(non_negative_integer("+").is_err());
        assert!(non_negative_integer("1.0").is_err());
        assert!(non_negative_integer("").is_err());
        assert!(non_negative_integer("++1").is_err());
    }

    #[test]
    fn test_positive_integer() {
        assert_eq!(positive_integer("+01"), Ok(BigUint::from(1u32)));
        assert!(positive_integer("0").is_err());
        assert!(positive_integer("+000").is_err());
    }

    #[test]
    fn test_token_and_string() {
        assert_eq!(token("  a   b ").as_deref(), Ok("a b"));
        assert_eq!(string("  a   b ").as_deref(), Ok("  a   b "));
    }

    proptest! {
        #[test]
        fn prop_true_literals_with_padding(lit in prop::sample::select(vec!["true", "1"]),
                                           pre in "[ \t\r\n]{0,4}", post in "[ \t\r\n]{0,4}") {
            prop_assert_eq!(boolean(&format!("{pre}{lit}{post}")), Ok(true));
        }

        #[test]
        fn prop_false_literals_with_padding(lit in prop::sample::select(vec!["false", "0"]),
                                            pre in "[ \t\r\n]{0,4}", post in "[ \t\r\n]{0,4}") {
            prop_assert_eq!(boolean(&format!("{pre}{lit}{post}")), Ok(false));
        }

        #[test]
        fn prop_other_boolean_literals_fail(raw in "[a-zA-Z0-9]{0,6}") {
            prop_assume!(!["true", "false", "1", "0"].contains(&raw.as_str()));
            prop_assert!(boolean(&raw).is_err());
        }

        #[test]
        fn prop_integer_magnitude_ignores_sign_and_zeros(plus in any::<bool>(), zeros in 0usize..6,
                                                         digits in "[1-9][0-9]{0,40}") {
            let raw = format!("{}{}{}", if plus { "+" } else { "" }, "0".repeat(zeros), digits);
            let parsed = non_negative_integer(&raw).unwrap();
            prop_assert_eq!(parsed.to_string(), digits);
        }
    }
}
