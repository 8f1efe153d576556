//! Keyword-valued attributes: `form`, `use` and the `whiteSpace` facet value

use std::str::FromStr;

use serde::Serialize;

use crate::error::LexicalError;

/// `form`, `elementFormDefault`, `attributeFormDefault`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    /// Local names are in the target namespace
    Qualified,
    /// Local names are in no namespace
    #[default]
    Unqualified,
}

impl Form {
    /// Check if this form is qualified
    pub fn is_qualified(self) -> bool {
        self == Self::Qualified
    }
}

impl FromStr for Form {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qualified" => Ok(Self::Qualified),
            "unqualified" => Ok(Self::Unqualified),
            _ => Err(LexicalError::new("'qualified' or 'unqualified'")),
        }
    }
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Qualified => write!(f, "qualified"),
            Self::Unqualified => write!(f, "unqualified"),
        }
    }
}

/// `use` on local attribute declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Use {
    /// Attribute may appear
    #[default]
    Optional,
    /// Attribute must not appear
    Prohibited,
    /// Attribute must appear
    Required,
}

impl FromStr for Use {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optional" => Ok(Self::Optional),
            "prohibited" => Ok(Self::Prohibited),
            "required" => Ok(Self::Required),
            _ => Err(LexicalError::new("one of 'optional', 'prohibited' or 'required'")),
        }
    }
}

/// `value` of the `whiteSpace` facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WhiteSpace {
    /// Keep whitespace as is
    Preserve,
    /// Replace tab, line feed and carriage return with spaces
    Replace,
    /// Replace, then collapse runs and trim
    Collapse,
}

impl FromStr for WhiteSpace {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(Self::Preserve),
            "replace" => Ok(Self::Replace),
            "collapse" => Ok(Self::Collapse),
            _ => Err(LexicalError::new("one of 'preserve', 'replace' or 'collapse'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form() {
        assert_eq!("qualified".parse::<Form>(), Ok(Form::Qualified));
        assert!(!Form::default().is_qualified());
        assert!("Qualified".parse::<Form>().is_err());
    }

    #[test]
    fn test_use() {
        assert_eq!("prohibited".parse::<Use>(), Ok(Use::Prohibited));
        assert_eq!(Use::default(), Use::Optional);
        assert!("mandatory".parse::<Use>().is_err());
    }

    #[test]
    fn test_white_space() {
        assert_eq!("collapse".parse::<WhiteSpace>(), Ok(WhiteSpace::Collapse));
        assert!("trim".parse::<WhiteSpace>().is_err());
    }
}
