//! # xsd-grammar
//!
//! A grammar-driven parser for XML Schema 1.0 documents.
//!
//! Every XSD element is parsed under a grammar [`Context`]: the production
//! of the schema-for-schemas that says which attributes the element may
//! carry, how their values are validated, and which children may follow in
//! which order. A successful parse yields a strongly-typed [`Schema`] tree;
//! the first violation aborts the parse with an [`Error`] naming the
//! context and the offending attribute or child.
//!
//! The parser is purely syntactic. References between components are kept
//! as resolved QNames but never followed, and `include`, `import` and
//! `redefine` locations are not loaded.
//!
//! ## Example
//!
//! ```rust
//! use xsd_grammar::{parse, Error};
//!
//! let schema = parse(
//!     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!                   targetNamespace="urn:notes">
//!          <xs:element name="note" type="xs:string"/>
//!        </xs:schema>"#,
//! )?;
//! assert_eq!(schema.target_namespace(), Some("urn:notes"));
//! assert!(schema.element("note").is_some());
//!
//! let err = parse(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" colour="red"/>"#)
//!     .unwrap_err();
//! assert!(matches!(err, Error::UnexpectedAttribute { .. }));
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;

pub mod names;
pub mod namespaces;

pub mod documents;
pub mod validators;

pub mod grammar;
pub mod model;
pub mod parsing;

pub use error::{Error, LexicalError, Result};
pub use grammar::Context;
pub use limits::Limits;
pub use model::{Record, Schema};
pub use parsing::{parse, parse_file, parse_with_limits};

/// Version of the xsd-grammar library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
