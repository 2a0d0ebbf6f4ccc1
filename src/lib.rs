//! # xmlxref
//!
//! Cross-reference link validation for XML documents.
//!
//! Given an XML document carrying identifiers and references between
//! elements, this library checks that every configured reference
//! resolves to a matching identifier and reports a structured
//! diagnostic per broken or missing link. Rules are declared as a
//! schema of patterns, nested scopes and link rules, each addressing
//! the document through a small XPath subset.
//!
//! ## Example
//!
//! ```
//! use xmlxref::{Document, Pattern, Required, Rule, Schema, Scope};
//!
//! let schema = Schema::builder("cross-references")
//!     .pattern(
//!         Pattern::new("xref targets", "/").scope(
//!             Scope::new(".").rule(
//!                 Rule::new("//xref/@IDref/text()")
//!                     .required(Required::Forward)
//!                     .assert("@IDref/text()", "//section/@ID/text()"),
//!             ),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let doc = Document::from_string(
//!     r#"<doc><section ID="s1"/><xref IDref="s2"/></doc>"#,
//! )
//! .unwrap();
//!
//! let diagnostics = schema.validate(&doc).unwrap();
//! assert_eq!(diagnostics.len(), 1);
//! for diagnostic in &diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! ```
//!
//! Validation findings and engine faults travel on separate channels:
//! findings accumulate into the returned sequence, while malformed
//! expressions or undeclared prefixes abort the run with an
//! [`Error`].

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod namespaces;

// Document model
pub mod documents;

// XPath support
pub mod xpath;

// The link-rule engine
pub mod validators;

// Re-exports for convenience
pub use documents::{Document, Element};
pub use error::{Error, Result};
pub use validators::{
    Assertion, Diagnostic, Direction, Namespace, Pattern, Required, Rule, Schema, SchemaBuilder,
    Scope, Validator,
};
pub use xpath::{ValueKind, XPathHandle};

/// Version of the xmlxref library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
