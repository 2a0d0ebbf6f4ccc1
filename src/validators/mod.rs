//! The link-rule engine
//!
//! This module holds the schema object model and the validator that
//! enforces it:
//!
//! - [`Schema`] / [`Pattern`] / [`Scope`] / [`Rule`]: the declarative
//!   rule tree, built once and immutable afterwards.
//! - [`Validator`]: the bidirectional link checker a rule instantiates
//!   per evaluation.
//! - [`Diagnostic`]: one validation finding.

pub mod diagnostics;
pub mod rules;
pub mod schemas;
pub mod scopes;
pub mod validation;

pub use diagnostics::Diagnostic;
pub use rules::{Assertion, Rule};
pub use schemas::{Namespace, Schema, SchemaBuilder};
pub use scopes::{Pattern, Scope};
pub use validation::{Direction, Required, Validator};
