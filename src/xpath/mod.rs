//! XPath support for link validation
//!
//! This module provides the XPath machinery the link-rule engine runs on:
//!
//! - [`selectors`]: path splitting and a step-based node selector over the
//!   document tree.
//! - [`handle`]: [`XPathHandle`], which pairs an expression with its
//!   namespace bindings and the value it extracts from selected nodes.
//!
//! ## Limitations
//!
//! The selector subset covers the child axis, `//`, `.`, wildcards and
//! prefixed name tests. Predicates and the parent axis are rejected as
//! engine faults rather than silently ignored.

pub mod handle;
pub mod selectors;

pub use handle::{ValueKind, XPathHandle};
pub use selectors::{parse_steps, split_path, PathStep, PathStepKind};

use std::collections::HashMap;

/// Namespace mapping type (prefix to URI)
pub type NamespaceMap = HashMap<String, String>;
