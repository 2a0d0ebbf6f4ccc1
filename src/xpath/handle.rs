//! XPath handles
//!
//! An [`XPathHandle`] wraps an XPath expression together with its
//! namespace bindings and the kind of value it extracts from a selected
//! node. The trailing *value suffix* of the expression decides the kind:
//! `/@NAME/text()` reads the attribute NAME, `/text()` reads the element
//! text, and anything else selects nodes without extracting a value.

use crate::documents::Element;
use crate::error::Result;

use super::selectors::{parse_steps, select_from};
use super::NamespaceMap;

/// Pattern for the attribute value suffix `.../@NAME/text()`
const ATTRIBUTE_SUFFIX_PATTERN: &str = r"^(.*?)/?@([A-Za-z_][A-Za-z0-9._-]*)/text\(\)$";

/// Pattern for the element text value suffix `.../text()`
const TEXT_SUFFIX_PATTERN: &str = r"^(.*?)/?text\(\)$";

lazy_static::lazy_static! {
    static ref ATTRIBUTE_SUFFIX_REGEX: regex::Regex =
        regex::Regex::new(ATTRIBUTE_SUFFIX_PATTERN).unwrap();
    static ref TEXT_SUFFIX_REGEX: regex::Regex =
        regex::Regex::new(TEXT_SUFFIX_PATTERN).unwrap();
}

/// How a selected node is converted to a comparable string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Read the named attribute of the selected node
    Attribute(String),
    /// Read the text content of the selected node
    Text,
    /// Selection only; no value extraction
    Opaque,
}

impl ValueKind {
    /// Check whether this kind extracts a scalar string
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ValueKind::Opaque)
    }
}

/// An XPath expression bound to namespace declarations
///
/// Handles are immutable values. Composition concatenates selection
/// paths and unions namespace bindings, with the right-hand side winning
/// on prefix collisions.
#[derive(Debug, Clone)]
pub struct XPathHandle {
    expression: String,
    selection: String,
    value_kind: ValueKind,
    namespaces: NamespaceMap,
}

impl XPathHandle {
    /// Create a handle, deriving the value kind from the expression's
    /// trailing value suffix
    pub fn new(expression: impl Into<String>, namespaces: NamespaceMap) -> Self {
        let expression = expression.into();
        let (value_kind, selection) =
            if let Some(caps) = ATTRIBUTE_SUFFIX_REGEX.captures(&expression) {
                (
                    ValueKind::Attribute(caps[2].to_string()),
                    caps[1].to_string(),
                )
            } else if let Some(caps) = TEXT_SUFFIX_REGEX.captures(&expression) {
                (ValueKind::Text, caps[1].to_string())
            } else {
                (ValueKind::Opaque, expression.clone())
            };

        Self {
            expression,
            selection,
            value_kind,
            namespaces,
        }
    }

    /// The full original expression, used verbatim in diagnostics
    pub fn display(&self) -> &str {
        &self.expression
    }

    /// The expression with the trailing value suffix stripped
    pub fn without_value_suffix(&self) -> &str {
        &self.selection
    }

    /// The kind of value this handle extracts
    pub fn value_kind(&self) -> &ValueKind {
        &self.value_kind
    }

    /// The namespace bindings of this handle
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Check that the selection path parses in the supported subset
    pub fn check(&self) -> Result<()> {
        parse_steps(&self.selection)?;
        Ok(())
    }

    /// Compose this handle with another: `self/other`
    ///
    /// The result selects along this handle's suffix-stripped path
    /// extended by the other's full expression, and carries the union of
    /// both namespace maps (the other's bindings win on collision).
    pub fn compose(&self, other: &XPathHandle) -> XPathHandle {
        let expression = format!("{}/{}", self.selection, other.expression);
        let mut namespaces = self.namespaces.clone();
        namespaces.extend(other.namespaces.iter().map(|(k, v)| (k.clone(), v.clone())));
        XPathHandle::new(expression, namespaces)
    }

    /// Select nodes matching the suffix-stripped path, in document order
    ///
    /// An empty selection path (an expression that was all value suffix,
    /// like `@ref/text()`) selects the context node itself.
    pub fn select<'a>(&self, node: &'a Element) -> Result<Vec<&'a Element>> {
        let steps = parse_steps(&self.selection)?;
        select_from(vec![node], &steps, &self.namespaces)
    }

    /// Extract the comparable string value of a selected node
    ///
    /// Returns `None` when the node has no usable value: a missing or
    /// blank attribute, empty text, element children (mixed content), or
    /// an opaque handle.
    pub fn value_of(&self, node: &Element) -> Option<String> {
        match &self.value_kind {
            ValueKind::Attribute(name) => {
                let value = node.attribute(name)?.trim();
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            ValueKind::Text => {
                if !node.children.is_empty() {
                    return None;
                }
                let value = node.text()?.trim();
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            ValueKind::Opaque => None,
        }
    }
}
