//! XML namespace handling
//!
//! This module provides qualified names (QNames) and the namespace prefix
//! context used both while parsing documents and while evaluating XPath
//! name tests.

use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
///
/// Holds the in-scope `xmlns` declarations of one element, inherited down
/// the tree during parsing.
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Resolve an element name to a QName
    ///
    /// Unprefixed names take the in-scope default namespace; prefixed names
    /// resolve through the declared prefixes. Unknown prefixes resolve to a
    /// namespace-less QName, matching how the document parser tolerates
    /// vocabulary it does not know about.
    pub fn resolve_element(&self, name: &str) -> QName {
        if let Some((prefix, local)) = name.split_once(':') {
            match self.get_namespace(prefix) {
                Some(ns) => QName::namespaced(ns, local),
                None => QName::local(local),
            }
        } else {
            QName::new(self.default_namespace.clone(), name)
        }
    }

    /// Resolve an attribute name to a QName
    ///
    /// Unlike elements, unprefixed attributes never take the default
    /// namespace.
    pub fn resolve_attribute(&self, name: &str) -> QName {
        if let Some((prefix, local)) = name.split_once(':') {
            match self.get_namespace(prefix) {
                Some(ns) => QName::namespaced(ns, local),
                None => QName::local(local),
            }
        } else {
            QName::local(name)
        }
    }
}
