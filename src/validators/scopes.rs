//! Contextual scopes and patterns
//!
//! A [`Scope`] narrows where its rules apply: its context expression is
//! composed onto the enclosing prefix, nested scopes cascade further,
//! and rules run once per node the composed path selects. The prefix is
//! a labelling construct; selection always re-resolves the composed path
//! against the node the enclosing pattern anchored.
//!
//! A [`Pattern`] is the top-level grouping: a titled root context whose
//! matches anchor its scopes.

use crate::documents::{Document, Element};
use crate::error::Result;
use crate::xpath::{NamespaceMap, XPathHandle};

use super::diagnostics::Diagnostic;
use super::rules::Rule;

/// A contextual grouping of rules
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Context expression composed onto the enclosing prefix
    pub context: String,
    /// Nested scopes, evaluated before this scope's own rules
    pub scopes: Vec<Scope>,
    /// Rules evaluated at each node the composed path selects
    pub rules: Vec<Rule>,
}

impl Scope {
    /// Create a scope for a context expression
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            scopes: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Nest a child scope
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Add a rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Evaluate the scope against a pattern context node
    pub fn validate(
        &self,
        node: &Element,
        prefix: Option<&XPathHandle>,
        namespaces: &NamespaceMap,
    ) -> Result<Vec<Diagnostic>> {
        let context_handle = XPathHandle::new(&self.context, namespaces.clone());
        let new_prefix = match prefix {
            Some(p) => p.compose(&context_handle),
            None => context_handle,
        };

        let mut diagnostics = Vec::new();

        for scope in &self.scopes {
            diagnostics.extend(scope.validate(node, Some(&new_prefix), namespaces)?);
        }

        for anchor in new_prefix.select(node)? {
            for rule in &self.rules {
                diagnostics.extend(rule.validate(anchor, Some(&new_prefix), namespaces)?);
            }
        }

        Ok(diagnostics)
    }
}

/// A titled top-level grouping of scopes
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Human-readable title
    pub title: String,
    /// Root context expression, evaluated against the document
    pub context: String,
    /// Scopes evaluated at each context match
    pub scopes: Vec<Scope>,
}

impl Pattern {
    /// Create a pattern with a title and root context
    pub fn new(title: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            context: context.into(),
            scopes: Vec::new(),
        }
    }

    /// Add a scope
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Evaluate the pattern against a document
    ///
    /// Scopes start with no prefix: a pattern's context anchors
    /// evaluation but does not label diagnostics.
    pub fn validate(
        &self,
        document: &Document,
        namespaces: &NamespaceMap,
    ) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for context_node in document.xpath(&self.context, namespaces)? {
            for scope in &self.scopes {
                diagnostics.extend(scope.validate(context_node, None, namespaces)?);
            }
        }
        Ok(diagnostics)
    }
}
