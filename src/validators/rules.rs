//! Link rules
//!
//! A [`Rule`] declares one cross-reference obligation: a source
//! selection, an ordered list of [`Assertion`]s pairing a child
//! selection with a target selection, a direction and a required-ness
//! mode. Rules are plain data; evaluating one resolves its expressions
//! into handles bound to the schema namespace table and runs a
//! [`Validator`](super::Validator).

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::xpath::{NamespaceMap, XPathHandle};

use super::diagnostics::Diagnostic;
use super::validation::{Direction, Required, Validator};

/// One child/target pairing of a rule
#[derive(Debug, Clone)]
pub struct Assertion {
    /// Selection of the referencing value, relative to a source node
    pub child: String,
    /// Selection of the referenced value, relative to the context node
    pub target: String,
}

/// A cross-reference rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Selection of the source nodes, relative to the context node
    pub source: String,
    /// Ordered child/target assertions
    pub assertions: Vec<Assertion>,
    /// Which direction(s) are checked
    pub direction: Direction,
    /// Which direction(s) promote unresolved links to findings
    pub required: Required,
}

impl Rule {
    /// Create a rule for a source selection
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            assertions: Vec::new(),
            direction: Direction::default(),
            required: Required::default(),
        }
    }

    /// Set the direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the required-ness mode
    pub fn required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    /// Add a child/target assertion
    pub fn assert(mut self, child: impl Into<String>, target: impl Into<String>) -> Self {
        self.assertions.push(Assertion {
            child: child.into(),
            target: target.into(),
        });
        self
    }

    /// Resolve the rule's expressions into handles bound to `namespaces`
    ///
    /// Every expression of a rule must extract a scalar string; an opaque
    /// expression here is a schema defect, reported as a fault.
    pub fn handles(
        &self,
        namespaces: &NamespaceMap,
    ) -> Result<(XPathHandle, Vec<(XPathHandle, XPathHandle)>)> {
        let source = scalar_handle(&self.source, namespaces)?;
        let mut targets = Vec::with_capacity(self.assertions.len());
        for assertion in &self.assertions {
            targets.push((
                scalar_handle(&assertion.child, namespaces)?,
                scalar_handle(&assertion.target, namespaces)?,
            ));
        }
        Ok((source, targets))
    }

    /// Evaluate the rule at a context node
    ///
    /// `prefix` labels diagnostic XPaths; selection stays relative to
    /// `node`.
    pub fn validate(
        &self,
        node: &Element,
        prefix: Option<&XPathHandle>,
        namespaces: &NamespaceMap,
    ) -> Result<Vec<Diagnostic>> {
        let (source, targets) = self.handles(namespaces)?;
        Validator::new(source, targets, self.direction, self.required).validate(node, prefix)
    }
}

/// Build a handle and require that it extracts a scalar value
fn scalar_handle(expression: &str, namespaces: &NamespaceMap) -> Result<XPathHandle> {
    let handle = XPathHandle::new(expression, namespaces.clone());
    if !handle.value_kind().is_scalar() {
        return Err(Error::Schema(format!(
            "rule expression '{}' extracts no value; it must end in /text() or /@NAME/text()",
            expression
        )));
    }
    handle.check()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    #[test]
    fn test_rule_defaults() {
        let rule = Rule::new("//s/@id/text()");
        assert_eq!(rule.direction, Direction::Forward);
        assert_eq!(rule.required, Required::None);
        assert!(rule.assertions.is_empty());
    }

    #[test]
    fn test_rule_chaining() {
        let rule = Rule::new("//s/@id/text()")
            .direction(Direction::Both)
            .required(Required::Forward)
            .assert("@id/text()", "//t/@id/text()")
            .assert("ref/text()", "//u/@id/text()");
        assert_eq!(rule.direction, Direction::Both);
        assert_eq!(rule.required, Required::Forward);
        assert_eq!(rule.assertions.len(), 2);
        assert_eq!(rule.assertions[0].child, "@id/text()");
        assert_eq!(rule.assertions[1].target, "//u/@id/text()");
    }

    #[test]
    fn test_opaque_expression_is_schema_fault() {
        let ns = NamespaceMap::new();
        let rule = Rule::new("//s").assert("@id/text()", "//t/@id/text()");
        assert!(matches!(rule.handles(&ns), Err(Error::Schema(_))));

        let rule = Rule::new("//s/@id/text()").assert("@id/text()", "//t");
        assert!(matches!(rule.handles(&ns), Err(Error::Schema(_))));
    }

    #[test]
    fn test_rule_validate() {
        let doc = Document::from_string("<r><s id=\"1\"/><t id=\"2\"/></r>").unwrap();
        let ns = NamespaceMap::new();
        let rule = Rule::new("//s/@id/text()")
            .required(Required::Forward)
            .assert("@id/text()", "//t/@id/text()");

        let diags = rule.validate(doc.root().unwrap(), None, &ns).unwrap();
        assert_eq!(diags.len(), 1);
        assert!(matches!(&diags[0], Diagnostic::LinkBroken { value, .. } if value == "1"));
    }
}
