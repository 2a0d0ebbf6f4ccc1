//! Schema root
//!
//! A [`Schema`] is the immutable root of a rule tree: a title, the
//! namespace declarations its XPath expressions may use, and the
//! patterns to evaluate. Schemas are built once through
//! [`SchemaBuilder`], which checks every rule expression up front so
//! malformed schemas fault at build time instead of mid-run, and are
//! then safe to share across validation runs.

use crate::documents::Document;
use crate::error::Result;
use crate::xpath::NamespaceMap;

use super::diagnostics::Diagnostic;
use super::scopes::{Pattern, Scope};

/// One declared namespace binding
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Prefix usable in rule and context expressions
    pub prefix: String,
    /// Namespace URI
    pub uri: String,
}

/// A complete link-rule schema
#[derive(Debug, Clone)]
pub struct Schema {
    /// Human-readable title
    pub title: String,
    /// Declared namespace bindings
    pub namespaces: Vec<Namespace>,
    /// Patterns in declaration order
    pub patterns: Vec<Pattern>,
}

impl Schema {
    /// Start building a schema
    pub fn builder(title: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            title: title.into(),
            namespaces: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Flatten the declared namespaces into an evaluation binding table
    pub fn namespace_map(&self) -> NamespaceMap {
        self.namespaces
            .iter()
            .map(|ns| (ns.prefix.clone(), ns.uri.clone()))
            .collect()
    }

    /// Validate a document against every pattern
    ///
    /// Returns the concatenated diagnostic sequence in evaluation order.
    /// Engine faults (malformed expressions, undeclared prefixes)
    /// terminate the run and discard findings collected so far.
    pub fn validate(&self, document: &Document) -> Result<Vec<Diagnostic>> {
        let namespaces = self.namespace_map();
        let mut diagnostics = Vec::new();
        for pattern in &self.patterns {
            diagnostics.extend(pattern.validate(document, &namespaces)?);
        }
        Ok(diagnostics)
    }
}

/// Fluent builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    title: String,
    namespaces: Vec<Namespace>,
    patterns: Vec<Pattern>,
}

impl SchemaBuilder {
    /// Declare a namespace binding
    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push(Namespace {
            prefix: prefix.into(),
            uri: uri.into(),
        });
        self
    }

    /// Add a pattern
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Finish the schema, checking every expression
    ///
    /// Rule expressions must extract scalar values and parse in the
    /// supported XPath subset; context expressions must parse. Defects
    /// surface here as faults rather than during a run.
    pub fn build(self) -> Result<Schema> {
        let schema = Schema {
            title: self.title,
            namespaces: self.namespaces,
            patterns: self.patterns,
        };

        let namespaces = schema.namespace_map();
        for pattern in &schema.patterns {
            crate::xpath::parse_steps(&pattern.context)?;
            for scope in &pattern.scopes {
                check_scope(scope, &namespaces)?;
            }
        }

        Ok(schema)
    }
}

fn check_scope(scope: &Scope, namespaces: &NamespaceMap) -> Result<()> {
    crate::xpath::parse_steps(&scope.context)?;
    for rule in &scope.rules {
        rule.handles(namespaces)?;
    }
    for nested in &scope.scopes {
        check_scope(nested, namespaces)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{Direction, Required, Rule};

    fn sample_schema() -> Schema {
        Schema::builder("cross-references")
            .namespace("d", "http://example.com/doc")
            .pattern(
                Pattern::new("section ids", "/").scope(
                    Scope::new(".").rule(
                        Rule::new("//s/@id/text()")
                            .direction(Direction::Both)
                            .required(Required::Forward)
                            .assert("@id/text()", "//t/@id/text()"),
                    ),
                ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_namespace_map_flattening() {
        let schema = sample_schema();
        let map = schema.namespace_map();
        assert_eq!(map.get("d").unwrap(), "http://example.com/doc");
    }

    #[test]
    fn test_build_rejects_opaque_rule() {
        let result = Schema::builder("bad")
            .pattern(
                Pattern::new("p", "/")
                    .scope(Scope::new(".").rule(Rule::new("//s").assert("@id/text()", "//t"))),
            )
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_malformed_context() {
        let result = Schema::builder("bad")
            .pattern(Pattern::new("p", "//@/x").scope(Scope::new(".")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_clean_document() {
        let doc = Document::from_string("<r><s id=\"1\"/><t id=\"1\"/></r>").unwrap();
        let schema = sample_schema();
        assert!(schema.validate(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_validate_collects_all_patterns() {
        let doc = Document::from_string("<r><s id=\"1\"/><t id=\"2\"/></r>").unwrap();
        let schema = Schema::builder("two patterns")
            .pattern(
                Pattern::new("first", "/").scope(
                    Scope::new(".").rule(
                        Rule::new("//s/@id/text()")
                            .required(Required::Forward)
                            .assert("@id/text()", "//t/@id/text()"),
                    ),
                ),
            )
            .pattern(
                Pattern::new("second", "/").scope(
                    Scope::new(".").rule(
                        Rule::new("//t/@id/text()")
                            .required(Required::Forward)
                            .assert("@id/text()", "//s/@id/text()"),
                    ),
                ),
            )
            .build()
            .unwrap();

        let diags = schema.validate(&doc).unwrap();
        assert_eq!(diags.len(), 2);
        // Pattern declaration order is preserved
        assert!(matches!(&diags[0], Diagnostic::LinkBroken { value, .. } if value == "1"));
        assert!(matches!(&diags[1], Diagnostic::LinkBroken { value, .. } if value == "2"));
    }
}
