//! End-to-end validation tests
//!
//! These tests drive the public API the way an embedding application
//! would: build a schema, parse a document, validate, and inspect the
//! diagnostic sequence and its rendered report lines.

use xmlxref::{
    Diagnostic, Direction, Document, Pattern, Required, Rule, Schema, Scope,
};

fn id_schema(direction: Direction, required: Required) -> Schema {
    Schema::builder("ids")
        .pattern(
            Pattern::new("s to t", "/").scope(
                Scope::new(".").rule(
                    Rule::new("//s/@id/text()")
                        .direction(direction)
                        .required(required)
                        .assert("@id/text()", "//t/@id/text()"),
                ),
            ),
        )
        .build()
        .unwrap()
}

#[test]
fn resolvable_forward_link_is_clean() {
    let doc = Document::from_string("<r xmlns=\"u\"><s id=\"1\"/><t id=\"1\"/></r>").unwrap();
    let schema = id_schema(Direction::Forward, Required::Forward);
    assert!(schema.validate(&doc).unwrap().is_empty());
}

#[test]
fn broken_forward_link_is_reported() {
    let doc = Document::from_string("<r xmlns=\"u\"><s id=\"1\"/><t id=\"2\"/></r>").unwrap();
    let schema = id_schema(Direction::Forward, Required::Forward);

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::LinkBroken {
            source_xpath,
            target_xpath,
            line,
            value,
        } => {
            assert!(source_xpath.ends_with("//s/@id/text()"));
            assert!(target_xpath.ends_with("//t/@id/text()"));
            assert_eq!(*line, 1);
            assert_eq!(value, "1");
        }
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn missing_required_child_is_reported() {
    let doc = Document::from_string("<r xmlns=\"u\"><s id=\"1\"/></r>").unwrap();
    let schema = Schema::builder("ids")
        .pattern(
            Pattern::new("s to t", "/").scope(
                Scope::new(".").rule(
                    Rule::new("//s/@id/text()")
                        .required(Required::Forward)
                        .assert("ref/text()", "//t/@id/text()"),
                ),
            ),
        )
        .build()
        .unwrap();

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::ChildMissing { value, .. } => assert_eq!(value, "1"),
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn blank_attribute_value_is_reported_missing() {
    let doc = Document::from_string("<r xmlns=\"u\"><s id=\"   \"/></r>").unwrap();
    let schema = id_schema(Direction::Forward, Required::Forward);

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::ValueMissing { xpath, line } => {
            assert!(xpath.ends_with("//s/@id/text()"));
            assert_eq!(*line, 1);
        }
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn backward_required_reports_unreferenced_target_only() {
    let doc = Document::from_string("<r xmlns=\"u\"><s id=\"A\"/><t id=\"B\"/></r>").unwrap();
    let schema = id_schema(Direction::Both, Required::Backward);

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::LinkBroken { value, .. } => assert_eq!(value, "B"),
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn scope_prefix_labels_diagnostics() {
    let doc = Document::from_string("<r xmlns=\"u\"><p><s id=\"1\"/></p></r>").unwrap();
    let schema = Schema::builder("scoped")
        .pattern(
            Pattern::new("inside p", "/").scope(
                Scope::new("//p").rule(
                    Rule::new("//s/@id/text()")
                        .required(Required::Forward)
                        .assert("@id/text()", "//t/@id/text()"),
                ),
            ),
        )
        .build()
        .unwrap();

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::LinkBroken {
            source_xpath,
            target_xpath,
            ..
        } => {
            assert!(source_xpath.starts_with("//p/"));
            assert!(target_xpath.starts_with("//p/"));
        }
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

#[test]
fn validation_is_deterministic() {
    let doc = Document::from_string(
        "<r>\n<s id=\"1\"/>\n<s id=\" \"/>\n<s id=\"2\"/>\n<t id=\"2\"/>\n</r>",
    )
    .unwrap();
    let schema = id_schema(Direction::Both, Required::Both);

    let first: Vec<String> = schema
        .validate(&doc)
        .unwrap()
        .iter()
        .map(|d| d.to_string())
        .collect();
    for _ in 0..3 {
        let again: Vec<String> = schema
            .validate(&doc)
            .unwrap()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(first, again);
    }
    assert!(!first.is_empty());
}

#[test]
fn duplicate_findings_are_preserved() {
    // The blank source value is sighted by the forward pass and again by
    // the backward pass; both sightings are kept
    let doc = Document::from_string("<r><s id=\" \"/><t id=\"B\"/></r>").unwrap();
    let schema = id_schema(Direction::Both, Required::None);

    let diags = schema.validate(&doc).unwrap();
    let missing = diags
        .iter()
        .filter(|d| matches!(d, Diagnostic::ValueMissing { .. }))
        .count();
    assert_eq!(missing, 2);
}

#[test]
fn both_direction_link_facts_are_symmetric() {
    // With required in both directions the dangling value is reported
    // from each side
    let doc = Document::from_string("<r><s id=\"A\"/><t id=\"B\"/></r>").unwrap();
    let schema = id_schema(Direction::Both, Required::Both);

    let diags = schema.validate(&doc).unwrap();
    let values: Vec<&str> = diags
        .iter()
        .filter_map(|d| match d {
            Diagnostic::LinkBroken { value, .. } => Some(value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec!["A", "B"]);
}

#[test]
fn moving_a_rule_into_a_child_scope_keeps_findings() {
    let xml = "<r>\n<p>\n<s id=\"1\"/>\n</p>\n</r>";
    let rule = || {
        Rule::new("//s/@id/text()")
            .required(Required::Forward)
            .assert("@id/text()", "//t/@id/text()")
    };

    let flat = Schema::builder("flat")
        .pattern(Pattern::new("p", "/").scope(Scope::new("//p").rule(rule())))
        .build()
        .unwrap();
    let nested = Schema::builder("nested")
        .pattern(
            Pattern::new("p", "/")
                .scope(Scope::new("//p").scope(Scope::new(".").rule(rule()))),
        )
        .build()
        .unwrap();

    let doc = Document::from_string(xml).unwrap();
    let flat_diags = flat.validate(&doc).unwrap();
    let nested_diags = nested.validate(&doc).unwrap();

    assert_eq!(flat_diags.len(), 1);
    assert_eq!(nested_diags.len(), 1);
    // Same finding either way; the deeper arrangement shows the longer prefix
    match (&flat_diags[0], &nested_diags[0]) {
        (
            Diagnostic::LinkBroken {
                line: a,
                value: va,
                source_xpath: flat_path,
                ..
            },
            Diagnostic::LinkBroken {
                line: b,
                value: vb,
                source_xpath: nested_path,
                ..
            },
        ) => {
            assert_eq!(a, b);
            assert_eq!(va, vb);
            assert!(flat_path.starts_with("//p/"));
            assert!(nested_path.starts_with("//p/./"));
        }
        other => panic!("unexpected diagnostics {:?}", other),
    }
}

#[test]
fn report_lines_use_the_wire_format() {
    let doc = Document::from_string(
        "<doc>\n<section ID=\"s1\"/>\n<xref IDref=\"s9\"/>\n</doc>",
    )
    .unwrap();
    let rule = Rule::new("//xref/@IDref/text()")
        .required(Required::Forward)
        .assert("@IDref/text()", "//section/@ID/text()");

    let ns = std::collections::HashMap::new();
    let diags = rule
        .validate(doc.root().unwrap(), None, &ns)
        .unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].to_string(),
        "source element \"//xref/@IDref/text()\" on line 3: \
         target element \"//section/@ID/text()\" with text \"s9\" is NOT FOUND"
    );
}

#[test]
fn namespaced_rules_resolve_prefixes() {
    let doc = Document::from_string(
        "<r xmlns:d=\"http://example.com/doc\"><d:s id=\"1\"/><t id=\"1\"/><s id=\"2\"/></r>",
    )
    .unwrap();
    let schema = Schema::builder("namespaced")
        .namespace("d", "http://example.com/doc")
        .pattern(
            Pattern::new("only d:s", "/").scope(
                Scope::new(".").rule(
                    Rule::new("//d:s/@id/text()")
                        .required(Required::Forward)
                        .assert("@id/text()", "//t/@id/text()"),
                ),
            ),
        )
        .build()
        .unwrap();

    // d:s resolves; the unprefixed s with the dangling id is not selected
    let doc_diags = schema.validate(&doc).unwrap();
    assert!(doc_diags.is_empty());
}

#[test]
fn undeclared_prefix_is_a_fault_not_a_finding() {
    let doc = Document::from_string("<r><s id=\"1\"/></r>").unwrap();
    let schema = Schema::builder("bad prefix")
        .pattern(
            Pattern::new("p", "/").scope(
                Scope::new(".").rule(
                    Rule::new("//x:s/@id/text()")
                        .required(Required::Forward)
                        .assert("@id/text()", "//t/@id/text()"),
                ),
            ),
        )
        .build()
        .unwrap();

    assert!(schema.validate(&doc).is_err());
}

#[test]
fn multiple_sources_report_in_document_order() {
    let doc = Document::from_string(
        "<r>\n<s id=\"x\"/>\n<s id=\"y\"/>\n<t id=\"z\"/>\n</r>",
    )
    .unwrap();
    let schema = id_schema(Direction::Forward, Required::Forward);

    let diags = schema.validate(&doc).unwrap();
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].line(), 2);
    assert_eq!(diags[1].line(), 3);
}
