//! XPath path steps and node selection
//!
//! This module splits XPath expressions into path steps and evaluates the
//! resulting step sequence against an [`Element`] tree. The supported
//! subset covers what link rules and scope contexts need: the child axis,
//! descendant-or-self (`//`), self (`.`), wildcard name tests and prefixed
//! name tests. Anything else is reported as an engine fault.

use crate::documents::Element;
use crate::error::{Error, Result};

use super::NamespaceMap;

/// A single step in an XPath path expression
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// The kind of step
    pub kind: PathStepKind,
    /// The local name (empty for self/descendant steps)
    pub name: String,
    /// Optional namespace prefix
    pub prefix: Option<String>,
    /// Optional predicate
    pub predicate: Option<String>,
}

impl PathStep {
    /// Parse a step from a string
    pub fn parse(step: &str) -> Result<Self> {
        let step = step.trim();

        if step == "." || step == "self::node()" {
            return Ok(Self {
                kind: PathStepKind::Self_,
                name: String::new(),
                prefix: None,
                predicate: None,
            });
        }

        if step == ".//" {
            return Ok(Self {
                kind: PathStepKind::DescendantOrSelf,
                name: String::new(),
                prefix: None,
                predicate: None,
            });
        }

        if step == ".." || step == "parent::node()" {
            return Ok(Self {
                kind: PathStepKind::Parent,
                name: String::new(),
                prefix: None,
                predicate: None,
            });
        }

        let (kind, rest) = if let Some(rest) = step.strip_prefix('@') {
            (PathStepKind::Attribute, rest)
        } else if let Some(rest) = step.strip_prefix("attribute::") {
            (PathStepKind::Attribute, rest)
        } else if let Some(rest) = step.strip_prefix("child::") {
            (PathStepKind::Child, rest)
        } else {
            (PathStepKind::Child, step)
        };

        // Extract predicate if present
        let (name_part, predicate) = if let Some(bracket_pos) = rest.find('[') {
            let name = &rest[..bracket_pos];
            let pred_end = rest.rfind(']').unwrap_or(rest.len());
            let pred = &rest[bracket_pos + 1..pred_end];
            (name, Some(pred.to_string()))
        } else {
            (rest, None)
        };

        // Extract prefix and local name
        let (prefix, name) = if let Some(colon_pos) = name_part.find(':') {
            (
                Some(name_part[..colon_pos].to_string()),
                name_part[colon_pos + 1..].to_string(),
            )
        } else {
            (None, name_part.to_string())
        };

        if name.is_empty() {
            return Err(Error::Xpath(format!("empty name test in step '{}'", step)));
        }

        Ok(Self {
            kind,
            name,
            prefix,
            predicate,
        })
    }

    /// Check if this step matches any element (*)
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }

    /// Test whether an element satisfies this step's name test
    pub fn matches(&self, elem: &Element, namespaces: &NamespaceMap) -> Result<bool> {
        if let Some(prefix) = &self.prefix {
            let uri = namespaces.get(prefix).ok_or_else(|| {
                Error::Namespace(format!("undeclared prefix '{}' in name test", prefix))
            })?;
            Ok(elem.namespace() == Some(uri.as_str())
                && (self.is_wildcard() || elem.local_name() == self.name))
        } else {
            // Unprefixed name tests match by local name alone
            Ok(self.is_wildcard() || elem.local_name() == self.name)
        }
    }
}

/// Kind of path step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStepKind {
    /// Child axis (default)
    Child,
    /// Attribute axis (@)
    Attribute,
    /// Descendant-or-self axis (//)
    DescendantOrSelf,
    /// Self axis (.)
    Self_,
    /// Parent axis (..)
    Parent,
}

/// Split an XPath expression into path steps
///
/// Handles both `/` and `//` separators; `//` becomes a `.//` pseudo-step
/// preceding the name test it applies to. Slashes inside predicates are
/// left alone.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.trim();

    if path.is_empty() {
        return Vec::new();
    }

    let mut steps = Vec::new();
    let mut current_start = 0;

    if path.starts_with(".//") {
        steps.push(".");
        steps.push(".//");
        current_start = 3;
    } else if path.starts_with("./") {
        steps.push(".");
        current_start = 2;
    } else if path == "." {
        return vec!["."];
    } else if path.starts_with("//") {
        steps.push(".//");
        current_start = 2;
    } else if path.starts_with('/') {
        current_start = 1;
    }

    let mut in_predicate = 0;
    let bytes = path.as_bytes();
    let len = bytes.len();
    let mut i = current_start;

    while i < len {
        let c = bytes[i] as char;

        match c {
            '[' => {
                in_predicate += 1;
                i += 1;
            }
            ']' => {
                in_predicate -= 1;
                i += 1;
            }
            '/' if in_predicate == 0 => {
                let is_double = i + 1 < len && bytes[i + 1] == b'/';

                if i > current_start {
                    let step = &path[current_start..i];
                    if !step.is_empty() {
                        steps.push(step);
                    }
                }

                if is_double {
                    steps.push(".//");
                    current_start = i + 2;
                    i += 2;
                } else {
                    current_start = i + 1;
                    i += 1;
                }
            }
            _ => {
                i += 1;
            }
        }
    }

    if current_start < path.len() {
        let step = &path[current_start..];
        if !step.is_empty() {
            steps.push(step);
        }
    }

    steps
}

/// Parse a whole selection expression into path steps
pub fn parse_steps(path: &str) -> Result<Vec<PathStep>> {
    split_path(path).into_iter().map(PathStep::parse).collect()
}

/// Evaluate a step sequence against an initial node set
///
/// Returns matching elements in document order. Node sets are
/// deduplicated by node identity after each step, keeping the first
/// occurrence.
pub fn select_from<'a>(
    initial: Vec<&'a Element>,
    steps: &[PathStep],
    namespaces: &NamespaceMap,
) -> Result<Vec<&'a Element>> {
    let mut current = initial;

    for step in steps {
        if step.predicate.is_some() {
            return Err(Error::Xpath(format!(
                "predicates are not supported in selection paths: '{}'",
                step.name
            )));
        }

        let next = match step.kind {
            PathStepKind::Self_ => current,
            PathStepKind::DescendantOrSelf => {
                let mut expanded = Vec::new();
                for node in current {
                    push_self_and_descendants(node, &mut expanded);
                }
                expanded
            }
            PathStepKind::Child => {
                // A grouped children-of-each-node pass would misorder
                // results when the set holds both a node and its
                // descendants: all of an ancestor's matching children
                // would come out before any deeper match that precedes
                // some of them in the document. Walk in preorder instead,
                // emitting a match the moment it is visited.
                let members: Vec<*const Element> =
                    current.iter().map(|n| *n as *const Element).collect();
                let mut children = Vec::new();
                let mut visited: Vec<*const Element> = Vec::new();
                for node in &current {
                    if visited.contains(&(*node as *const Element)) {
                        continue;
                    }
                    collect_child_matches(
                        node,
                        &members,
                        step,
                        namespaces,
                        &mut visited,
                        &mut children,
                    )?;
                }
                children
            }
            PathStepKind::Attribute => {
                return Err(Error::Xpath(
                    "attribute steps cannot select elements".to_string(),
                ));
            }
            PathStepKind::Parent => {
                return Err(Error::Xpath(
                    "the parent axis is not supported in selection paths".to_string(),
                ));
            }
        };

        current = dedup_nodes(next);
    }

    Ok(current)
}

/// Preorder walk of a subtree emitting children of set members as they
/// are visited, so a node's matches interleave with its subtree's
/// matches in document order
fn collect_child_matches<'a>(
    node: &'a Element,
    members: &[*const Element],
    step: &PathStep,
    namespaces: &NamespaceMap,
    visited: &mut Vec<*const Element>,
    out: &mut Vec<&'a Element>,
) -> Result<()> {
    visited.push(node as *const Element);
    let node_is_member = members.contains(&(node as *const Element));
    for child in &node.children {
        if node_is_member && step.matches(child, namespaces)? {
            out.push(child);
        }
        collect_child_matches(child, members, step, namespaces, visited, out)?;
    }
    Ok(())
}

/// Collect a node and all its descendants in document order
pub fn push_self_and_descendants<'a>(node: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(node);
    for child in &node.children {
        push_self_and_descendants(child, out);
    }
}

/// Drop repeated nodes, keeping the first occurrence of each
fn dedup_nodes(nodes: Vec<&Element>) -> Vec<&Element> {
    let mut seen: Vec<*const Element> = Vec::with_capacity(nodes.len());
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let ptr = node as *const Element;
        if !seen.contains(&ptr) {
            seen.push(ptr);
            out.push(node);
        }
    }
    out
}
