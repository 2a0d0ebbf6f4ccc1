//! Link validation
//!
//! This module implements the bidirectional link checker. A [`Validator`]
//! holds a source handle, an ordered set of child/target handle pairs, a
//! direction and a required-ness mode, and walks the document from a
//! context node correlating extracted values.
//!
//! The forward pass checks that each source value reaches at least one
//! target through some assertion child; the backward pass checks that
//! each target value is referenced by at least one child. "No link found"
//! stays silent unless the matching direction is required; nodes with no
//! extractable value are always reported.

use crate::documents::Element;
use crate::error::Result;
use crate::xpath::XPathHandle;

use super::diagnostics::Diagnostic;

/// Which direction(s) of a rule are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Source values must resolve to targets
    #[default]
    Forward,
    /// Target values must be referenced by sources
    Backward,
    /// Both directions
    Both,
}

impl Direction {
    /// Whether the forward pass runs
    pub fn forward(&self) -> bool {
        matches!(self, Direction::Forward | Direction::Both)
    }

    /// Whether the backward pass runs
    pub fn backward(&self) -> bool {
        matches!(self, Direction::Backward | Direction::Both)
    }
}

/// Which direction(s) promote an unresolved link to a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Required {
    /// Unresolved links stay silent
    #[default]
    None,
    /// Every source must link to some target
    Forward,
    /// Every target must be linked from some source
    Backward,
    /// Required in both directions
    Both,
}

impl Required {
    /// Whether unresolved forward links are findings
    pub fn forward(&self) -> bool {
        matches!(self, Required::Forward | Required::Both)
    }

    /// Whether unresolved backward links are findings
    pub fn backward(&self) -> bool {
        matches!(self, Required::Backward | Required::Both)
    }
}

/// Bidirectional link checker for one rule
///
/// Stateless across calls: each [`validate`](Validator::validate) is a
/// pure function of the handles and the document.
#[derive(Debug)]
pub struct Validator {
    source: XPathHandle,
    targets: Vec<(XPathHandle, XPathHandle)>,
    direction: Direction,
    required: Required,
}

impl Validator {
    /// Create a validator from resolved handles
    pub fn new(
        source: XPathHandle,
        targets: Vec<(XPathHandle, XPathHandle)>,
        direction: Direction,
        required: Required,
    ) -> Self {
        Self {
            source,
            targets,
            direction,
            required,
        }
    }

    /// Check link integrity at a context node
    ///
    /// `prefix` is the composed scope prefix used only to label
    /// diagnostic XPaths; selection is always relative to `context`.
    /// Diagnostics come out in evaluation order, forward pass first.
    pub fn validate(
        &self,
        context: &Element,
        prefix: Option<&XPathHandle>,
    ) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        if self.direction.forward() {
            self.forward_pass(context, prefix, &mut diagnostics)?;
        }
        if self.direction.backward() {
            self.backward_pass(context, prefix, &mut diagnostics)?;
        }
        Ok(diagnostics)
    }

    /// Label a handle with the scope prefix for diagnostics
    fn qualify(&self, handle: &XPathHandle, prefix: Option<&XPathHandle>) -> String {
        match prefix {
            Some(p) => p.compose(handle).display().to_string(),
            None => handle.display().to_string(),
        }
    }

    fn forward_pass(
        &self,
        context: &Element,
        prefix: Option<&XPathHandle>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        for source_node in self.source.select(context)? {
            let source_value = match self.source.value_of(source_node) {
                Some(v) => v,
                None => {
                    diagnostics.push(Diagnostic::ValueMissing {
                        xpath: self.qualify(&self.source, prefix),
                        line: source_node.line(),
                    });
                    continue;
                }
            };

            let mut any_link = false;
            let mut is_parent = false;

            for (child, target) in &self.targets {
                for child_node in child.select(source_node)? {
                    let child_value = match child.value_of(child_node) {
                        Some(v) => v,
                        None => {
                            diagnostics.push(Diagnostic::ValueMissing {
                                xpath: self.qualify(&self.source.compose(child), prefix),
                                line: child_node.line(),
                            });
                            continue;
                        }
                    };
                    is_parent = true;

                    for target_node in target.select(context)? {
                        match target.value_of(target_node) {
                            Some(v) => {
                                if v == child_value {
                                    any_link = true;
                                }
                            }
                            None => diagnostics.push(Diagnostic::ValueMissing {
                                xpath: self.qualify(target, prefix),
                                line: target_node.line(),
                            }),
                        }
                    }
                }
            }

            if !self.required.forward() {
                continue;
            }

            if is_parent && !any_link {
                for (child, target) in &self.targets {
                    diagnostics.push(Diagnostic::LinkBroken {
                        source_xpath: self.qualify(&self.source.compose(child), prefix),
                        target_xpath: self.qualify(target, prefix),
                        line: source_node.line(),
                        value: source_value.clone(),
                    });
                }
            } else if !is_parent {
                for (child, _) in &self.targets {
                    diagnostics.push(Diagnostic::ChildMissing {
                        parent_xpath: self.qualify(&self.source, prefix),
                        child_xpath: self.qualify(&self.source.compose(child), prefix),
                        line: source_node.line(),
                        value: source_value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    fn backward_pass(
        &self,
        context: &Element,
        prefix: Option<&XPathHandle>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        for (_, target) in &self.targets {
            for target_node in target.select(context)? {
                let target_value = match target.value_of(target_node) {
                    Some(v) => v,
                    None => {
                        diagnostics.push(Diagnostic::ValueMissing {
                            xpath: self.qualify(target, prefix),
                            line: target_node.line(),
                        });
                        continue;
                    }
                };

                let mut any = false;
                for (child, _) in &self.targets {
                    for source_node in self.source.select(context)? {
                        if self.source.value_of(source_node).is_none() {
                            diagnostics.push(Diagnostic::ValueMissing {
                                xpath: self.qualify(&self.source, prefix),
                                line: source_node.line(),
                            });
                            continue;
                        }
                        for child_node in child.select(source_node)? {
                            match child.value_of(child_node) {
                                Some(v) => {
                                    if v == target_value {
                                        any = true;
                                    }
                                }
                                None => diagnostics.push(Diagnostic::ValueMissing {
                                    xpath: self.qualify(&self.source.compose(child), prefix),
                                    line: child_node.line(),
                                }),
                            }
                        }
                    }
                }

                if !any && self.required.backward() {
                    for (child, _) in &self.targets {
                        diagnostics.push(Diagnostic::LinkBroken {
                            source_xpath: self.qualify(target, prefix),
                            target_xpath: self.qualify(&self.source.compose(child), prefix),
                            line: target_node.line(),
                            value: target_value.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
