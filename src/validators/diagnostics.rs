//! Validation findings
//!
//! A [`Diagnostic`] describes one broken or missing link found while
//! validating a document. Findings are data: they are collected into the
//! sequence a validation run returns and never abort the run. The
//! `Display` implementation renders the one-line report format the CLI
//! writes to standard error.

use std::fmt;

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A selected node produced no extractable string
    ValueMissing {
        /// Qualified XPath of the selection
        xpath: String,
        /// Source line of the offending node
        line: usize,
    },
    /// A source node under a required forward rule had no assertion child
    ChildMissing {
        /// Qualified XPath of the source selection
        parent_xpath: String,
        /// Qualified XPath of the missing child selection
        child_xpath: String,
        /// Source line of the source node
        line: usize,
        /// The source node's extracted value
        value: String,
    },
    /// A value extracted on one side has no matching value on the other
    LinkBroken {
        /// Qualified XPath of the side holding the value
        source_xpath: String,
        /// Qualified XPath of the side that failed to match it
        target_xpath: String,
        /// Source line of the node holding the value
        line: usize,
        /// The unmatched value
        value: String,
    },
}

impl Diagnostic {
    /// Source line of the node the finding points at
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::ValueMissing { line, .. } => *line,
            Diagnostic::ChildMissing { line, .. } => *line,
            Diagnostic::LinkBroken { line, .. } => *line,
        }
    }
}

/// Escape `"` inside a quoted report substring
fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ValueMissing { xpath, line } => {
                write!(
                    f,
                    "element \"{}\" on line {} is REQUIRED",
                    escape_quotes(xpath),
                    line
                )
            }
            Diagnostic::ChildMissing {
                parent_xpath,
                child_xpath,
                line,
                value,
            } => {
                write!(
                    f,
                    "parent element \"{}\" on line {} with text \"{}\": child element \"{}\" IS REQUIRED",
                    escape_quotes(parent_xpath),
                    line,
                    escape_quotes(value),
                    escape_quotes(child_xpath)
                )
            }
            Diagnostic::LinkBroken {
                source_xpath,
                target_xpath,
                line,
                value,
            } => {
                write!(
                    f,
                    "source element \"{}\" on line {}: target element \"{}\" with text \"{}\" is NOT FOUND",
                    escape_quotes(source_xpath),
                    line,
                    escape_quotes(target_xpath),
                    escape_quotes(value)
                )
            }
        }
    }
}
