//! XML document handling
//!
//! This module provides the in-memory document tree the link validator
//! reads: elements with resolved qualified names, attributes, text
//! content, children, and the source line each element starts on. Line
//! numbers are carried so diagnostics can point back into the source
//! file.

use crate::error::{Error, Result};
use crate::namespaces::{NamespaceContext, QName};
use crate::xpath::selectors::{parse_steps, push_self_and_descendants, select_from, PathStepKind};
use crate::xpath::NamespaceMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes
    pub attributes: HashMap<QName, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Source line the element's start tag ends on
    pub line: usize,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: HashMap::new(),
            text: None,
            children: Vec::new(),
            line: 0,
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        for (qname, value) in &self.attributes {
            if qname.local_name == name {
                return Some(value);
            }
        }
        None
    }

    /// Get the text content (if any)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the source line of the element
    pub fn line(&self) -> usize {
        self.line
    }

    /// Append text content
    pub fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Evaluate an XPath selection expression relative to this element
    pub fn xpath(&self, expr: &str, namespaces: &NamespaceMap) -> Result<Vec<&Element>> {
        let steps = parse_steps(expr)?;
        select_from(vec![self], &steps, namespaces)
    }
}

/// XML Document representation
#[derive(Debug)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Read and parse an XML document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_string(&xml)
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        // Offsets of every newline, for byte-position to line translation
        let newline_offsets: Vec<usize> = xml
            .iter()
            .enumerate()
            .filter_map(|(i, b)| (*b == b'\n').then_some(i))
            .collect();
        let line_at = |pos: usize| newline_offsets.partition_point(|&off| off < pos) + 1;

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut context_stack: Vec<NamespaceContext> = Vec::new();
        let document_context = NamespaceContext::new();
        let mut buf = Vec::new();

        loop {
            let in_scope = context_stack.last().unwrap_or(&document_context);
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let context = Self::declared_context(&e, in_scope)?;
                    let mut element = Self::parse_element(&e, &context)?;
                    element.line = line_at(reader.buffer_position());
                    element_stack.push(element);
                    context_stack.push(context);
                }
                Ok(Event::End(_)) => {
                    context_stack.pop();
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let context = Self::declared_context(&e, in_scope)?;
                    let mut element = Self::parse_element(&e, &context)?;
                    element.line = line_at(reader.buffer_position());
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("failed to unescape text: {}", e)))?;
                        current.append_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let bytes = e.into_inner();
                        current.append_text(&String::from_utf8_lossy(&bytes));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Ignore declarations, comments, processing instructions
            }
            buf.clear();
        }

        if doc.root.is_none() {
            return Err(Error::Xml("document has no root element".to_string()));
        }

        Ok(doc)
    }

    /// Derive the namespace context in scope for an element
    fn declared_context(
        start: &BytesStart,
        parent: &NamespaceContext,
    ) -> Result<NamespaceContext> {
        let mut context = parent.clone();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;
            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?;

            if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
                let value = attr
                    .unescape_value()
                    .map_err(|e| Error::Xml(format!("failed to unescape attribute: {}", e)))?;
                if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                    context.add_prefix(prefix, value.as_ref());
                } else {
                    context.set_default_namespace(value.as_ref());
                }
            }
        }

        Ok(context)
    }

    /// Parse an element from a start-tag event
    fn parse_element(start: &BytesStart, context: &NamespaceContext) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("invalid element name: {}", e)))?;

        let mut element = Element::new(context.resolve_element(name));

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;
            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?;

            if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
                continue;
            }

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("failed to unescape attribute value: {}", e)))?
                .to_string();

            element
                .attributes
                .insert(context.resolve_attribute(attr_name), attr_value);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Evaluate an XPath selection expression against the document
    ///
    /// The root element is treated as the document node's only child, so
    /// an absolute path like `/r/p` tests the root's own name and `//r`
    /// can select the root itself.
    pub fn xpath(&self, expr: &str, namespaces: &NamespaceMap) -> Result<Vec<&Element>> {
        let steps = parse_steps(expr)?;
        let root = match &self.root {
            Some(r) => r,
            None => return Ok(Vec::new()),
        };

        let (first, rest) = match steps.split_first() {
            None => return Ok(vec![root]),
            Some(pair) => pair,
        };

        match first.kind {
            // "." addresses the whole document; remaining steps are
            // resolved relative to the root element
            PathStepKind::Self_ => select_from(vec![root], rest, namespaces),
            PathStepKind::DescendantOrSelf => {
                let (name_step, deeper) = match rest.split_first() {
                    None => {
                        let mut all = Vec::new();
                        push_self_and_descendants(root, &mut all);
                        return Ok(all);
                    }
                    Some(pair) => pair,
                };

                // The root element is the document node's child, so it is
                // itself a candidate for the first name test.
                let mut anchors = Vec::new();
                if name_step.kind == PathStepKind::Child && name_step.matches(root, namespaces)? {
                    anchors.push(root);
                }
                let mut all = Vec::new();
                push_self_and_descendants(root, &mut all);
                let rest_from_descendants =
                    select_from(all, std::slice::from_ref(name_step), namespaces)?;
                for node in rest_from_descendants {
                    if !anchors.iter().any(|a| std::ptr::eq(*a, node)) {
                        anchors.push(node);
                    }
                }
                select_from(anchors, deeper, namespaces)
            }
            PathStepKind::Child => {
                let mut anchors = Vec::new();
                if first.matches(root, namespaces)? {
                    anchors.push(root);
                }
                select_from(anchors, rest, namespaces)
            }
            _ => Err(Error::Xpath(format!(
                "unsupported leading step in document path '{}'",
                expr
            ))),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
