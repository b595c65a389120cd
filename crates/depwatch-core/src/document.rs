//! Parsed metadata documents and the path queries evaluated against them.
//!
//! Repository metadata (`maven-metadata.xml`, POM files) is parsed into a
//! small element tree with `quick-xml`. Elements are matched by local name,
//! so a POM declaring a default namespace still answers `/project/url`.
//!
//! Queries use a subset of XPath: absolute location paths of element-name
//! steps (`*` matches any element), optionally ending in `text()`, joined
//! with `|`:
//!
//! ```
//! use depwatch_core::document::{Document, Query};
//!
//! let doc = Document::parse(br#"<metadata>
//!     <versioning><versions><version>1.0</version><version>1.1</version></versions></versioning>
//! </metadata>"#).unwrap();
//!
//! let query: Query = "/metadata/versioning/versions/version/text()".parse().unwrap();
//! assert_eq!(doc.query(&query), vec!["1.0", "1.1"]);
//! ```

use crate::error::DetectError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::str::FromStr;
use thiserror::Error;

/// Reasons a fetched body is not a usable document.
#[derive(Error, Debug)]
pub enum MalformedDocument {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("document has no root element")]
    NoRootElement,
}

/// `text[i]` is the text node before `children[i]`; the last entry follows
/// the last child.
#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<usize>,
    text: Vec<String>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: vec![String::new()],
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(node) = self.text.last_mut() {
            node.push_str(text);
        }
    }
}

/// An immutable element tree.
///
/// Index 0 is the document node; element indices follow document order.
#[derive(Debug)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Parses an XML body.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDocument`] on XML syntax errors, mismatched or
    /// unclosed tags, or a body without any element.
    pub fn parse(data: &[u8]) -> Result<Self, MalformedDocument> {
        let mut reader = Reader::from_reader(data);
        let mut elements = vec![Element::new(String::new())];
        let mut open = vec![0usize];
        let mut buf = Vec::new();

        loop {
            let current = open.last().copied().unwrap_or(0);
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let index = push_element(&mut elements, current, &e);
                    open.push(index);
                }
                Event::Empty(e) => {
                    push_element(&mut elements, current, &e);
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    elements[current].push_text(&text);
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    elements[current].push_text(&String::from_utf8_lossy(&raw));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if open.len() > 1 {
            let unclosed = open[open.len() - 1];
            return Err(MalformedDocument::UnclosedElement(
                elements[unclosed].name.clone(),
            ));
        }
        if elements[0].children.is_empty() {
            return Err(MalformedDocument::NoRootElement);
        }

        Ok(Self { elements })
    }

    /// Name of the root element.
    pub fn root_name(&self) -> &str {
        self.elements[0]
            .children
            .first()
            .map(|&i| self.elements[i].name.as_str())
            .unwrap_or_default()
    }

    /// Evaluates `query`, returning matched values in document order.
    ///
    /// Values are trimmed; empty values are dropped. An element matched by
    /// more than one branch of a union is reported once. With `text()`, each
    /// text node of an element is its own value, so mixed content such as
    /// `first<br/>second` yields `first` and `second`.
    pub fn query(&self, query: &Query) -> Vec<String> {
        let mut matched: Vec<(usize, bool)> = Vec::new();
        for path in &query.paths {
            matched.extend(self.select(path).into_iter().map(|i| (i, path.text)));
        }
        matched.sort_by_key(|&(index, _)| index);
        matched.dedup_by_key(|&mut (index, _)| index);

        matched
            .into_iter()
            .flat_map(|(index, text)| {
                if text {
                    self.elements[index]
                        .text
                        .iter()
                        .map(|node| node.trim().to_string())
                        .collect::<Vec<_>>()
                } else {
                    let mut value = String::new();
                    self.collect_text(index, &mut value);
                    vec![value.trim().to_string()]
                }
            })
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Parses `expression` and evaluates it.
    pub fn select_str(&self, expression: &str) -> crate::error::Result<Vec<String>> {
        let query: Query = expression.parse()?;
        Ok(self.query(&query))
    }

    fn select(&self, path: &LocationPath) -> Vec<usize> {
        let mut current = vec![0usize];
        for step in &path.steps {
            current = current
                .iter()
                .flat_map(|&parent| self.elements[parent].children.iter().copied())
                .filter(|&child| step.matches(&self.elements[child].name))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    fn collect_text(&self, index: usize, out: &mut String) {
        let element = &self.elements[index];
        for (i, node) in element.text.iter().enumerate() {
            out.push_str(node);
            if let Some(&child) = element.children.get(i) {
                self.collect_text(child, out);
            }
        }
    }
}

fn push_element(elements: &mut Vec<Element>, parent: usize, start: &BytesStart<'_>) -> usize {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let index = elements.len();
    elements.push(Element::new(name));
    elements[parent].children.push(index);
    elements[parent].text.push(String::new());
    index
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Any,
    Name(String),
}

impl Step {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Name(expected) => expected == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocationPath {
    steps: Vec<Step>,
    text: bool,
}

/// A compiled query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    expression: String,
    paths: Vec<LocationPath>,
}

impl Query {
    pub fn as_str(&self) -> &str {
        &self.expression
    }
}

impl FromStr for Query {
    type Err = DetectError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let paths = expression
            .split('|')
            .map(|branch| parse_path(expression, branch.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            expression: expression.to_string(),
            paths,
        })
    }
}

fn parse_path(expression: &str, branch: &str) -> Result<LocationPath, DetectError> {
    let Some(rest) = branch.strip_prefix('/') else {
        return Err(DetectError::invalid_query(
            expression,
            "paths must be absolute",
        ));
    };
    if rest.starts_with('/') {
        return Err(DetectError::invalid_query(
            expression,
            "descendant steps are not supported",
        ));
    }

    let mut segments: Vec<&str> = rest.split('/').collect();
    let text = segments.last() == Some(&"text()");
    if text {
        segments.pop();
    }
    if segments.is_empty() || segments == [""] {
        return Err(DetectError::invalid_query(expression, "empty path"));
    }

    let steps = segments
        .into_iter()
        .map(|segment| parse_step(expression, segment))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LocationPath { steps, text })
}

fn parse_step(expression: &str, segment: &str) -> Result<Step, DetectError> {
    if segment == "*" {
        return Ok(Step::Any);
    }
    if segment.is_empty() {
        return Err(DetectError::invalid_query(expression, "empty step"));
    }
    let valid = segment
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if !valid {
        return Err(DetectError::invalid_query(
            expression,
            format!("unsupported step '{}'", segment),
        ));
    }
    // Prefixes are dropped; matching is by local name.
    let local = segment.rsplit(':').next().unwrap_or(segment);
    Ok(Step::Name(local.to_string()))
}
