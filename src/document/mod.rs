//! Document model for analyzed pages
//!
//! Markup is parsed with `scraper` (html5ever) and copied into an owned
//! [`Node`] tree. The owned tree is `Send + Sync`, so an analysis can keep it
//! around an `.await` without pinning the task to one thread, and it exposes
//! only the handful of queries the extractors need.

mod node;

pub use node::{Descendants, Node};

use crate::ParseError;
use ego_tree::iter::Edge;
use scraper::Html;

/// A parsed HTML document
#[derive(Debug)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Parses an HTML document
    ///
    /// The parser is permissive: malformed markup is recovered from, never
    /// rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use web_analyzer::Document;
    ///
    /// let doc = Document::parse("<title>Hi</title><h1>x</h1>").unwrap();
    /// assert!(doc.root().find(|n| n.is_element("h1")).is_some());
    /// ```
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        Self::parse_with_limit(html, usize::MAX)
    }

    /// Parses an HTML document, refusing bodies larger than `max_bytes`
    pub fn parse_with_limit(html: &str, max_bytes: usize) -> Result<Self, ParseError> {
        if html.len() > max_bytes {
            return Err(ParseError::TooLarge {
                size: html.len(),
                limit: max_bytes,
            });
        }

        let parsed = Html::parse_document(html);
        if !parsed.errors.is_empty() {
            tracing::trace!("Recovered from {} markup errors", parsed.errors.len());
        }

        Ok(Self {
            root: build_tree(&parsed),
        })
    }

    /// Wraps an already-built tree
    ///
    /// A root that is not a `Node::Document` is placed under an empty one.
    pub fn from_root(root: Node) -> Self {
        match root {
            Node::Document { .. } => Self { root },
            other => Self {
                root: Node::Document {
                    children: vec![other],
                },
            },
        }
    }

    /// The document root node
    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl Drop for Document {
    // The derived drop glue recurses once per nesting level; take the tree
    // apart with an explicit stack instead.
    fn drop(&mut self) {
        let mut pending = vec![std::mem::replace(
            &mut self.root,
            Node::Document {
                children: Vec::new(),
            },
        )];

        while let Some(mut node) = pending.pop() {
            if let Node::Document { children } | Node::Element { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

/// Copies the parser's arena tree into an owned [`Node`] tree
///
/// Works on open/close edges so the depth of the markup never turns into
/// depth of the call stack.
fn build_tree(parsed: &Html) -> Node {
    // Each frame holds a node whose children are still being collected
    let mut stack: Vec<(Option<Node>, Vec<Node>)> = Vec::new();
    let mut root = None;

    for edge in parsed.tree.root().traverse() {
        match edge {
            Edge::Open(node_ref) => stack.push((convert(node_ref.value()), Vec::new())),
            Edge::Close(_) => {
                let Some((shell, children)) = stack.pop() else {
                    continue;
                };
                let Some(node) = shell.map(|shell| with_children(shell, children)) else {
                    continue;
                };
                match stack.last_mut() {
                    Some((_, siblings)) => siblings.push(node),
                    None => root = Some(node),
                }
            }
        }
    }

    root.unwrap_or(Node::Document {
        children: Vec::new(),
    })
}

/// Converts one parser node, without its children
fn convert(node: &scraper::Node) -> Option<Node> {
    match node {
        scraper::Node::Document | scraper::Node::Fragment => Some(Node::Document {
            children: Vec::new(),
        }),
        scraper::Node::Doctype(doctype) => Some(Node::Doctype {
            name: doctype.name().to_string(),
            public_id: doctype.public_id().to_string(),
            system_id: doctype.system_id().to_string(),
        }),
        scraper::Node::Element(element) => Some(Node::element(
            element.name(),
            element
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            Vec::new(),
        )),
        scraper::Node::Text(text) => Some(Node::Text(String::from(&**text))),
        scraper::Node::Comment(comment) => Some(Node::Comment(String::from(&**comment))),
        _ => None,
    }
}

fn with_children(shell: Node, children: Vec<Node>) -> Node {
    match shell {
        Node::Document { .. } => Node::Document { children },
        Node::Element {
            name, attributes, ..
        } => Node::Element {
            name,
            attributes,
            children,
        },
        leaf => leaf,
    }
}
