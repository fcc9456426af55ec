//! Owned, immutable node tree
//!
//! A single tagged union covers every node kind the analysis cares about.
//! Traversals are iterative so that pathologically deep markup cannot
//! overflow the call stack.

/// A node in a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The document root
    Document { children: Vec<Node> },

    /// A `<!DOCTYPE ...>` declaration
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },

    /// An element; `name` is lowercase
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },

    /// A run of character data
    Text(String),

    /// A comment
    Comment(String),
}

impl Node {
    /// Creates an element node, lowercasing the tag name
    pub fn element(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    ) -> Self {
        Node::Element {
            name: name.into().to_ascii_lowercase(),
            attributes,
            children,
        }
    }

    /// Creates a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Child nodes; empty for leaf kinds
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Tag name for elements, `None` otherwise
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true if this is an element with the given (lowercase) name
    pub fn is_element(&self, tag: &str) -> bool {
        self.tag_name() == Some(tag)
    }

    /// Value of the first attribute with the given name
    ///
    /// Attribute names are matched case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Concatenation of every descendant text node, in document order
    pub fn text_content(&self) -> String {
        self.descendants()
            .filter_map(|node| match node {
                Node::Text(value) => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Pre-order iterator over this node and all of its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node in document order matching `predicate`
    ///
    /// The walk stops at the first match; later subtrees are never visited.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        self.descendants().find(|node| predicate(node))
    }
}

/// Pre-order, document-order traversal driven by an explicit stack
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is popped next
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
