use std::fmt::{self, Display};

/// One element of a parsed document tree.
///
/// Trees are produced once by a front end (see [`parse_kdl`](crate::parse_kdl)) and never mutated
/// by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf value, still in its textual form.
    Scalar(Scalar),
    /// An ordered list of child nodes.
    Sequence(Vec<Node>),
    /// Ordered key/value pairs. Keys are expected to be scalars.
    Mapping(Vec<(Node, Node)>),
    /// A reference to an anchored node elsewhere in the document. Aliases are never followed.
    Alias(String),
}

impl Node {
    /// A plain (unquoted) scalar, resolved by the decoder's [`ScalarResolver`](crate::ScalarResolver).
    pub fn plain(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::new(value, ScalarStyle::Plain))
    }

    /// A quoted scalar, which always resolves to a string.
    pub fn quoted(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::new(value, ScalarStyle::Quoted))
    }

    /// A plain `null` scalar.
    pub fn null() -> Self {
        Node::plain("null")
    }

    /// A sequence of the given children.
    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Node::Sequence(items.into_iter().collect())
    }

    /// A mapping whose keys are plain scalars.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Node::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (Node::plain(key), value))
                .collect(),
        )
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Alias(_) => NodeKind::Alias,
        }
    }
}

/// Scalar text together with the way it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    value: String,
    style: ScalarStyle,
}

impl Scalar {
    /// Creates a scalar.
    pub fn new(value: impl Into<String>, style: ScalarStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// The raw text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// How the scalar was written.
    pub fn style(&self) -> ScalarStyle {
        self.style
    }
}

/// Quoting style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted. Subject to null/bool/number resolution.
    Plain,
    /// Single- or double-quoted. Always a string.
    Quoted,
}

/// Discriminant of [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// [`Node::Scalar`]
    Scalar,
    /// [`Node::Sequence`]
    Sequence,
    /// [`Node::Mapping`]
    Mapping,
    /// [`Node::Alias`]
    Alias,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
            NodeKind::Alias => "alias",
        };
        f.write_str(name)
    }
}
