use ::kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

use crate::{
    Result,
    diagnostics::LogSink,
    decode::Decoder,
    error::DecodeErrorKind,
    node::Node,
    shape::Decode,
};

/// Parses KDL text into a node tree. See [`document_to_node`] for the mapping rules.
pub fn parse_kdl(kdl: &str) -> Result<Node> {
    log::trace!("Entering `parse_kdl`");
    let document: KdlDocument = kdl.parse()?;
    log::trace!("KDL parsed");
    document_to_node(&document)
}

/// Deserialize a value of type `T` from a KDL string.
///
/// Diagnostics go to the [`log`] facade.
///
/// Sequences must be homogeneous, and KDL integers and floats decode to different kinds. Write
/// every number of a list in the same form: `pos 0.0 64.5 -12.0`, not `pos 0 64.5 -12`.
///
/// ```
/// use node_decode::record;
///
/// #[derive(Debug)]
/// struct Destination {
///     name: String,
///     pos: Vec<f64>,
///     facing: f32,
/// }
///
/// record! {
///     Destination { name, pos, facing }
/// }
///
/// let dest: Destination = node_decode::from_kdl_str(r#"
///     name "spawn"
///     pos 0.5 64.0 -12.5
///     facing 90.0
/// "#).unwrap();
/// assert_eq!(dest.pos, vec![0.5, 64.0, -12.5]);
/// assert_eq!(dest.facing, 90.0);
/// ```
pub fn from_kdl_str<T: Decode>(kdl: &str) -> Result<T> {
    let node = parse_kdl(kdl)?;
    Decoder::new(&mut LogSink).decode(&node)
}

/// Converts a parsed KDL document into a node tree.
///
/// - The document is a mapping from node names to node values.
/// - A node with only positional arguments is a scalar (one argument) or a sequence (zero or
///   several).
/// - A node with properties or a children block is a mapping: properties first, then children.
/// - A children block made only of `-` nodes is a sequence of their values.
/// - Positional arguments may not be combined with properties or children.
pub fn document_to_node(document: &KdlDocument) -> Result<Node> {
    block_to_node(document)
}

fn block_to_node(document: &KdlDocument) -> Result<Node> {
    let nodes = document.nodes();
    if !nodes.is_empty() && nodes.iter().all(|node| node.name().value() == "-") {
        log::trace!("Block of {} dash nodes is a sequence", nodes.len());
        return nodes.iter().map(node_value).collect::<Result<Vec<_>>>().map(Node::Sequence);
    }

    let mut entries = Vec::with_capacity(nodes.len());
    for node in nodes {
        entries.push((Node::plain(node.name().value()), node_value(node)?));
    }
    Ok(Node::Mapping(entries))
}

fn node_value(node: &KdlNode) -> Result<Node> {
    let (arguments, properties): (Vec<&KdlEntry>, Vec<&KdlEntry>) =
        node.entries().iter().partition(|entry| entry.name().is_none());

    if properties.is_empty() && node.children().is_none() {
        let mut scalars: Vec<Node> = arguments.iter().map(|entry| scalar(entry.value())).collect();
        return Ok(if scalars.len() == 1 {
            scalars.remove(0)
        } else {
            Node::Sequence(scalars)
        });
    }

    if !arguments.is_empty() {
        log::debug!(
            "Node {} mixes arguments with properties or children",
            node.name().value()
        );
        return Err(DecodeErrorKind::UnsupportedDocument(format!(
            "node `{}` mixes positional arguments with properties or children",
            node.name().value()
        ))
        .into());
    }

    let mut entries = Vec::new();
    for property in &properties {
        if let Some(name) = property.name() {
            entries.push((Node::plain(name.value()), scalar(property.value())));
        }
    }
    if let Some(children) = node.children() {
        match block_to_node(children)? {
            Node::Mapping(children) => entries.extend(children),
            sequence if entries.is_empty() => return Ok(sequence),
            _ => {
                return Err(DecodeErrorKind::UnsupportedDocument(format!(
                    "node `{}` mixes properties with a `-` sequence",
                    node.name().value()
                ))
                .into());
            }
        }
    }
    Ok(Node::Mapping(entries))
}

fn scalar(value: &KdlValue) -> Node {
    match value {
        KdlValue::String(string) => Node::quoted(string.as_str()),
        KdlValue::Integer(integer) => Node::plain(integer.to_string()),
        KdlValue::Float(float) => Node::plain(float_text(*float)),
        KdlValue::Bool(bool) => Node::plain(bool.to_string()),
        KdlValue::Null => Node::null(),
    }
}

fn float_text(float: f64) -> String {
    if float.is_nan() {
        ".nan".to_owned()
    } else if float.is_infinite() {
        if float > 0.0 { ".inf" } else { "-.inf" }.to_owned()
    } else {
        // Debug keeps a `.` or exponent, so the text resolves back to a float.
        format!("{float:?}")
    }
}
