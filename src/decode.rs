use crate::{
    Result,
    builder::{self, Construction},
    coerce::coerce,
    diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink},
    error::{DecodeErrorKind, PathSegment},
    node::Node,
    scalar::{CoreSchema, ScalarResolver},
    shape::{Decode, Def, RecordLayout, Shape, resolve},
    value::{Array, Instance, Map, Value},
};

/// Decodes node trees into typed values.
///
/// A decoder holds the diagnostics sink and the decoding options for one or more calls.
///
/// ```
/// use node_decode::{Decoder, Diagnostics, Node, Value};
///
/// let mut diagnostics = Diagnostics::new();
/// let node = Node::mapping([("world", Node::quoted("nether"))]);
/// let value = Decoder::new(&mut diagnostics).decode_value(&node).unwrap();
/// assert_eq!(value.get("world").and_then(Value::as_str), Some("nether"));
/// ```
pub struct Decoder<'a> {
    sink: &'a mut dyn DiagnosticSink,
    resolver: &'a dyn ScalarResolver,
    deny_unknown_keys: bool,
}

impl<'a> Decoder<'a> {
    /// A decoder reporting to `sink`, using [`CoreSchema`] for scalars.
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            sink,
            resolver: &CoreSchema,
            deny_unknown_keys: false,
        }
    }

    /// Uses `resolver` to type scalars.
    pub fn with_resolver(mut self, resolver: &'a dyn ScalarResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Makes keys that match no record field a fatal [`DecodeErrorKind::UnknownKey`] instead of
    /// a diagnostic.
    pub fn deny_unknown_keys(mut self, deny: bool) -> Self {
        self.deny_unknown_keys = deny;
        self
    }

    /// Decodes `node` into a `T`.
    pub fn decode<T: Decode>(&mut self, node: &Node) -> Result<T> {
        log::trace!("Decoding {} from {} node", T::SHAPE.type_name(), node.kind());
        let value = self
            .decode_node(Some(T::SHAPE), node)?
            .unwrap_or(Value::Null);
        let value = coerce(T::SHAPE, value);
        T::from_value(value).map_err(|source| {
            log::debug!("Root value rejected by {}: {source}", T::SHAPE.type_name());
            DecodeErrorKind::TargetMismatch {
                type_name: T::SHAPE.type_name(),
                source,
            }
            .into()
        })
    }

    /// Decodes `node` without a schema. Mappings become [`Value::Map`].
    pub fn decode_value(&mut self, node: &Node) -> Result<Value> {
        Ok(self.decode_node(None, node)?.unwrap_or(Value::Null))
    }

    /// `Ok(None)` means the node was unusable in this position and has already been reported.
    fn decode_node(&mut self, target: Option<&'static Shape>, node: &Node) -> Result<Option<Value>> {
        match node {
            Node::Scalar(scalar) => Ok(Some(self.resolver.resolve(scalar))),
            Node::Sequence(items) => self.decode_sequence(target, items).map(Some),
            Node::Mapping(entries) => self.decode_mapping(target, entries).map(Some),
            Node::Alias(name) => {
                self.unsupported(format!(
                    "unexpected alias node `*{name}`; aliases are not followed"
                ));
                Ok(None)
            }
        }
    }

    fn decode_sequence(&mut self, target: Option<&'static Shape>, items: &[Node]) -> Result<Value> {
        log::trace!("Entering `decode_sequence` with {} items", items.len());
        if items.is_empty() {
            return Ok(Value::Array(Array::new()));
        }

        let element = target.and_then(|shape| match shape.unwrap_option().def {
            Def::List(element) => Some(element()),
            _ => None,
        });

        // Unusable items are already reported; they are left out rather than padded with nulls.
        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let value = self
                .decode_node(element, item)
                .map_err(|e| e.at(PathSegment::Index(index)))?;
            values.extend(value);
        }

        let array = Array::from_items(values).map_err(|mixed| {
            log::debug!(
                "Sequence item {} is {}, expected {}",
                mixed.index,
                mixed.found,
                mixed.expected
            );
            DecodeErrorKind::HeterogeneousSequence {
                index: mixed.index,
                expected: mixed.expected,
                found: mixed.found,
            }
        })?;
        Ok(Value::Array(array))
    }

    fn decode_mapping(
        &mut self,
        target: Option<&'static Shape>,
        entries: &[(Node, Node)],
    ) -> Result<Value> {
        match target.and_then(Shape::record) {
            Some(layout) => self.decode_record(layout, entries).map(Value::Instance),
            None => self.decode_map(entries).map(Value::Map),
        }
    }

    fn decode_key(&mut self, key: &Node) -> Option<String> {
        match key {
            Node::Scalar(scalar) => Some(scalar.value().to_owned()),
            other => {
                self.unsupported(format!(
                    "unexpected {} node as mapping key; entry skipped",
                    other.kind()
                ));
                None
            }
        }
    }

    fn decode_map(&mut self, entries: &[(Node, Node)]) -> Result<Map> {
        log::trace!("Entering `decode_map` with {} entries", entries.len());
        let mut map = Map::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(key) = self.decode_key(key) else {
                continue;
            };
            let decoded = self
                .decode_node(None, value)
                .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
            if let Some(decoded) = decoded {
                map.insert(key, decoded);
            }
        }
        Ok(map)
    }

    fn decode_record(
        &mut self,
        layout: &'static RecordLayout,
        entries: &[(Node, Node)],
    ) -> Result<Instance> {
        let type_name = layout.type_name();
        log::trace!("Entering `decode_record` for {type_name}");

        let descriptor = resolve(layout);
        let (mut instance, construction) = builder::construct(layout)?;
        if construction == Construction::Blank {
            self.sink.emit(Diagnostic::info(
                DiagnosticKind::FallbackConstruction,
                format!("no constructor declared for {type_name}; fields start at their defaults"),
            ));
        }

        let mut covered = vec![false; descriptor.len()];
        for (key, value) in entries {
            let Some(key) = self.decode_key(key) else {
                continue;
            };
            let Some((index, field)) = descriptor.field_full(&key) else {
                if self.deny_unknown_keys {
                    log::debug!("Unknown key {key} for {type_name} (deny_unknown_keys)");
                    return Err(DecodeErrorKind::UnknownKey {
                        type_name,
                        key,
                        expected: descriptor.names(),
                    }
                    .into());
                }
                self.sink.emit(Diagnostic::warning(
                    DiagnosticKind::UnknownKey,
                    format!("key `{key}` does not match any field of {type_name}; ignoring it"),
                ));
                continue;
            };

            covered[index] = true;
            log::trace!("Key {key} matched field {}.{}", field.declared_in(), field.name());
            let decoded = self
                .decode_node(Some(field.shape()), value)
                .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
            if let Some(decoded) = decoded {
                let decoded = coerce(field.shape(), decoded);
                builder::assign(instance.as_mut(), layout, field, decoded)
                    .map_err(|e| e.at(PathSegment::Key(key)))?;
            }
        }

        for (index, _) in covered.iter().enumerate().filter(|(_, covered)| !**covered) {
            if let Some(field) = descriptor.field_at(index) {
                self.sink.emit(Diagnostic::warning(
                    DiagnosticKind::MissingField,
                    format!(
                        "field `{}` not found in mapping for {type_name}; keeping its default value",
                        field.name()
                    ),
                ));
            }
        }

        log::trace!("Exiting `decode_record` for {type_name}");
        Ok(Instance::new(type_name, instance))
    }

    fn unsupported(&mut self, message: String) {
        self.sink
            .emit(Diagnostic::warning(DiagnosticKind::UnsupportedNodeKind, message));
    }
}
