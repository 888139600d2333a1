use std::{
    any::Any,
    fmt::{self, Debug, Display},
};

use indexmap::IndexMap;

/// Generic string-keyed map produced for mappings that have no schema.
///
/// Keys keep the order they appeared in the document.
pub type Map = IndexMap<String, Value>;

/// A decoded value, before it is assigned into a typed field.
///
/// Equality is structural except for [`Value::Instance`], which is only equal to itself (see
/// [`Instance`]). Two separately decoded records never compare equal.
#[derive(Debug, Default, PartialEq)]
pub enum Value {
    /// Explicit null marker, or an absent sequence item.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// 8-bit integer. Only produced by coercion.
    I8(i8),
    /// 16-bit integer. Only produced by coercion.
    I16(i16),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// 32-bit float. Only produced by coercion.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UTF-8 string.
    String(String),
    /// Homogeneous sequence.
    Array(Array),
    /// Schema-less mapping.
    Map(Map),
    /// Fully built record.
    Instance(Instance),
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Instance(instance) => ValueKind::Instance(instance.type_name()),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer payload, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(n) => Some(n.into()),
            Value::I16(n) => Some(n.into()),
            Value::I32(n) => Some(n.into()),
            Value::I64(n) => Some(n),
            _ => None,
        }
    }

    /// Any float payload, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(n) => Some(n.into()),
            Value::F64(n) => Some(n),
            _ => None,
        }
    }

    /// The array payload, if this is an array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// The map payload, if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }
}

/// Discriminant of [`Value`]. Records are distinguished by type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::I8`]
    I8,
    /// [`Value::I16`]
    I16,
    /// [`Value::I32`]
    I32,
    /// [`Value::I64`]
    I64,
    /// [`Value::F32`]
    F32,
    /// [`Value::F64`]
    F64,
    /// [`Value::String`]
    String,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
    /// [`Value::Instance`] of the named record type
    Instance(&'static str),
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => f.write_str("null"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::I8 => f.write_str("i8"),
            ValueKind::I16 => f.write_str("i16"),
            ValueKind::I32 => f.write_str("i32"),
            ValueKind::I64 => f.write_str("i64"),
            ValueKind::F32 => f.write_str("f32"),
            ValueKind::F64 => f.write_str("f64"),
            ValueKind::String => f.write_str("string"),
            ValueKind::Array => f.write_str("array"),
            ValueKind::Map => f.write_str("map"),
            ValueKind::Instance(type_name) => write!(f, "{type_name}"),
        }
    }
}

/// A homogeneous array.
///
/// The element kind comes from the first non-null item; nulls may appear anywhere.
#[derive(Debug, Default, PartialEq)]
pub struct Array {
    element: Option<ValueKind>,
    items: Vec<Value>,
}

/// An item whose kind differs from the array's element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixedItem {
    /// Position of the offending item.
    pub index: usize,
    /// Element kind inferred from the first non-null item.
    pub expected: ValueKind,
    /// Kind of the offending item.
    pub found: ValueKind,
}

impl Array {
    /// An empty array with no element kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an array, checking that every non-null item has the same kind.
    pub fn from_items(items: Vec<Value>) -> Result<Self, MixedItem> {
        let mut element = None;
        for (index, item) in items.iter().enumerate() {
            let found = item.kind();
            if found == ValueKind::Null {
                continue;
            }
            match element {
                None => element = Some(found),
                Some(expected) if expected != found => {
                    return Err(MixedItem {
                        index,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }
        if element.is_none() && !items.is_empty() {
            element = Some(ValueKind::Null);
        }
        Ok(Self { element, items })
    }

    /// Element kind. `None` for an empty array.
    pub fn element(&self) -> Option<ValueKind> {
        self.element
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items in document order.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Takes the items out of the array.
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// Applies `f` to every item. A uniform mapping keeps the array homogeneous, so the element
    /// kind is re-read from the first non-null result.
    pub(crate) fn map_items(self, mut f: impl FnMut(Value) -> Value) -> Self {
        let items: Vec<Value> = self.items.into_iter().map(&mut f).collect();
        let element = if items.is_empty() {
            None
        } else {
            Some(
                items
                    .iter()
                    .map(Value::kind)
                    .find(|kind| *kind != ValueKind::Null)
                    .unwrap_or(ValueKind::Null),
            )
        };
        Self { element, items }
    }
}

/// A record built by the decoder, with its concrete type erased.
pub struct Instance {
    type_name: &'static str,
    inner: Box<dyn Any>,
}

impl Instance {
    pub(crate) fn new(type_name: &'static str, inner: Box<dyn Any>) -> Self {
        Self { type_name, inner }
    }

    /// Name of the record type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the record is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Recovers the concrete record, or gives the instance back if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Instance> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Instance { type_name, inner }),
        }
    }

    /// Borrows the concrete record.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Identity equality: an instance equals itself and nothing else.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && std::ptr::addr_eq(&*self.inner, &*other.inner)
    }
}
