use std::{
    any::type_name,
    collections::{BTreeMap, HashMap},
};

use crate::{
    error::AssignError,
    shape::{Decode, Def, ScalarType, Shape, shape_of},
    value::{Map, Value},
};

/// Signed integers accept their own kind and any narrower signed kind.
macro_rules! impl_decode_signed {
    ($ty:ty, $scalar:ident, [$($from:ident),*]) => {
        impl Decode for $ty {
            const SHAPE: &'static Shape = &Shape {
                type_name: type_name::<$ty>,
                def: Def::Scalar(ScalarType::$scalar),
            };

            fn from_value(value: Value) -> Result<Self, AssignError> {
                match value {
                    $(Value::$from(n) => Ok(n.into()),)*
                    other => Err(AssignError::mismatch(stringify!($ty), &other)),
                }
            }

            fn blank() -> Self {
                0
            }
        }
    };
}

impl_decode_signed!(i8, I8, [I8]);
impl_decode_signed!(i16, I16, [I8, I16]);
impl_decode_signed!(i32, I32, [I8, I16, I32]);
impl_decode_signed!(i64, I64, [I8, I16, I32, I64]);

/// Unsigned integers accept any integer kind that is in range.
macro_rules! impl_decode_unsigned {
    ($ty:ty, $scalar:ident) => {
        impl Decode for $ty {
            const SHAPE: &'static Shape = &Shape {
                type_name: type_name::<$ty>,
                def: Def::Scalar(ScalarType::$scalar),
            };

            fn from_value(value: Value) -> Result<Self, AssignError> {
                let Some(n) = value.as_i64() else {
                    return Err(AssignError::mismatch(stringify!($ty), &value));
                };
                <$ty>::try_from(n).map_err(|_| AssignError::OutOfRange {
                    expected: stringify!($ty),
                    value: n.to_string(),
                })
            }

            fn blank() -> Self {
                0
            }
        }
    };
}

impl_decode_unsigned!(u8, U8);
impl_decode_unsigned!(u16, U16);
impl_decode_unsigned!(u32, U32);
impl_decode_unsigned!(u64, U64);

impl Decode for f32 {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<f32>,
        def: Def::Scalar(ScalarType::F32),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::F32(n) => Ok(n),
            Value::I8(n) => Ok(n.into()),
            Value::I16(n) => Ok(n.into()),
            Value::I32(n) => Ok(n as f32),
            Value::I64(n) => Ok(n as f32),
            other => Err(AssignError::mismatch("f32", &other)),
        }
    }

    fn blank() -> Self {
        0.0
    }
}

impl Decode for f64 {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<f64>,
        def: Def::Scalar(ScalarType::F64),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::F64(n) => Ok(n),
            Value::F32(n) => Ok(n.into()),
            Value::I8(n) => Ok(n.into()),
            Value::I16(n) => Ok(n.into()),
            Value::I32(n) => Ok(n.into()),
            Value::I64(n) => Ok(n as f64),
            other => Err(AssignError::mismatch("f64", &other)),
        }
    }

    fn blank() -> Self {
        0.0
    }
}

impl Decode for bool {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<bool>,
        def: Def::Scalar(ScalarType::Bool),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(AssignError::mismatch("bool", &other)),
        }
    }

    fn blank() -> Self {
        false
    }
}

impl Decode for String {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<String>,
        def: Def::Scalar(ScalarType::String),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(AssignError::mismatch("String", &other)),
        }
    }

    fn blank() -> Self {
        String::new()
    }
}

impl<T: Decode> Decode for Option<T> {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<Option<T>>,
        def: Def::Option(shape_of::<T>),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn blank() -> Self {
        None
    }
}

impl<T: Decode> Decode for Vec<T> {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<Vec<T>>,
        def: Def::List(shape_of::<T>),
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        let Value::Array(array) = value else {
            return Err(AssignError::mismatch(type_name::<Vec<T>>(), &value));
        };
        array
            .into_items()
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_value(item).map_err(|source| AssignError::Element {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }

    fn blank() -> Self {
        Vec::new()
    }
}

impl Decode for Value {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<Value>,
        def: Def::Dynamic,
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        Ok(value)
    }

    fn blank() -> Self {
        Value::Null
    }
}

impl Decode for Map {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<Map>,
        def: Def::Map,
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(AssignError::mismatch("Map", &other)),
        }
    }

    fn blank() -> Self {
        Map::new()
    }
}

impl Decode for HashMap<String, Value> {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<HashMap<String, Value>>,
        def: Def::Map,
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        Map::from_value(value).map(|map| map.into_iter().collect())
    }

    fn blank() -> Self {
        HashMap::new()
    }
}

impl Decode for BTreeMap<String, Value> {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<BTreeMap<String, Value>>,
        def: Def::Map,
    };

    fn from_value(value: Value) -> Result<Self, AssignError> {
        Map::from_value(value).map(|map| map.into_iter().collect())
    }

    fn blank() -> Self {
        BTreeMap::new()
    }
}
