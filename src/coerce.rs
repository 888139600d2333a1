use crate::{
    shape::{Def, ScalarType, Shape},
    value::Value,
};

/// Narrows `value` to fit a field declared as `declared`.
///
/// Only these conversions happen, checked in order:
///
/// | declared | value | result |
/// |----------|-------|--------|
/// | `f32`    | `F64` | `F32`, rounded |
/// | `i32`    | `I64` | `I32`, wrapping |
/// | `i16`    | `I32` | `I16`, wrapping |
/// | `i8`     | `I32` | `I8`, wrapping |
///
/// `Option<T>` is looked through, and a `Vec<T>` applies the table to each item. Anything else
/// is returned unchanged; a mismatch then surfaces when the value is assigned.
pub fn coerce(declared: &'static Shape, value: Value) -> Value {
    match (declared.unwrap_option().def, value) {
        (Def::Scalar(ScalarType::F32), Value::F64(n)) => Value::F32(n as f32),
        (Def::Scalar(ScalarType::I32), Value::I64(n)) => Value::I32(n as i32),
        (Def::Scalar(ScalarType::I16), Value::I32(n)) => Value::I16(n as i16),
        (Def::Scalar(ScalarType::I8), Value::I32(n)) => Value::I8(n as i8),
        (Def::List(element), Value::Array(array)) => {
            let element = element();
            Value::Array(array.map_items(|item| coerce(element, item)))
        }
        (_, value) => value,
    }
}
