use node_decode::{DecodeErrorKind, Node, Value, ValueKind, decode, decode_value, record};

#[derive(Debug, PartialEq)]
struct Warp {
    names: Vec<String>,
    costs: Vec<Option<i32>>,
    grid: Vec<Vec<i32>>,
}

record! {
    Warp { names, costs, grid }
}

// ============================================================================
// Element inference
// ============================================================================

#[test]
fn empty_sequence_decodes_to_empty_vec() {
    let node = Node::mapping([("names", Node::sequence([]))]);
    let warp: Warp = decode(&node).unwrap();
    assert!(warp.names.is_empty());
}

#[test]
fn empty_sequence_has_no_element_kind() {
    let value = decode_value(&Node::sequence([])).unwrap();
    let array = value.as_array().unwrap();
    assert!(array.is_empty());
    assert_eq!(array.element(), None);
}

#[test]
fn element_kind_comes_from_first_item() {
    let value = decode_value(&Node::sequence([
        Node::plain("1"),
        Node::plain("2"),
        Node::plain("3"),
    ]))
    .unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.element(), Some(ValueKind::I32));
    assert_eq!(array.items(), [Value::I32(1), Value::I32(2), Value::I32(3)]);
}

/// Nulls keep their position and do not decide the element kind.
#[test]
fn nulls_are_allowed_anywhere() {
    let value = decode_value(&Node::sequence([
        Node::null(),
        Node::plain("4"),
        Node::plain("~"),
    ]))
    .unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.element(), Some(ValueKind::I32));
    assert_eq!(array.items(), [Value::Null, Value::I32(4), Value::Null]);

    let node = Node::mapping([(
        "costs",
        Node::sequence([Node::plain("5"), Node::null()]),
    )]);
    let warp: Warp = decode(&node).unwrap();
    assert_eq!(warp.costs, vec![Some(5), None]);
}

#[test]
fn nested_sequences() {
    let row = |a: &str, b: &str| Node::sequence([Node::plain(a), Node::plain(b)]);
    let node = Node::mapping([("grid", Node::sequence([row("1", "2"), row("3", "4")]))]);
    let warp: Warp = decode(&node).unwrap();
    assert_eq!(warp.grid, vec![vec![1, 2], vec![3, 4]]);
}

// ============================================================================
// Mixed sequences
// ============================================================================

#[test]
fn mixed_sequence_is_fatal() {
    let error = decode_value(&Node::sequence([
        Node::plain("1"),
        Node::quoted("two"),
    ]))
    .unwrap_err();
    match error.kind() {
        DecodeErrorKind::HeterogeneousSequence {
            index,
            expected,
            found,
        } => {
            assert_eq!(*index, 1);
            assert_eq!(*expected, ValueKind::I32);
            assert_eq!(*found, ValueKind::String);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// The first non-null item decides the kind, so the mismatch is reported at the third item.
#[test]
fn mixed_sequence_after_leading_null() {
    let node = Node::mapping([(
        "names",
        Node::sequence([Node::null(), Node::quoted("hub"), Node::plain("true")]),
    )]);
    let error = decode::<Warp>(&node).unwrap_err();
    match error.kind() {
        DecodeErrorKind::HeterogeneousSequence { index, found, .. } => {
            assert_eq!(*index, 2);
            assert_eq!(*found, ValueKind::Bool);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(error.path(), "names");
}

/// Integers and floats are distinct kinds; sequences do not unify them.
#[test]
fn ints_and_floats_do_not_mix() {
    let error = decode_value(&Node::sequence([Node::plain("1"), Node::plain("2.5")])).unwrap_err();
    assert!(matches!(
        error.kind(),
        DecodeErrorKind::HeterogeneousSequence {
            expected: ValueKind::I32,
            found: ValueKind::F64,
            ..
        }
    ));
}
