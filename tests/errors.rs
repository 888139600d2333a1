use std::{any::type_name, error::Error, io};

use node_decode::{
    AssignError, Decode, DecodeErrorKind, Def, Diagnostics, Node, Shape, Value, decode,
    decode_with, record,
};

/// A field type that refuses every value.
#[derive(Debug, Default)]
struct Sealed;

impl Decode for Sealed {
    const SHAPE: &'static Shape = &Shape {
        type_name: type_name::<Sealed>,
        def: Def::Dynamic,
    };

    fn from_value(_value: Value) -> Result<Self, AssignError> {
        Err(AssignError::custom("sealed values cannot be decoded"))
    }

    fn blank() -> Self {
        Sealed
    }
}

#[derive(Debug)]
struct Vault {
    owner: String,
    lock: Sealed,
}

record! {
    Vault { owner, lock }
}

#[derive(Debug)]
struct Bank {
    name: String,
    vaults: Vec<Vault>,
    main: Option<Vault>,
}

record! {
    Bank { name, vaults, main }
}

#[derive(Debug)]
struct Gate {
    open: bool,
}

impl Gate {
    fn try_new() -> Result<Self, io::Error> {
        Err(io::Error::other("gate is welded shut"))
    }
}

record! {
    #[try_construct = Gate::try_new]
    Gate { open }
}

#[derive(Debug)]
struct Hinge {
    gate: Gate,
}

record! {
    Hinge { gate }
}

// ============================================================================
// Field assignment
// ============================================================================

#[test]
fn setter_failure_names_record_and_field() {
    let node = Node::mapping([
        ("owner", Node::quoted("alice")),
        ("lock", Node::plain("combination")),
    ]);

    let error = decode::<Vault>(&node).unwrap_err();
    match error.kind() {
        DecodeErrorKind::FieldAssignment {
            type_name,
            field,
            source,
        } => {
            assert_eq!(*type_name, "Vault");
            assert_eq!(*field, "lock");
            assert_eq!(
                *source,
                AssignError::Custom("sealed values cannot be decoded".into())
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.source().is_some());
}

/// The error is raised once, at the innermost failure, and carries the full path.
#[test]
fn setter_failure_propagates_from_nested_records() {
    let node = Node::mapping([
        ("name", Node::quoted("central")),
        (
            "vaults",
            Node::sequence([
                Node::mapping([("owner", Node::quoted("alice"))]),
                Node::mapping([
                    ("owner", Node::quoted("bob")),
                    ("lock", Node::plain("1234")),
                ]),
            ]),
        ),
    ]);

    let error = decode::<Bank>(&node).unwrap_err();
    assert!(matches!(
        error.kind(),
        DecodeErrorKind::FieldAssignment {
            type_name: "Vault",
            field: "lock",
            ..
        }
    ));
    assert_eq!(error.path(), "vaults[1].lock");
    assert_eq!(
        error.to_string(),
        "at `vaults[1].lock`: failed to set field `lock` in Vault: sealed values cannot be decoded"
    );
}

#[test]
fn setter_failure_under_optional_field() {
    let node = Node::mapping([(
        "main",
        Node::mapping([("lock", Node::plain("x"))]),
    )]);
    let error = decode::<Bank>(&node).unwrap_err();
    assert_eq!(error.path(), "main.lock");
}

/// Fields no key covers are never assigned, so they cannot fail.
#[test]
fn absent_failing_field_is_harmless() {
    let node = Node::mapping([("owner", Node::quoted("alice"))]);
    let vault: Vault = decode(&node).unwrap();
    assert_eq!(vault.owner, "alice");
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn constructor_failure_is_fatal() {
    let node = Node::mapping([("open", Node::plain("true"))]);
    let error = decode::<Gate>(&node).unwrap_err();
    match error.kind() {
        DecodeErrorKind::Instantiation { type_name, source } => {
            assert_eq!(*type_name, "Gate");
            assert_eq!(source.to_string(), "gate is welded shut");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn constructor_failure_in_nested_record() {
    let node = Node::mapping([("gate", Node::mapping([("open", Node::plain("no"))]))]);
    let mut diagnostics = Diagnostics::new();
    let error = decode_with::<Hinge>(&node, &mut diagnostics).unwrap_err();
    assert!(matches!(
        error.kind(),
        DecodeErrorKind::Instantiation {
            type_name: "Gate",
            ..
        }
    ));
    assert_eq!(error.path(), "gate");
}

// ============================================================================
// Root mismatches
// ============================================================================

#[test]
fn scalar_root_for_record_target() {
    let error = decode::<Vault>(&Node::quoted("alice")).unwrap_err();
    match error.kind() {
        DecodeErrorKind::TargetMismatch { type_name, source } => {
            assert_eq!(*type_name, "Vault");
            assert!(matches!(source, AssignError::Mismatch { expected: "Vault", .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(error.path(), "");
}

#[test]
fn mapping_root_for_list_target() {
    let node = Node::mapping([("a", Node::plain("1"))]);
    let error = decode::<Vec<i32>>(&node).unwrap_err();
    assert!(matches!(error.kind(), DecodeErrorKind::TargetMismatch { .. }));
}

#[test]
fn element_failure_reports_index() {
    let node = Node::sequence([Node::plain("1"), Node::plain("300")]);
    let error = decode::<Vec<u8>>(&node).unwrap_err();
    match error.kind() {
        DecodeErrorKind::TargetMismatch { source, .. } => {
            assert!(matches!(source, AssignError::Element { index: 1, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}
