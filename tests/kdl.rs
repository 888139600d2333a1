#![cfg(feature = "kdl")]

use indoc::indoc;
use node_decode::{
    DecodeErrorKind, DiagnosticKind, Diagnostics, Map, Node, Value, ValueKind, decode_with,
    from_kdl_str, parse_kdl, record,
};

#[derive(Debug, Default, PartialEq)]
struct Destination {
    name: String,
    world: String,
    pos: Vec<f64>,
    yaw: f32,
}

record! {
    #[construct = Destination::default]
    Destination { name, world, pos, yaw }
}

#[derive(Debug, Default)]
struct Portal {
    name: String,
    trigger: String,
    destination: Option<Destination>,
    flags: i8,
    tags: Vec<String>,
    args: Map,
}

record! {
    #[construct = Portal::default]
    Portal { name, trigger, destination, flags, tags, args }
}

#[derive(Debug, Default)]
struct Network {
    portals: Vec<Portal>,
}

record! {
    #[construct = Network::default]
    Network { portals }
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn single_argument_is_scalar() {
    let node = parse_kdl(indoc! {r#"
        name "spawn"
        radius 16
        enabled #true
        owner #null
    "#})
    .unwrap();

    assert_eq!(
        node,
        Node::Mapping(vec![
            (Node::plain("name"), Node::quoted("spawn")),
            (Node::plain("radius"), Node::plain("16")),
            (Node::plain("enabled"), Node::plain("true")),
            (Node::plain("owner"), Node::null()),
        ])
    );
}

#[test]
fn several_arguments_are_sequence() {
    let node = parse_kdl("pos 1 2 3\nempty\n").unwrap();
    assert_eq!(
        node,
        Node::Mapping(vec![
            (
                Node::plain("pos"),
                Node::sequence([Node::plain("1"), Node::plain("2"), Node::plain("3")]),
            ),
            (Node::plain("empty"), Node::sequence([])),
        ])
    );
}

#[test]
fn properties_and_children_are_mapping() {
    let node = parse_kdl(indoc! {r#"
        portal name="spawn" {
            trigger "WATER"
        }
    "#})
    .unwrap();
    assert_eq!(
        node,
        Node::mapping([(
            "portal",
            Node::mapping([
                ("name", Node::quoted("spawn")),
                ("trigger", Node::quoted("WATER")),
            ]),
        )])
    );
}

#[test]
fn dash_children_are_sequence() {
    let node = parse_kdl(indoc! {r#"
        tags {
            - "public"
            - "lobby"
        }
    "#})
    .unwrap();
    assert_eq!(
        node,
        Node::mapping([(
            "tags",
            Node::sequence([Node::quoted("public"), Node::quoted("lobby")]),
        )])
    );
}

#[test]
fn floats_keep_their_kind() {
    let node = parse_kdl("a 1.0\nb -0.5\nc #inf\nd #nan\n").unwrap();
    let value = node_decode::decode_value(&node).unwrap();
    assert_eq!(value.get("a"), Some(&Value::F64(1.0)));
    assert_eq!(value.get("b"), Some(&Value::F64(-0.5)));
    assert_eq!(value.get("c"), Some(&Value::F64(f64::INFINITY)));
    assert!(value.get("d").and_then(Value::as_f64).unwrap().is_nan());
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn decode_nested_portals() {
    let kdl = indoc! {r#"
        portals {
            - name="spawn" trigger="WATER" flags=300
            - {
                name "hub"
                trigger "LAVA"
                destination {
                    name "hub"
                    world "overworld"
                    pos 0.5 64.0 -12.5
                    yaw 90.0
                }
                tags {
                    - "public"
                }
                args message="welcome" cooldown=20
            }
        }
    "#};

    let mut diagnostics = Diagnostics::new();
    let node = parse_kdl(kdl).unwrap();
    let network: Network = decode_with(&node, &mut diagnostics).unwrap();

    assert_eq!(network.portals.len(), 2);
    let spawn = &network.portals[0];
    assert_eq!(spawn.name, "spawn");
    assert_eq!(spawn.flags, 44);
    assert!(spawn.destination.is_none());

    let hub = &network.portals[1];
    let dest = hub.destination.as_ref().unwrap();
    assert_eq!(dest.pos, vec![0.5, 64.0, -12.5]);
    assert_eq!(dest.yaw, 90.0);
    assert_eq!(hub.tags, vec!["public"]);
    assert_eq!(hub.args["message"].as_str(), Some("welcome"));
    assert_eq!(hub.args["cooldown"], Value::I32(20));
    assert_eq!(diagnostics.count(DiagnosticKind::UnknownKey), 0);
}

#[test]
fn from_kdl_str_decodes_directly() {
    let dest: Destination = from_kdl_str(indoc! {r#"
        name "end"
        world "the_end"
        pos 0.0 70.0 0.0
        yaw -90.0
        comment "not a field"
    "#})
    .unwrap();
    assert_eq!(dest.world, "the_end");
    assert_eq!(dest.yaw, -90.0);
}

#[test]
fn argument_free_node_is_empty_list() {
    let portal: Portal = from_kdl_str("name \"spawn\"\ntags\n").unwrap();
    assert!(portal.tags.is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn arguments_mixed_with_properties_are_rejected() {
    let error = parse_kdl(r#"portal "spawn" trigger="WATER""#).unwrap_err();
    assert!(matches!(error.kind(), DecodeErrorKind::UnsupportedDocument(_)));
}

#[test]
fn arguments_mixed_with_children_are_rejected() {
    let error = parse_kdl(indoc! {r#"
        portal "spawn" {
            trigger "WATER"
        }
    "#})
    .unwrap_err();
    assert!(matches!(error.kind(), DecodeErrorKind::UnsupportedDocument(_)));
}

/// Integer and float arguments are different kinds, so one list cannot mix them.
#[test]
fn list_numbers_must_share_a_literal_form() {
    let error = from_kdl_str::<Destination>("pos 0 64.5 -12\n").unwrap_err();
    assert!(matches!(
        error.kind(),
        DecodeErrorKind::HeterogeneousSequence {
            index: 1,
            expected: ValueKind::I32,
            found: ValueKind::F64,
        }
    ));
    assert_eq!(error.path(), "pos");

    let dest: Destination = from_kdl_str("pos 0.0 64.5 -12.0\n").unwrap();
    assert_eq!(dest.pos, vec![0.0, 64.5, -12.0]);
}

#[test]
fn invalid_kdl_is_a_parse_error() {
    let error = parse_kdl("portal {").unwrap_err();
    assert!(matches!(error.kind(), DecodeErrorKind::Parse(_)));
}
