use super::*;
use crate::expression::builder::NodeBuilder;
use crate::expression::node::NodeKind;

#[test]
fn loads_host_json() {
    let doc = Document::from_json(include_str!("../../data/line_from_to.json")).unwrap();
    assert_eq!(doc.len(), 4);

    let (idx, l) = doc.iter().nth(2).unwrap();
    assert_eq!(idx, NodeIdx(2));
    assert_eq!(l.binding_label(), Some("L"));
    assert!(matches!(l.commandable().kind, NodeKind::Line { ref args, .. } if args.len() == 4));
    assert_eq!(doc.index_of(NodeId(12)), Some(NodeIdx(3)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut b = NodeBuilder::starting_at(1);
    let n = b.num(1.0);
    let err = Document::from_nodes(vec![n.clone(), n]).unwrap_err();
    assert!(matches!(err, GeoError::Serde(ref m) if m.contains("duplicate")));
}

#[test]
fn json_round_trips_structure() {
    let mut b = NodeBuilder::new();
    let rhs = b.def(&["x"], "x^2 + a");
    let f = b.assign("f", rhs);
    let doc = Document::from_nodes(vec![f]).unwrap();

    let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
    let node = back.node(NodeIdx(0)).unwrap();
    assert_eq!(node.binding_label(), Some("f"));
    assert!(matches!(
        node.commandable().kind,
        NodeKind::Def { ref body, .. } if body == "x^2 + a"
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        Document::from_json(r#"{"nodes": [{"id": 1, "kind": "bogus"}]}"#),
        Err(GeoError::Serde(_))
    ));
}
