use super::*;
use crate::command::build_command;
use crate::command::harness::Parts;
use crate::command::lifecycle::CommandState;
use crate::command::style::StyleOptions;
use crate::context::value::{Geometry, GraphSpec, ShapeValue, Value};
use crate::foundation::ids::NodeId;
use kurbo::Point;

fn dot(x: f64) -> Value {
    Value::Shape(ShapeValue {
        graph: "g".to_owned(),
        geometry: Geometry::Point(Point::new(x, 0.0)),
    })
}

fn seq() -> Box<dyn Command> {
    let value = Value::Sequence(vec![
        Value::Graph(GraphSpec {
            name: "g".to_owned(),
            x_range: (-1.0, 1.0),
            y_range: (-1.0, 1.0),
        }),
        Value::Number(3.0),
        dot(0.0),
        dot(1.0),
    ]);
    build_command(Some(NodeId(7)), Some("S"), &value, &StyleOptions::default()).unwrap()
}

#[test]
fn children_run_in_order() {
    let mut parts = Parts::new();
    let mut s = seq();
    s.play(&mut parts.cx()).unwrap();

    assert_eq!(s.state(), CommandState::Idle);
    let shapes: Vec<_> = parts.backend.live_shapes().map(|(_, d)| d.clone()).collect();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|d| d.node == Some(NodeId(7))));
    assert_eq!(shapes[0].geometry, Geometry::Point(Point::new(0.0, 0.0)));
    assert_eq!(parts.backend.live_count(), 3);
}

#[test]
fn clear_reaches_every_child() {
    let mut parts = Parts::new();
    let mut s = seq();
    let mut cx = parts.cx();
    s.direct_play(&mut cx).unwrap();
    s.clear(&mut cx);
    drop(cx);
    assert_eq!(parts.backend.live_count(), 0);
}

#[test]
fn children_do_not_publish_under_the_sequence_label() {
    let mut parts = Parts::new();
    let mut s = seq();
    s.direct_play(&mut parts.cx()).unwrap();
    assert_eq!(parts.registry.shape("S"), None);
    assert!(parts.registry.container("g").is_ok());
}
