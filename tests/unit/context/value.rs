use super::*;

fn segment(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    Value::Shape(ShapeValue {
        graph: "g".to_owned(),
        geometry: Geometry::Segment(Line::new((x0, y0), (x1, y1))),
    })
}

#[test]
fn line_has_four_atomic_values() {
    assert_eq!(
        segment(0.0, 0.0, 5.0, 10.0).atomic_values().as_slice(),
        &[0.0, 0.0, 5.0, 10.0]
    );
}

#[test]
fn containers_have_no_atomic_values() {
    let g = Value::Graph(GraphSpec {
        name: "g".to_owned(),
        x_range: (-10.0, 10.0),
        y_range: (-10.0, 10.0),
    });
    assert!(g.atomic_values().is_empty());
}

#[test]
fn sequences_flatten() {
    let s = Value::Sequence(vec![Value::Number(1.0), segment(2.0, 3.0, 4.0, 5.0)]);
    assert_eq!(s.atomic_values().as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn numbers_and_shapes_interpolate() {
    let mid = Value::Number(5.0)
        .interpolate(&Value::Number(15.0), 0.5)
        .unwrap();
    assert_eq!(mid.as_number(), Some(10.0));

    let mid = segment(0.0, 0.0, 0.0, 0.0)
        .interpolate(&segment(2.0, 4.0, 6.0, 8.0), 0.5)
        .unwrap();
    assert_eq!(mid.atomic_values().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn mismatched_values_do_not_interpolate() {
    let p = Value::Shape(ShapeValue {
        graph: "g".to_owned(),
        geometry: Geometry::Point(Point::new(1.0, 1.0)),
    });
    assert!(p.interpolate(&segment(0.0, 0.0, 1.0, 1.0), 0.5).is_none());
    assert!(Value::Number(1.0).interpolate(&p, 0.5).is_none());

    let a = Value::Shape(ShapeValue {
        graph: "g".to_owned(),
        geometry: Geometry::Polygon(vec![Point::ZERO; 3]),
    });
    let b = Value::Shape(ShapeValue {
        graph: "g".to_owned(),
        geometry: Geometry::Polygon(vec![Point::ZERO; 4]),
    });
    assert!(a.interpolate(&b, 0.5).is_none());
}

#[test]
fn only_plain_values_are_primitive() {
    assert_eq!(
        Value::Number(2.0).as_primitive(),
        Some(Primitive::Number(2.0))
    );
    assert_eq!(
        Value::Text("hi".to_owned()).as_primitive(),
        Some(Primitive::Text("hi".to_owned()))
    );
    assert_eq!(segment(0.0, 0.0, 1.0, 1.0).as_primitive(), None);
}
