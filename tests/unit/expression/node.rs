use super::*;
use crate::context::value::{Curve, Geometry};
use crate::expression::builder::NodeBuilder;
use crate::foundation::error::GeoError;
use crate::foundation::ids::NodeIdx;
use kurbo::Point;

fn ctx_with_graph(b: &mut NodeBuilder) -> ExpressionContext {
    let mut ctx = ExpressionContext::default();
    let g = b.g2d();
    let mut g = b.assign("g", g);
    g.resolve(&mut ctx).unwrap();
    ctx
}

fn eval_plot(node: &ExprNode, x: f64) -> f64 {
    match node.resolved() {
        Some(Value::Plot(p)) => match &p.curve {
            Curve::Explicit(f) => f.eval(&[x]),
            Curve::Parametric { .. } => panic!("expected an explicit plot"),
        },
        other => panic!("expected a plot, got {other:?}"),
    }
}

#[test]
fn plots_bind_free_variables_at_resolve_time() {
    let mut b = NodeBuilder::new();
    let mut ctx = ctx_with_graph(&mut b);
    let five = b.num(5.0);
    b.assign("a", five).resolve(&mut ctx).unwrap();
    let body = b.def(&["x"], "x^2 + a");
    b.assign("f", body).resolve(&mut ctx).unwrap();

    let f = b.var("f");
    let mut plot = b.plot("g", f, None);
    plot.resolve(&mut ctx).unwrap();
    assert_eq!(eval_plot(&plot, 2.0), 9.0);

    ctx.update_reference("a", Value::Number(10.0));
    plot.resolve(&mut ctx).unwrap();
    assert_eq!(eval_plot(&plot, 2.0), 14.0);
}

#[test]
fn reads_are_recorded_against_the_caller() {
    let mut b = NodeBuilder::new();
    let mut ctx = ctx_with_graph(&mut b);
    let five = b.num(5.0);
    b.assign("a", five).resolve(&mut ctx).unwrap();

    let args = vec![b.num(0.0), b.num(0.0), b.var("a"), b.num(10.0)];
    let line = b.line("g", args);
    let mut line = b.assign("L", line);
    ctx.set_caller(Some(NodeIdx(2)));
    line.resolve(&mut ctx).unwrap();
    ctx.set_caller(None);

    assert_eq!(ctx.get_dependents("a").collect::<Vec<_>>(), vec![NodeIdx(2)]);
    assert_eq!(ctx.get_dependents("g").collect::<Vec<_>>(), vec![NodeIdx(2)]);
    assert_eq!(
        line.atomic_values().as_slice(),
        &[0.0, 0.0, 5.0, 10.0]
    );
}

#[test]
fn animation_endpoints_are_not_dependencies() {
    let mut b = NodeBuilder::new();
    let mut ctx = ExpressionContext::default();
    let five = b.num(5.0);
    b.assign("a", five).resolve(&mut ctx).unwrap();
    let two = b.num(2.0);
    b.assign("b", two).resolve(&mut ctx).unwrap();

    let from = b.var("b");
    let to = b.num(15.0);
    let mut anim = ExprNode::new(
        NodeId(99),
        NodeKind::FromTo {
            variable: "a".to_owned(),
            from: Box::new(from),
            to: Box::new(to),
        },
    );
    ctx.set_caller(Some(NodeIdx(3)));
    anim.resolve(&mut ctx).unwrap();
    ctx.set_caller(None);

    assert_eq!(ctx.get_dependents("b").count(), 0);
    let Some(Value::Animation(spec)) = anim.resolved() else {
        panic!("expected an animation");
    };
    assert_eq!(spec.from.as_number(), Some(2.0));
    assert_eq!(spec.to.as_number(), Some(15.0));
}

#[test]
fn errors_carry_the_failing_node_id() {
    let mut b = NodeBuilder::starting_at(40);
    let mut ctx = ExpressionContext::default();
    let mut missing = b.var("nope");
    let err = missing.resolve(&mut ctx).unwrap_err();
    assert!(matches!(err, GeoError::Expression { id: NodeId(40), .. }));
    assert!(err.to_string().contains("'nope'"));
    assert!(missing.resolved().is_none());
}

#[test]
fn assignments_delegate_playability() {
    let mut b = NodeBuilder::new();
    let mut ctx = ctx_with_graph(&mut b);
    let five = b.num(5.0);
    let mut a = b.assign("a", five);
    a.resolve(&mut ctx).unwrap();
    assert!(!a.can_play());
    assert!(a.to_command(&StyleOptions::default()).unwrap().is_none());

    let args = vec![b.num(1.0), b.num(2.0)];
    let p = b.point("g", args);
    let mut p = b.assign("P", p);
    p.resolve(&mut ctx).unwrap();
    assert!(p.can_play());
    assert_eq!(p.binding_label(), Some("P"));
    assert!(matches!(p.commandable().kind, NodeKind::Point { .. }));
    assert!(matches!(
        p.resolved(),
        Some(Value::Shape(s)) if s.geometry == Geometry::Point(Point::new(1.0, 2.0))
    ));

    let cmd = p.to_command(&StyleOptions::default()).unwrap().unwrap();
    assert_eq!(cmd.core().expression_id(), Some(p.id));
    assert_eq!(cmd.core().label(), Some("P"));
}

#[test]
fn unresolved_nodes_have_no_payload() {
    let mut b = NodeBuilder::new();
    let args = vec![b.num(1.0), b.num(2.0)];
    let p = b.point("g", args);
    assert!(p.atomic_values().is_empty());
    assert!(p.to_command(&StyleOptions::default()).is_err());
}
