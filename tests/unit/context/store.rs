use super::*;
use crate::context::value::Primitive;

fn idx(i: u32) -> NodeIdx {
    NodeIdx(i)
}

#[test]
fn reads_record_the_current_caller() {
    let mut ctx = ExpressionContext::default();
    ctx.add_reference("a", Value::Number(5.0));

    assert!(ctx.read_reference("a").is_some());
    assert_eq!(ctx.get_dependents("a").count(), 0);

    ctx.set_caller(Some(idx(3)));
    assert_eq!(ctx.read_reference("a").and_then(|v| v.as_number()), Some(5.0));
    ctx.set_caller(Some(idx(1)));
    ctx.read_reference("a");
    ctx.read_reference("a");

    assert_eq!(
        ctx.get_dependents("a").collect::<Vec<_>>(),
        vec![idx(1), idx(3)]
    );
}

#[test]
fn missing_reference_is_none_and_records_nothing() {
    let mut ctx = ExpressionContext::default();
    ctx.set_caller(Some(idx(0)));
    assert!(ctx.read_reference("nope").is_none());
    assert_eq!(ctx.get_dependents("nope").count(), 0);
}

#[test]
fn update_keeps_origin_and_edges() {
    let mut ctx = ExpressionContext::default();
    ctx.set_caller(Some(idx(0)));
    ctx.add_reference("a", Value::Number(5.0));
    ctx.set_caller(Some(idx(1)));
    ctx.read_reference("a");
    ctx.set_caller(None);

    ctx.update_reference("a", Value::Number(10.0));

    let b = ctx.binding("a").unwrap();
    assert_eq!(b.value.as_number(), Some(10.0));
    assert_eq!(b.origin, Some(idx(0)));
    assert_eq!(ctx.get_dependents("a").collect::<Vec<_>>(), vec![idx(1)]);
}

#[test]
fn primitive_snapshot_is_taken_at_call_time() {
    let mut ctx = ExpressionContext::default();
    ctx.add_reference("a", Value::Number(5.0));
    ctx.add_reference("s", Value::Text("x".to_owned()));
    ctx.add_reference(
        "f",
        Value::Function(crate::context::value::FunctionDef {
            params: vec!["x".to_owned()],
            body: "x".to_owned(),
        }),
    );

    let before = ctx.references_as_primitives();
    ctx.update_reference("a", Value::Number(10.0));
    let after = ctx.references_as_primitives();

    assert_eq!(before.len(), 2);
    assert_eq!(before.get("a"), Some(&Primitive::Number(5.0)));
    assert_eq!(after.get("a"), Some(&Primitive::Number(10.0)));
    assert!(!after.contains_key("f"));
}

#[test]
fn without_caller_suppresses_edges() {
    let mut ctx = ExpressionContext::default();
    ctx.add_reference("a", Value::Number(1.0));
    ctx.set_caller(Some(idx(4)));
    ctx.without_caller(|c| c.read_reference("a"));
    assert_eq!(ctx.caller(), Some(idx(4)));
    assert_eq!(ctx.get_dependents("a").count(), 0);
}

#[test]
fn formula_dependencies_skip_unbound_names() {
    let mut ctx = ExpressionContext::default();
    ctx.add_reference("a", Value::Number(1.0));
    ctx.set_caller(Some(idx(2)));
    let names = vec!["a".to_owned(), "b".to_owned()];
    ctx.register_dependencies(&names);
    assert_eq!(ctx.get_dependents("a").collect::<Vec<_>>(), vec![idx(2)]);
    assert_eq!(ctx.get_dependents("b").count(), 0);
}

#[test]
fn second_animation_claim_is_busy() {
    let mut ctx = ExpressionContext::default();
    ctx.begin_animation("a").unwrap();
    assert!(ctx.is_animating("a"));
    let err = ctx.begin_animation("a").unwrap_err();
    assert!(matches!(err, GeoError::Busy { ref variable } if variable == "a"));
    ctx.begin_animation("b").unwrap();
    ctx.end_animation("a");
    ctx.begin_animation("a").unwrap();
}
