use super::*;
use crate::command::harness::Parts;
use crate::command::lifecycle::CommandState;
use crate::expression::builder::NodeBuilder;
use crate::expression::node::{BinOp, ExprNode};

fn line_doc() -> Vec<ExprNode> {
    let mut b = NodeBuilder::new();
    let g = b.g2d();
    let g = b.assign("g", g);
    let n = b.num(5.0);
    let a = b.assign("a", n);
    let args = vec![b.num(0.0), b.num(0.0), b.var("a"), b.num(10.0)];
    let l = b.line("g", args);
    let l = b.assign("L", l);
    vec![g, a, l]
}

fn prepare(cx: &mut CommandCtx<'_>) -> RecomputeEngine {
    RecomputeEngine::prepare("a", StyleOptions::default(), false, cx).unwrap()
}

/// Direct-play the session command in slot `i`.
fn draw(parts: &mut Parts, i: usize) {
    let mut cmd = parts.commands[i].take().unwrap();
    cmd.direct_play(&mut parts.cx()).unwrap();
    parts.commands[i] = Some(cmd);
}

/// Line document loaded, with only the graph drawn.
fn ready() -> Parts {
    let mut parts = Parts::new();
    parts.load(line_doc()).unwrap();
    draw(&mut parts, 0);
    parts
}

#[test]
fn animate_renders_one_frame_per_tick() {
    let mut parts = ready();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);
    assert_eq!(engine.plan().order(), &[NodeIdx(2)]);

    // 0.5s at 4 fps.
    engine
        .animate(&mut cx, &Value::Number(5.0), &Value::Number(15.0), 0.5)
        .unwrap();
    assert_eq!(engine.frames(), 2);
    assert_eq!(engine.live().len(), 1);
    assert!(engine.live()[0].core().is_temporary());
    assert_eq!(engine.live()[0].state(), CommandState::Idle);
    drop(cx);

    assert_eq!(
        parts.exprs.get_reference("a").and_then(Value::as_number),
        Some(15.0)
    );
    assert!(!parts.exprs.is_animating("a"));
    assert_eq!(parts.backend.live_shapes().count(), 1);
}

#[test]
fn first_frame_swaps_in_a_fresh_session_command() {
    let mut parts = ready();
    draw(&mut parts, 2);
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);
    engine.jump(&mut cx, &Value::Number(7.0)).unwrap();
    drop(cx);

    let fresh = parts.commands[2].as_ref().unwrap();
    assert_eq!(fresh.state(), CommandState::Uninitialized);
    assert!(fresh.core().artifacts().is_empty());
    assert_eq!(fresh.core().label(), Some("L"));
    // Only the engine's line is left.
    assert_eq!(parts.backend.live_shapes().count(), 1);
    assert_eq!(engine.frames(), 1);
}

#[test]
fn every_run_retires_the_session_command_again() {
    let mut parts = ready();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);
    engine.jump(&mut cx, &Value::Number(7.0)).unwrap();
    drop(cx);

    // The fresh command draws again next to the engine's line.
    draw(&mut parts, 2);
    assert_eq!(parts.backend.live_shapes().count(), 2);

    let mut cx = parts.cx();
    engine.jump(&mut cx, &Value::Number(9.0)).unwrap();
    drop(cx);
    assert_eq!(parts.backend.live_shapes().count(), 1);
    assert_eq!(
        parts.commands[2].as_ref().unwrap().state(),
        CommandState::Uninitialized
    );
}

#[test]
fn rewind_restores_the_value_before_the_first_run() {
    let mut parts = ready();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);
    engine.rewind(&mut cx).unwrap();
    engine.jump(&mut cx, &Value::Number(7.0)).unwrap();
    engine.jump(&mut cx, &Value::Number(9.0)).unwrap();
    engine.rewind(&mut cx).unwrap();
    engine.rewind(&mut cx).unwrap();
    drop(cx);

    assert!(engine.live().is_empty());
    assert_eq!(parts.backend.live_shapes().count(), 0);
    assert_eq!(
        parts.exprs.get_reference("a").and_then(Value::as_number),
        Some(5.0)
    );
    let line = parts.document.node(NodeIdx(2)).unwrap().commandable();
    assert_eq!(line.atomic_values().as_slice(), &[0.0, 0.0, 5.0, 10.0]);
}

#[test]
fn change_needs_its_shape_drawn() {
    let mut b = NodeBuilder::new();
    let g = b.g2d();
    let g = b.assign("g", g);
    let args = vec![b.num(0.0), b.num(0.0)];
    let p = b.point("g", args);
    let p = b.assign("P", p);

    let mut parts = Parts::new();
    parts.load(vec![g, p]).unwrap();
    draw(&mut parts, 0);

    let err = RecomputeEngine::prepare("P", StyleOptions::default(), true, &mut parts.cx())
        .unwrap_err();
    match err {
        GeoError::Lifecycle { collaborator, .. } => assert_eq!(collaborator, "shape 'P'"),
        other => panic!("unexpected error: {other}"),
    }

    draw(&mut parts, 1);
    RecomputeEngine::prepare("P", StyleOptions::default(), true, &mut parts.cx()).unwrap();
}

#[test]
fn clear_releases_the_latest_frame() {
    let mut parts = ready();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);
    engine.jump(&mut cx, &Value::Number(7.0)).unwrap();
    engine.clear(&mut cx);
    engine.clear(&mut cx);
    drop(cx);

    assert!(engine.live().is_empty());
    assert_eq!(parts.backend.live_shapes().count(), 0);
    // The graph container is not the engine's to release.
    assert_eq!(parts.backend.live_count(), 1);
}

#[test]
fn locked_variable_is_busy() {
    let mut parts = ready();
    parts.exprs.begin_animation("a").unwrap();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);

    let err = engine.jump(&mut cx, &Value::Number(7.0)).unwrap_err();
    assert!(matches!(err, GeoError::Busy { .. }));
    assert_eq!(engine.frames(), 0);
    drop(cx);
    assert!(parts.exprs.is_animating("a"));
}

#[test]
fn mismatched_endpoints_release_the_lock() {
    let mut parts = ready();
    let mut cx = parts.cx();
    let mut engine = prepare(&mut cx);

    let err = engine
        .animate(&mut cx, &Value::Text("x".to_owned()), &Value::Number(1.0), 0.5)
        .unwrap_err();
    assert!(matches!(err, GeoError::Lifecycle { .. }));
    drop(cx);
    assert!(!parts.exprs.is_animating("a"));
}

#[test]
fn cycles_fail_at_prepare() {
    let mut b = NodeBuilder::new();
    let n = b.num(1.0);
    let a = b.assign("a", n);
    let lhs = b.var("a");
    let rhs = b.num(1.0);
    let sum = b.binary(BinOp::Add, lhs, rhs);
    let bb = b.assign("b", sum);
    let back = b.var("b");
    let again = b.assign("a", back);

    let mut parts = Parts::new();
    parts.load(vec![a, bb, again]).unwrap();
    let err = RecomputeEngine::prepare("a", StyleOptions::default(), false, &mut parts.cx())
        .unwrap_err();
    match err {
        GeoError::Cycle { variable, labels } => {
            assert_eq!(variable, "a");
            assert_eq!(labels, vec!["b".to_owned(), "a".to_owned()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(parts.backend.events().is_empty());
}
