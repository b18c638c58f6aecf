use super::*;

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

fn scope(pairs: &[(&str, f64)]) -> Scope {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), Primitive::Number(*v)))
        .collect()
}

#[test]
fn compiles_against_scope_snapshot() {
    let c = BytecodeCompiler;
    let f = c
        .compile("x^2 + a", &params(&["x"]), &scope(&[("a", 5.0)]))
        .unwrap();
    assert_eq!(f.eval(&[2.0]), 9.0);

    let g = c
        .compile("x^2 + a", &params(&["x"]), &scope(&[("a", 10.0)]))
        .unwrap();
    assert_eq!(g.eval(&[2.0]), 14.0);
    // The earlier formula keeps its own snapshot.
    assert_eq!(f.eval(&[2.0]), 9.0);
}

#[test]
fn params_shadow_scope() {
    let f = BytecodeCompiler
        .compile("x + 1", &params(&["x"]), &scope(&[("x", 100.0)]))
        .unwrap();
    assert_eq!(f.eval(&[1.0]), 2.0);
}

#[test]
fn builtins_and_constants() {
    let f = BytecodeCompiler
        .compile("sin(pi / 2) + max(t, 3) + (-2)^3", &params(&["t"]), &Scope::new())
        .unwrap();
    assert!((f.eval(&[1.0]) - (1.0 + 3.0 - 8.0)).abs() < 1e-12);
}

#[test]
fn unknown_names_fail_to_compile() {
    let err = BytecodeCompiler
        .compile("x + b", &params(&["x"]), &Scope::new())
        .unwrap_err();
    assert!(err.message.contains("unknown variable 'b'"));

    let err = BytecodeCompiler
        .compile("frob(x)", &params(&["x"]), &Scope::new())
        .unwrap_err();
    assert!(err.message.contains("unknown function"));

    let err = BytecodeCompiler
        .compile("max(x)", &params(&["x"]), &Scope::new())
        .unwrap_err();
    assert!(err.message.contains("expects 2"));
}

#[test]
fn text_scope_entries_are_not_numeric() {
    let mut s = Scope::new();
    s.insert("label".to_owned(), Primitive::Text("hi".to_owned()));
    let err = BytecodeCompiler
        .compile("x + label", &params(&["x"]), &s)
        .unwrap_err();
    assert!(err.message.contains("not numeric"));
}

#[test]
fn domain_faults_are_non_finite_not_errors() {
    let f = BytecodeCompiler
        .compile("sqrt(x)", &params(&["x"]), &Scope::new())
        .unwrap();
    assert!(f.eval(&[-1.0]).is_nan());
    let g = BytecodeCompiler
        .compile("1 / x", &params(&["x"]), &Scope::new())
        .unwrap();
    assert!(g.eval(&[0.0]).is_infinite());
}

#[test]
fn wrong_argument_count_evaluates_to_nan() {
    let f = BytecodeCompiler
        .compile("x * y", &params(&["x", "y"]), &Scope::new())
        .unwrap();
    assert!(f.eval(&[1.0]).is_nan());
    assert_eq!(f.eval(&[2.0, 3.0]), 6.0);
}

#[test]
fn free_variables_skip_params_and_call_targets() {
    let vars = BytecodeCompiler
        .free_variables("a * sin(x) + b^2 + pi", &params(&["x"]))
        .unwrap();
    assert_eq!(
        vars.into_iter().collect::<Vec<_>>(),
        vec!["a".to_owned(), "b".to_owned(), "pi".to_owned()]
    );
}

#[test]
fn bound_variables_shadow_named_constants() {
    let f = BytecodeCompiler
        .compile("x + e", &params(&["x"]), &scope(&[("e", 1.0)]))
        .unwrap();
    assert_eq!(f.eval(&[2.0]), 3.0);
    let vars = BytecodeCompiler.free_variables("x + e", &params(&["x"])).unwrap();
    assert!(vars.contains("e"));
}
