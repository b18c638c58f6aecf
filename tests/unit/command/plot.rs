use super::*;
use crate::formula::Formula;

fn explicit(f: impl Fn(f64) -> f64 + Send + Sync + 'static, domain: (f64, f64)) -> PlotValue {
    PlotValue {
        graph: "g".to_owned(),
        curve: Curve::Explicit(Formula::new("f", vec!["x".to_owned()], move |a| f(a[0]))),
        domain,
    }
}

#[test]
fn samples_cover_the_domain() {
    let runs = sample_curve(&explicit(|x| x * x, (-2.0, 2.0)), 5);
    assert_eq!(runs.len(), 1);
    let xs: Vec<f64> = runs[0].iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    assert_eq!(runs[0][0].y, 4.0);
}

#[test]
fn non_finite_samples_split_the_curve() {
    let runs = sample_curve(&explicit(|x| 1.0 / x, (-2.0, 2.0)), 5);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].len(), 2);
    assert_eq!(runs[1].len(), 2);
}

#[test]
fn all_dropped_is_empty() {
    let runs = sample_curve(&explicit(|x| (-1.0 - x * x).sqrt(), (0.0, 1.0)), 10);
    assert!(runs.is_empty());
}

#[test]
fn parametric_circle() {
    let plot = PlotValue {
        graph: "g".to_owned(),
        curve: Curve::Parametric {
            x: Formula::new("cos(t)", vec!["t".to_owned()], |a| a[0].cos()),
            y: Formula::new("sin(t)", vec!["t".to_owned()], |a| a[0].sin()),
        },
        domain: (0.0, std::f64::consts::TAU),
    };
    let runs = sample_curve(&plot, 9);
    assert_eq!(runs[0].len(), 9);
    for p in &runs[0] {
        assert!((p.to_vec2().hypot() - 1.0).abs() < 1e-9);
    }
}
