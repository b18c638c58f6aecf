use kurbo::Point;

use crate::context::value::{Curve, PlotValue};

/// Sample a plot evenly over its domain.
///
/// Non-finite samples are dropped and split the curve into separate runs, so a pole draws as two
/// branches instead of a spike.
pub fn sample_curve(plot: &PlotValue, samples: u32) -> Vec<Vec<Point>> {
    let n = samples.max(2);
    let (lo, hi) = plot.domain;
    let step = (hi - lo) / f64::from(n - 1);

    let mut runs = Vec::new();
    let mut run = Vec::new();
    let mut dropped = 0u32;
    for i in 0..n {
        let t = lo + step * f64::from(i);
        let p = match &plot.curve {
            Curve::Explicit(f) => Point::new(t, f.eval(&[t])),
            Curve::Parametric { x, y } => Point::new(x.eval(&[t]), y.eval(&[t])),
        };
        if p.is_finite() {
            run.push(p);
        } else {
            dropped += 1;
            if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }

    if dropped > 0 {
        tracing::trace!(dropped, samples = n, "dropped non-finite plot samples");
    }
    runs
}

#[cfg(test)]
#[path = "../../tests/unit/command/plot.rs"]
mod tests;
