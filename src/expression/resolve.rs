use kurbo::{Line, Point};

use crate::context::store::ExpressionContext;
use crate::context::value::{
    AnimationKind, AnimationSpec, Curve, FunctionDef, Geometry, GraphSpec, PlotValue, ShapeValue,
    Value,
};
use crate::expression::node::{BinOp, ExprNode, NodeKind};
use crate::formula::Formula;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::geom::{line_intersection, sss_triangle};
use crate::foundation::ids::NodeId;

const DEFAULT_GRAPH_RANGE: (f64, f64) = (-10.0, 10.0);
const DEFAULT_PARAMETRIC_DOMAIN: (f64, f64) = (0.0, std::f64::consts::TAU);

pub(crate) fn resolve_kind(
    id: NodeId,
    label: Option<&str>,
    kind: &mut NodeKind,
    ctx: &mut ExpressionContext,
) -> GeoResult<Value> {
    match kind {
        NodeKind::Number { value } => Ok(Value::Number(*value)),
        NodeKind::Text { value } => Ok(Value::Text(value.clone())),
        NodeKind::Var { name } => ctx
            .read_reference(name)
            .ok_or_else(|| GeoError::expression(id, format!("variable '{name}' is not defined"))),
        NodeKind::Assign { name, expr } => {
            expr.label = Some(name.clone());
            let value = child(expr, ctx)?;
            ctx.add_reference(name.clone(), value.clone());
            Ok(value)
        }
        NodeKind::Binary { op, left, right } => {
            let a = child(left, ctx)?;
            let b = child(right, ctx)?;
            binary(id, *op, &a, &b)
        }
        NodeKind::Range { lo, hi } => {
            let lo = number(id, "range start", child(lo, ctx)?)?;
            let hi = number(id, "range end", child(hi, ctx)?)?;
            if lo >= hi {
                return Err(GeoError::expression(
                    id,
                    format!("range({lo}, {hi}) is empty"),
                ));
            }
            Ok(Value::Range { lo, hi })
        }
        NodeKind::Graph { x_range, y_range } => {
            let Some(name) = label else {
                return Err(GeoError::expression(
                    id,
                    "g2d() must be assigned to a variable",
                ));
            };
            Ok(Value::Graph(GraphSpec {
                name: name.to_owned(),
                x_range: optional_range(id, x_range.as_deref_mut(), ctx)?
                    .unwrap_or(DEFAULT_GRAPH_RANGE),
                y_range: optional_range(id, y_range.as_deref_mut(), ctx)?
                    .unwrap_or(DEFAULT_GRAPH_RANGE),
            }))
        }
        NodeKind::Point { graph, args } => {
            let graph = graph_spec(id, graph, ctx)?;
            let c = coords(id, "point", args, ctx, &[2])?;
            Ok(shape(graph, Geometry::Point(Point::new(c[0], c[1]))))
        }
        NodeKind::Line { graph, args } => {
            let graph = graph_spec(id, graph, ctx)?;
            let c = coords(id, "line", args, ctx, &[4])?;
            Ok(shape(
                graph,
                Geometry::Segment(Line::new((c[0], c[1]), (c[2], c[3]))),
            ))
        }
        NodeKind::Circle { graph, args } => {
            let graph = graph_spec(id, graph, ctx)?;
            let c = coords(id, "circle", args, ctx, &[3])?;
            if c[2] <= 0.0 {
                return Err(GeoError::expression(
                    id,
                    format!("circle radius must be positive, got {}", c[2]),
                ));
            }
            Ok(shape(
                graph,
                Geometry::Circle {
                    center: Point::new(c[0], c[1]),
                    radius: c[2],
                },
            ))
        }
        NodeKind::Polygon { graph, args } => {
            let graph = graph_spec(id, graph, ctx)?;
            let c = coords(id, "polygon", args, ctx, &[])?;
            if c.len() < 6 || c.len() % 2 != 0 {
                return Err(GeoError::expression(
                    id,
                    format!(
                        "polygon() expects at least 3 vertices, got {} coordinate(s)",
                        c.len()
                    ),
                ));
            }
            let pts = c.chunks_exact(2).map(|p| Point::new(p[0], p[1])).collect();
            Ok(shape(graph, Geometry::Polygon(pts)))
        }
        NodeKind::Sss { graph, args } => {
            let graph = graph_spec(id, graph, ctx)?;
            let c = coords(id, "sss", args, ctx, &[3, 5, 6])?;
            let base = if c.len() >= 5 {
                Point::new(c[3], c[4])
            } else {
                Point::ORIGIN
            };
            let rotation = c.get(5).copied().unwrap_or(0.0);
            let tri = sss_triangle(c[0], c[1], c[2], base, rotation).ok_or_else(|| {
                GeoError::expression(
                    id,
                    format!(
                        "sides {}, {}, {} do not form a triangle",
                        c[0], c[1], c[2]
                    ),
                )
            })?;
            Ok(shape(graph, Geometry::Polygon(tri.to_vec())))
        }
        NodeKind::Intersect {
            graph,
            first,
            second,
        } => {
            let graph = graph_spec(id, graph, ctx)?;
            let a = segment(id, child(first, ctx)?)?;
            let b = segment(id, child(second, ctx)?)?;
            let p = line_intersection(a, b)
                .ok_or_else(|| GeoError::expression(id, "lines are parallel or degenerate"))?;
            Ok(shape(graph, Geometry::Point(p)))
        }
        NodeKind::Plot {
            graph,
            func,
            domain,
        } => {
            let graph = graph_spec(id, graph, ctx)?;
            let f = curve_formula(id, func, "x", ctx)?;
            let domain = optional_range(id, domain.as_deref_mut(), ctx)?.unwrap_or(graph.x_range);
            Ok(Value::Plot(PlotValue {
                graph: graph.name,
                curve: Curve::Explicit(f),
                domain,
            }))
        }
        NodeKind::ParaPlot {
            graph,
            x,
            y,
            domain,
        } => {
            let graph = graph_spec(id, graph, ctx)?;
            let fx = curve_formula(id, x, "t", ctx)?;
            let fy = curve_formula(id, y, "t", ctx)?;
            let domain = optional_range(id, domain.as_deref_mut(), ctx)?
                .unwrap_or(DEFAULT_PARAMETRIC_DOMAIN);
            Ok(Value::Plot(PlotValue {
                graph: graph.name,
                curve: Curve::Parametric { x: fx, y: fy },
                domain,
            }))
        }
        NodeKind::Def { params, body } => {
            // Syntax is checked now; the body compiles wherever it is used.
            ctx.compiler()
                .free_variables(body, params)
                .map_err(|e| GeoError::expression(id, format!("def body '{body}': {e}")))?;
            Ok(Value::Function(FunctionDef {
                params: params.clone(),
                body: body.clone(),
            }))
        }
        NodeKind::Call { name, args } => {
            let def = match ctx.read_reference(name) {
                Some(Value::Function(def)) => def,
                Some(other) => {
                    return Err(GeoError::expression(
                        id,
                        format!("'{name}' is a {}, not a function", other.kind_name()),
                    ));
                }
                None => {
                    return Err(GeoError::expression(
                        id,
                        format!("function '{name}' is not defined"),
                    ));
                }
            };
            if args.len() != def.params.len() {
                return Err(GeoError::expression(
                    id,
                    format!(
                        "{name}() expects {} argument(s), got {}",
                        def.params.len(),
                        args.len()
                    ),
                ));
            }
            let mut xs = Vec::with_capacity(args.len());
            for a in args.iter_mut() {
                xs.push(number(id, "function argument", child(a, ctx)?)?);
            }
            let f = compile(id, ctx, &def.body, &def.params)?;
            let y = f.eval(&xs);
            if y.is_finite() {
                Ok(Value::Number(y))
            } else {
                tracing::warn!(node = %id, function = %name, "non-finite call result, using 0");
                Ok(Value::Number(0.0))
            }
        }
        NodeKind::Seq { items } => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter_mut() {
                out.push(child(item, ctx)?);
            }
            Ok(Value::Sequence(out))
        }
        NodeKind::FromTo { variable, from, to } => {
            match ctx.get_reference(variable) {
                Some(Value::Number(_)) => {}
                Some(other) => {
                    return Err(GeoError::expression(
                        id,
                        format!(
                            "fromTo() animates numbers, but '{variable}' is a {}",
                            other.kind_name()
                        ),
                    ));
                }
                None => {
                    return Err(GeoError::expression(
                        id,
                        format!("variable '{variable}' is not defined"),
                    ));
                }
            }
            // Endpoints are read without making the animation a dependent of anything.
            let (from, to) = ctx.without_caller(|c| -> GeoResult<(f64, f64)> {
                Ok((
                    number(id, "fromTo start", child(from, c)?)?,
                    number(id, "fromTo end", child(to, c)?)?,
                ))
            })?;
            Ok(Value::Animation(AnimationSpec {
                kind: AnimationKind::FromTo,
                variable: variable.clone(),
                from: Box::new(Value::Number(from)),
                to: Box::new(Value::Number(to)),
            }))
        }
        NodeKind::Change { variable, target } => {
            let current = ctx.get_reference(variable).cloned().ok_or_else(|| {
                GeoError::expression(id, format!("variable '{variable}' is not defined"))
            })?;
            let target = ctx.without_caller(|c| child(target, c))?;
            if current.interpolate(&target, 0.0).is_none() {
                return Err(GeoError::expression(
                    id,
                    format!(
                        "cannot change '{variable}' from a {} into a {}",
                        current.kind_name(),
                        target.kind_name()
                    ),
                ));
            }
            Ok(Value::Animation(AnimationSpec {
                kind: AnimationKind::Change,
                variable: variable.clone(),
                from: Box::new(current),
                to: Box::new(target),
            }))
        }
    }
}

fn child(node: &mut ExprNode, ctx: &mut ExpressionContext) -> GeoResult<Value> {
    node.resolve(ctx)?;
    Ok(node.value()?.clone())
}

fn shape(graph: GraphSpec, geometry: Geometry) -> Value {
    Value::Shape(ShapeValue {
        graph: graph.name,
        geometry,
    })
}

fn number(id: NodeId, what: &str, v: Value) -> GeoResult<f64> {
    v.as_number().ok_or_else(|| {
        GeoError::expression(
            id,
            format!("{what} must be a number, got {}", v.kind_name()),
        )
    })
}

fn segment(id: NodeId, v: Value) -> GeoResult<Line> {
    match v {
        Value::Shape(ShapeValue {
            geometry: Geometry::Segment(l),
            ..
        }) => Ok(l),
        other => Err(GeoError::expression(
            id,
            format!("expected a line, got {}", other.kind_name()),
        )),
    }
}

fn graph_spec(
    id: NodeId,
    node: &mut ExprNode,
    ctx: &mut ExpressionContext,
) -> GeoResult<GraphSpec> {
    match child(node, ctx)? {
        Value::Graph(g) => Ok(g),
        other => Err(GeoError::expression(
            id,
            format!("expected a graph container, got {}", other.kind_name()),
        )),
    }
}

fn optional_range(
    id: NodeId,
    node: Option<&mut ExprNode>,
    ctx: &mut ExpressionContext,
) -> GeoResult<Option<(f64, f64)>> {
    let Some(node) = node else {
        return Ok(None);
    };
    match child(node, ctx)? {
        Value::Range { lo, hi } => Ok(Some((lo, hi))),
        other => Err(GeoError::expression(
            id,
            format!("expected a range, got {}", other.kind_name()),
        )),
    }
}

/// Resolve `args` and flatten numbers and points into one coordinate list.
///
/// `allowed` lists the accepted coordinate counts; empty accepts any.
fn coords(
    id: NodeId,
    what: &str,
    args: &mut [ExprNode],
    ctx: &mut ExpressionContext,
    allowed: &[usize],
) -> GeoResult<Vec<f64>> {
    let mut out = Vec::with_capacity(args.len() * 2);
    for a in args.iter_mut() {
        let v = child(a, ctx)?;
        if let Some(n) = v.as_number() {
            out.push(n);
        } else if let Some(p) = v.as_point() {
            out.extend([p.x, p.y]);
        } else {
            return Err(GeoError::expression(
                id,
                format!(
                    "{what}() arguments must be numbers or points, got {}",
                    v.kind_name()
                ),
            ));
        }
    }
    if !allowed.is_empty() && !allowed.contains(&out.len()) {
        let expected = allowed
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(GeoError::expression(
            id,
            format!(
                "{what}() expects {expected} coordinates, got {}",
                out.len()
            ),
        ));
    }
    Ok(out)
}

fn binary(id: NodeId, op: BinOp, a: &Value, b: &Value) -> GeoResult<Value> {
    let point_of = |v: &Value| match v {
        Value::Shape(ShapeValue {
            graph,
            geometry: Geometry::Point(p),
        }) => Some((graph.clone(), *p)),
        _ => None,
    };
    let out = match (op, a, b) {
        (BinOp::Div, Value::Number(_), Value::Number(y)) if *y == 0.0 => None,
        (_, Value::Number(x), Value::Number(y)) => Some(Value::Number(match op {
            BinOp::Add => x + y,
            BinOp::Sub => x - y,
            BinOp::Mul => x * y,
            BinOp::Div => x / y,
        })),
        (BinOp::Add | BinOp::Sub, _, _) => match (point_of(a), point_of(b)) {
            (Some((g, p)), Some((_, q))) => {
                let r = if op == BinOp::Add {
                    p + q.to_vec2()
                } else {
                    p - q.to_vec2()
                };
                Some(Value::Shape(ShapeValue {
                    graph: g,
                    geometry: Geometry::Point(r),
                }))
            }
            _ => None,
        },
        (BinOp::Mul, Value::Number(k), _) | (BinOp::Mul, _, Value::Number(k)) => {
            point_of(a).or_else(|| point_of(b)).map(|(g, p)| {
                Value::Shape(ShapeValue {
                    graph: g,
                    geometry: Geometry::Point((p.to_vec2() * *k).to_point()),
                })
            })
        }
        (BinOp::Div, _, Value::Number(k)) if *k != 0.0 => point_of(a).map(|(g, p)| {
            Value::Shape(ShapeValue {
                graph: g,
                geometry: Geometry::Point((p.to_vec2() / *k).to_point()),
            })
        }),
        _ => None,
    };
    out.ok_or_else(|| {
        let sym = match op {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        };
        if op == BinOp::Div && b.as_number() == Some(0.0) {
            GeoError::expression(id, "division by zero")
        } else {
            GeoError::expression(
                id,
                format!(
                    "cannot apply '{sym}' to {} and {}",
                    a.kind_name(),
                    b.kind_name()
                ),
            )
        }
    })
}

/// Formula for a plot axis: a one-parameter function value, or a formula text in `param`.
fn curve_formula(
    id: NodeId,
    node: &mut ExprNode,
    param: &str,
    ctx: &mut ExpressionContext,
) -> GeoResult<Formula> {
    match child(node, ctx)? {
        Value::Function(def) if def.params.len() == 1 => compile(id, ctx, &def.body, &def.params),
        Value::Function(def) => Err(GeoError::expression(
            id,
            format!(
                "plotted functions take one parameter, got {}",
                def.params.len()
            ),
        )),
        Value::Text(src) => compile(id, ctx, &src, &[param.to_owned()]),
        other => Err(GeoError::expression(
            id,
            format!("expected a function or formula, got {}", other.kind_name()),
        )),
    }
}

/// Compile against a snapshot of the store taken now, registering the formula's bound free
/// variables as dependencies of the current caller.
fn compile(
    id: NodeId,
    ctx: &mut ExpressionContext,
    source: &str,
    params: &[String],
) -> GeoResult<Formula> {
    let err = |e: crate::formula::FormulaError| {
        GeoError::expression(id, format!("formula '{source}': {e}"))
    };
    let free = ctx.compiler().free_variables(source, params).map_err(err)?;
    ctx.register_dependencies(&free);
    let scope = ctx.references_as_primitives();
    ctx.compiler().compile(source, params, &scope).map_err(err)
}
