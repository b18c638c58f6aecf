use std::collections::BTreeMap;

use kurbo::{Line, Point};
use smallvec::SmallVec;

use crate::animation::lerp::Lerp;
use crate::formula::Formula;

/// A plain value visible to formulas.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Number(f64),
    Text(String),
}

/// Immutable `{name: primitive}` snapshot captured for formula compilation.
pub type Scope = BTreeMap<String, Primitive>;

/// Numeric payload of a node, as returned by `atomic_values`.
pub type AtomicValues = SmallVec<[f64; 4]>;

/// Geometry carried by shape values.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    Segment(Line),
    Circle { center: Point, radius: f64 },
    Polygon(Vec<Point>),
    /// Sampled curve; disjoint runs where samples were dropped.
    Polyline(Vec<Vec<Point>>),
}

impl Geometry {
    /// Short name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Segment(_) => "line",
            Self::Circle { .. } => "circle",
            Self::Polygon(_) => "polygon",
            Self::Polyline(_) => "polyline",
        }
    }

    pub fn atomic_values(&self) -> AtomicValues {
        let mut out = AtomicValues::new();
        match self {
            Self::Point(p) => out.extend([p.x, p.y]),
            Self::Segment(l) => out.extend([l.p0.x, l.p0.y, l.p1.x, l.p1.y]),
            Self::Circle { center, radius } => out.extend([center.x, center.y, *radius]),
            Self::Polygon(pts) => pts.iter().for_each(|p| out.extend([p.x, p.y])),
            Self::Polyline(runs) => runs.iter().flatten().for_each(|p| out.extend([p.x, p.y])),
        }
        out
    }

    /// Coordinate-wise interpolation between two geometries of the same shape.
    pub fn interpolate(&self, to: &Self, t: f64) -> Option<Self> {
        Some(match (self, to) {
            (Self::Point(a), Self::Point(b)) => Self::Point(Lerp::lerp(a, b, t)),
            (Self::Segment(a), Self::Segment(b)) => Self::Segment(Line::new(
                Lerp::lerp(&a.p0, &b.p0, t),
                Lerp::lerp(&a.p1, &b.p1, t),
            )),
            (
                Self::Circle {
                    center: c0,
                    radius: r0,
                },
                Self::Circle {
                    center: c1,
                    radius: r1,
                },
            ) => Self::Circle {
                center: Lerp::lerp(c0, c1, t),
                radius: Lerp::lerp(r0, r1, t),
            },
            (Self::Polygon(a), Self::Polygon(b)) if a.len() == b.len() => {
                Self::Polygon(Lerp::lerp(a, b, t))
            }
            _ => return None,
        })
    }
}

/// A 2-D graph container.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSpec {
    /// Variable the container is bound to; shapes find their container by this name.
    pub name: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// A shape drawn inside a named graph container.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeValue {
    pub graph: String,
    pub geometry: Geometry,
}

/// The function (or pair of functions) a plot samples.
#[derive(Clone, Debug)]
pub enum Curve {
    /// `y = f(x)`.
    Explicit(Formula),
    /// `(x(t), y(t))`.
    Parametric { x: Formula, y: Formula },
}

/// A late-bound plot: formulas are already compiled against the scope of the last resolution.
#[derive(Clone, Debug)]
pub struct PlotValue {
    pub graph: String,
    pub curve: Curve,
    pub domain: (f64, f64),
}

/// A user function `def(params, body)`. The body stays uncompiled until a call or plot resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub params: Vec<String>,
    pub body: String,
}

/// Which animation command an [`AnimationSpec`] turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// Numeric `fromTo(var, from, to)`.
    FromTo,
    /// `change(var, target)`: animates the variable's current value towards the target.
    Change,
}

#[derive(Clone, Debug)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub variable: String,
    pub from: Box<Value>,
    pub to: Box<Value>,
}

/// Resolved result of a node.
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Text(String),
    Range { lo: f64, hi: f64 },
    Graph(GraphSpec),
    Shape(ShapeValue),
    Plot(PlotValue),
    Function(FunctionDef),
    Sequence(Vec<Value>),
    Animation(AnimationSpec),
}

impl Value {
    /// Short name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Range { .. } => "range",
            Self::Graph(_) => "graph",
            Self::Shape(s) => s.geometry.kind_name(),
            Self::Plot(_) => "plot",
            Self::Function(_) => "function",
            Self::Sequence(_) => "sequence",
            Self::Animation(_) => "animation",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Shape(ShapeValue {
                geometry: Geometry::Point(p),
                ..
            }) => Some(*p),
            _ => None,
        }
    }

    /// The primitive form used in formula scopes, if this value has one.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Number(v) => Some(Primitive::Number(*v)),
            Self::Text(s) => Some(Primitive::Text(s.clone())),
            _ => None,
        }
    }

    /// Flat numeric payload. Containers, plots and definitions are empty.
    pub fn atomic_values(&self) -> AtomicValues {
        match self {
            Self::Number(v) => SmallVec::from_slice(&[*v]),
            Self::Range { lo, hi } => SmallVec::from_slice(&[*lo, *hi]),
            Self::Shape(s) => s.geometry.atomic_values(),
            Self::Sequence(items) => items.iter().flat_map(Value::atomic_values).collect(),
            Self::Text(_)
            | Self::Graph(_)
            | Self::Plot(_)
            | Self::Function(_)
            | Self::Animation(_) => AtomicValues::new(),
        }
    }

    /// Interpolate towards `to`. Only numbers and same-shaped shapes in the same graph interpolate.
    pub fn interpolate(&self, to: &Value, t: f64) -> Option<Value> {
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Some(Self::Number(Lerp::lerp(a, b, t))),
            (Self::Shape(a), Self::Shape(b)) if a.graph == b.graph => {
                Some(Self::Shape(ShapeValue {
                    graph: a.graph.clone(),
                    geometry: a.geometry.interpolate(&b.geometry, t)?,
                }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/context/value.rs"]
mod tests;
