use crate::foundation::error::{GeoError, GeoResult};

/// Style bag captured by a command when it is built.
///
/// Every field is optional; `None` means "use whatever the layer below says". Unknown keys are
/// ignored when deserializing, so hosts can pass their whole settings object.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
    pub radius: Option<f64>,
    /// Sample count for plots.
    pub samples: Option<u32>,
    pub fill: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
    /// Animation duration override in seconds.
    pub duration: Option<f64>,
}

/// Default style family for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Graph,
    Point,
    Line,
    Circle,
    Polygon,
    Plot,
    Other,
}

impl StyleOptions {
    pub fn from_json(s: &str) -> GeoResult<Self> {
        serde_json::from_str(s).map_err(|e| GeoError::serde(e.to_string()))
    }

    /// Built-in defaults for `kind`.
    pub fn defaults_for(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Line | StyleKind::Circle => Self {
                color: Some("black".to_owned()),
                stroke_width: Some(2.0),
                ..Self::default()
            },
            StyleKind::Point => Self {
                color: Some("red".to_owned()),
                radius: Some(4.0),
                ..Self::default()
            },
            StyleKind::Plot => Self {
                color: Some("blue".to_owned()),
                stroke_width: Some(2.0),
                ..Self::default()
            },
            StyleKind::Polygon => Self {
                color: Some("black".to_owned()),
                stroke_width: Some(2.0),
                fill_opacity: Some(0.2),
                ..Self::default()
            },
            StyleKind::Graph | StyleKind::Other => Self::default(),
        }
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            color: other.color.clone().or_else(|| self.color.clone()),
            stroke_width: other.stroke_width.or(self.stroke_width),
            radius: other.radius.or(self.radius),
            samples: other.samples.or(self.samples),
            fill: other.fill.clone().or_else(|| self.fill.clone()),
            fill_opacity: other.fill_opacity.or(self.fill_opacity),
            stroke_opacity: other.stroke_opacity.or(self.stroke_opacity),
            duration: other.duration.or(self.duration),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/style.rs"]
mod tests;
