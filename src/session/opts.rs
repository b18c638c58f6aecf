use crate::animation::ease::Ease;
use crate::foundation::error::{GeoError, GeoResult};

/// Engine-wide playback settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Frame rate of the default [`crate::FixedStepDriver`].
    pub fps: u32,
    /// `fromTo`/`change` duration when the animation sets none.
    pub default_duration_secs: f64,
    /// Entry animation duration of shapes and graphs.
    pub shape_duration_secs: f64,
    /// Easing applied to every animation.
    pub ease: Ease,
    /// Samples per explicit plot.
    pub plot_samples: u32,
    /// Samples per parametric plot.
    pub parametric_samples: u32,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            fps: 60,
            default_duration_secs: 0.8,
            shape_duration_secs: 0.5,
            ease: Ease::InOutQuad,
            plot_samples: 200,
            parametric_samples: 200,
        }
    }
}

impl EngineOpts {
    pub fn from_json(s: &str) -> GeoResult<Self> {
        let opts: Self = serde_json::from_str(s).map_err(|e| GeoError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> GeoResult<()> {
        if self.fps == 0 {
            return Err(GeoError::serde("fps must be > 0"));
        }
        for (name, v) in [
            ("default_duration_secs", self.default_duration_secs),
            ("shape_duration_secs", self.shape_duration_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(GeoError::serde(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if self.plot_samples < 2 || self.parametric_samples < 2 {
            return Err(GeoError::serde("sample counts must be >= 2"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
