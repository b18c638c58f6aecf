use crate::animation::ease::Ease;

/// One callback issued by a [`TimeDriver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTick {
    /// Intermediate frame at raw (un-eased) progress in `[0, 1]`.
    Update(f64),
    /// The animation reached its end. Issued exactly once, last.
    Complete,
}

impl FrameTick {
    /// Eased progress for this tick; `Complete` is always `1.0`.
    pub fn eased(self, ease: Ease) -> f64 {
        match self {
            Self::Update(p) => ease.apply(p),
            Self::Complete => 1.0,
        }
    }
}

/// External time source for animations.
///
/// `start` returns the full tick schedule for one animation: zero or more `Update`s with
/// monotonically increasing progress followed by exactly one `Complete`. The caller owns the loop
/// that consumes it, so every frame runs synchronously inside the caller's borrow of the engine
/// state.
pub trait TimeDriver: std::fmt::Debug {
    /// Schedule an animation of `duration_secs`.
    fn start(&mut self, duration_secs: f64) -> Box<dyn Iterator<Item = FrameTick>>;
}

/// Deterministic driver stepping at a fixed frame rate.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepDriver {
    fps: u32,
}

impl FixedStepDriver {
    /// Create a driver ticking `fps` times per second (at least 1).
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) }
    }

    /// Number of frames (including the completing one) for `duration_secs`.
    pub fn frame_count(&self, duration_secs: f64) -> u64 {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return 1;
        }
        ((duration_secs * f64::from(self.fps)).ceil() as u64).max(1)
    }
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TimeDriver for FixedStepDriver {
    fn start(&mut self, duration_secs: f64) -> Box<dyn Iterator<Item = FrameTick>> {
        let frames = self.frame_count(duration_secs);
        let updates = (1..frames).map(move |i| FrameTick::Update(i as f64 / frames as f64));
        Box::new(updates.chain(std::iter::once(FrameTick::Complete)))
    }
}

/// Driver that jumps straight to completion; useful for headless evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantDriver;

impl TimeDriver for InstantDriver {
    fn start(&mut self, _duration_secs: f64) -> Box<dyn Iterator<Item = FrameTick>> {
        Box::new(std::iter::once(FrameTick::Complete))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
