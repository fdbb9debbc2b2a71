//! The frame clock: the one piece of mutable state the pipeline reads.

/// Monotonic animation time, advanced once per frame by the host loop.
///
/// Every stage reads [`FrameClock::seconds`] and none of them write it, so
/// evaluation order within a frame has no effect on the result.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    elapsed: f64,
    frame: u64,
    paused: bool,
}

impl FrameClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock already advanced to `seconds` (clamped to be non-negative).
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            elapsed: if seconds.is_finite() { seconds.max(0.0) } else { 0.0 },
            ..Self::default()
        }
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas are ignored,
    /// and nothing advances while paused.
    pub fn tick(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        self.frame += 1;
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Stop time until [`FrameClock::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue after a [`FrameClock::pause`].
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether ticks are currently ignored.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Elapsed time at full precision.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed time as fed to the shading stages.
    pub fn seconds(&self) -> f32 {
        self.elapsed as f32
    }

    /// Number of ticks received while not paused.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
