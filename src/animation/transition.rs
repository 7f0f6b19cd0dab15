//! Scatter/tree transition state
//!
//! The user only ever flips between two discrete states. Visual continuity
//! comes from each field running its own [`SmoothedProgress`] towards the
//! target of the current state, at its own rate.

use super::easing::{ease_in_out_cubic, lerp};

/// Which formation the scene is heading towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// Dispersed cloud (initial state)
    #[default]
    Scattered,
    /// Assembled tree
    TreeShape,
}

impl TransitionState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Scattered => Self::TreeShape,
            Self::TreeShape => Self::Scattered,
        }
    }

    /// Progress value the smoothing filters converge to
    pub fn target(self) -> f32 {
        match self {
            Self::Scattered => 0.0,
            Self::TreeShape => 1.0,
        }
    }

    /// Label for the toggle button, naming the action it will perform
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Scattered => "ASSEMBLE TREE",
            Self::TreeShape => "RELEASE FORM",
        }
    }
}

/// The single user-facing toggle.
///
/// There are no guards and no intermediate states: every toggle flips.
#[derive(Debug, Clone, Default)]
pub struct TransitionController {
    state: TransitionState,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Flip the state and return the new one
    pub fn toggle(&mut self) -> TransitionState {
        self.state = self.state.toggled();
        self.state
    }

    pub fn button_label(&self) -> &'static str {
        self.state.button_label()
    }
}

/// Exponentially smoothed progress in [0, 1].
///
/// Each update moves a fixed fraction `rate` of the remaining distance
/// towards the target, so the step is per frame rather than per second.
/// Once a step no longer changes the value in `f32` the value lands exactly
/// on the target; until then every frame is a strict partial move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedProgress {
    value: f32,
    rate: f32,
}

impl SmoothedProgress {
    /// Start fully scattered
    pub fn new(rate: f32) -> Self {
        Self {
            value: 0.0,
            rate: rate.clamp(0.0, 1.0),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Eased interpolation factor used for the actual position mix
    pub fn eased(&self) -> f32 {
        ease_in_out_cubic(self.value)
    }

    /// Advance one frame towards the target of `state` and return the new value
    pub fn update(&mut self, state: TransitionState) -> f32 {
        let target = state.target();
        let next = lerp(self.value, target, self.rate);
        self.value = if next == self.value { target } else { next };
        self.value
    }

    /// Jump straight to the resting value of `state`
    pub fn settle(&mut self, state: TransitionState) {
        self.value = state.target();
    }

    pub fn is_settled(&self, state: TransitionState) -> bool {
        self.value == state.target()
    }
}
