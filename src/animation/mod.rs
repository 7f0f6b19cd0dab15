//! Animation module for the scatter/tree morph
//!
//! Holds the two-state transition toggle and the exponential smoothing
//! filter each field uses to chase it, plus the cubic ease applied on top.

mod easing;
mod transition;

pub use easing::{ease_in_out_cubic, lerp};
pub use transition::{SmoothedProgress, TransitionController, TransitionState};
