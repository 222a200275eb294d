//! Centering math and the eased scroll-to-target animation.

use std::time::{Duration, Instant};

use tracing::debug;

use super::CarouselState;
use super::layout::LayoutMeasurer;

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Scroll offset that puts the center of child `index` at the viewport center.
///
/// Returns 0 when the child does not exist or cannot be measured.
pub fn compute_center_offset<M: LayoutMeasurer + ?Sized>(layout: &M, index: usize) -> f64 {
    let (Some(left), Some(width)) = (layout.offset_of(index), layout.width_of(index)) else {
        return 0.0;
    };
    let item_center = left + layout.scroll_offset() + width / 2.0;
    let target = item_center - layout.container_width() / 2.0;
    if target.is_finite() { target } else { 0.0 }
}

/// Child whose center is closest to the viewport center. Ties go to the lowest index.
pub fn nearest_centered_index<M: LayoutMeasurer + ?Sized>(layout: &M) -> Option<usize> {
    let viewport_center = layout.container_width() / 2.0;
    let mut best: Option<(usize, f64)> = None;
    for index in 0..layout.child_count() {
        let (Some(left), Some(width)) = (layout.offset_of(index), layout.width_of(index)) else {
            continue;
        };
        let distance = (left + width / 2.0 - viewport_center).abs();
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// One eased transition of the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

impl ScrollAnimation {
    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased offset at `now`.
    pub fn value_at(&self, now: Instant) -> f64 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(now))
    }
}

/// Result of advancing the active animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    InFlight { offset: f64, progress: f64 },
    Completed { offset: f64 },
}

/// Owns the programmatic scroll animation and the navigating flag it implies.
#[derive(Debug, Default)]
pub struct CenteringNavigator {
    active: Option<ScrollAnimation>,
}

impl CenteringNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ScrollAnimation> {
        self.active.as_ref()
    }

    /// Starts (or restarts) an eased scroll from the live container offset to `target`.
    pub fn animate_scroll_to<M: LayoutMeasurer + ?Sized>(
        &mut self,
        state: &mut CarouselState,
        layout: &M,
        target: f64,
        duration: Duration,
        now: Instant,
    ) {
        let from = layout.scroll_offset();
        if self.active.is_some() {
            debug!(from, target, "restarting scroll animation");
        }
        self.active = Some(ScrollAnimation {
            from,
            to: target,
            started_at: now,
            duration,
        });
        state.navigating = true;
    }

    /// Advances the active animation. Clears the navigating flag on the frame
    /// where progress reaches 1.
    pub fn step<M: LayoutMeasurer + ?Sized>(
        &mut self,
        state: &mut CarouselState,
        layout: &mut M,
        now: Instant,
    ) -> Option<AnimationStep> {
        let animation = self.active?;
        let progress = animation.progress(now);
        let offset = animation.value_at(now);
        layout.set_scroll_offset(offset);
        state.scroll_position = offset;
        if progress >= 1.0 {
            self.active = None;
            state.navigating = false;
            Some(AnimationStep::Completed { offset })
        } else {
            Some(AnimationStep::InFlight { offset, progress })
        }
    }
}
