//! Per-frame autoscroll with seamless wraparound.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::CarouselState;
use super::layout::LayoutMeasurer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Waiting for the settle delay and a measurable container.
    Idle,
    Running,
    /// An eased animation owns the scroll offset.
    Navigating,
}

/// What the driver did on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Not seeded yet, or the layout had no usable width.
    Skipped,
    /// Scroll position was placed at the start of the middle copy.
    Seeded { offset: f64 },
    /// Autoscroll moved the strip.
    Advanced { offset: f64 },
    /// Paused, overlay open or navigating: position was read back from the container.
    Synced { offset: f64 },
}

/// Keeps `position` inside the band the middle copy can be reached from.
///
/// Crossing `2 * one_set` snaps back one copy, dropping to or below zero snaps
/// forward one copy.
pub fn wrap_position(position: f64, one_set: f64) -> f64 {
    if position >= 2.0 * one_set {
        position - one_set
    } else if position <= 0.0 {
        position + one_set
    } else {
        position
    }
}

/// Width of one copy of the display list, or `None` if the layout is not usable yet.
pub fn one_set_width<M: LayoutMeasurer + ?Sized>(layout: &M) -> Option<f64> {
    let one_set = layout.scroll_width() / 3.0;
    (one_set.is_finite() && one_set > 0.0).then_some(one_set)
}

#[derive(Debug)]
pub struct AutoscrollDriver {
    phase: DriverPhase,
    step_px: f64,
    seed_at: Option<Instant>,
}

impl AutoscrollDriver {
    pub fn new(step_px: f64) -> Self {
        Self {
            phase: DriverPhase::Idle,
            step_px,
            seed_at: None,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn step_px(&self) -> f64 {
        self.step_px
    }

    /// Schedules the one-shot seed `settle_delay` after `now` and returns to idle.
    pub fn arm(&mut self, now: Instant, settle_delay: Duration) {
        self.phase = DriverPhase::Idle;
        self.seed_at = Some(now + settle_delay);
    }

    pub fn tick<M: LayoutMeasurer + ?Sized>(
        &mut self,
        state: &mut CarouselState,
        layout: &mut M,
        now: Instant,
    ) -> FrameOutcome {
        if self.phase == DriverPhase::Idle {
            return self.try_seed(state, layout, now);
        }

        if state.navigating {
            self.phase = DriverPhase::Navigating;
            state.scroll_position = layout.scroll_offset();
            return FrameOutcome::Synced {
                offset: state.scroll_position,
            };
        }
        self.phase = DriverPhase::Running;

        let Some(one_set) = one_set_width(layout) else {
            return FrameOutcome::Skipped;
        };
        state.scroll_position = wrap_position(state.scroll_position, one_set);

        if state.autoscroll_allowed() {
            state.scroll_position += self.step_px;
            layout.set_scroll_offset(state.scroll_position);
            FrameOutcome::Advanced {
                offset: state.scroll_position,
            }
        } else {
            state.scroll_position = layout.scroll_offset();
            FrameOutcome::Synced {
                offset: state.scroll_position,
            }
        }
    }

    fn try_seed<M: LayoutMeasurer + ?Sized>(
        &mut self,
        state: &mut CarouselState,
        layout: &mut M,
        now: Instant,
    ) -> FrameOutcome {
        let Some(seed_at) = self.seed_at else {
            return FrameOutcome::Skipped;
        };
        if now < seed_at {
            return FrameOutcome::Skipped;
        }
        let Some(one_set) = one_set_width(layout) else {
            debug!("layout not measurable yet; retrying seed next frame");
            return FrameOutcome::Skipped;
        };
        self.seed_at = None;
        if state.navigating {
            // The animation owns the offset; it lands wherever the strip resumes from.
            self.phase = DriverPhase::Navigating;
            state.scroll_position = layout.scroll_offset();
            debug!("seed skipped; animation already in flight");
            return FrameOutcome::Synced {
                offset: state.scroll_position,
            };
        }
        state.scroll_position = one_set;
        layout.set_scroll_offset(one_set);
        self.phase = DriverPhase::Running;
        info!(offset = one_set, "autoscroll seeded at middle copy");
        FrameOutcome::Seeded { offset: one_set }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::layout::{LayoutMode, StripLayout};

    #[test]
    fn wrap_keeps_position_in_band() {
        let one_set = 1000.0;
        assert_eq!(wrap_position(2000.0, one_set), 1000.0);
        assert_eq!(wrap_position(2500.0, one_set), 1500.0);
        assert_eq!(wrap_position(0.0, one_set), 1000.0);
        assert_eq!(wrap_position(-3.0, one_set), 997.0);
        assert_eq!(wrap_position(1500.0, one_set), 1500.0);
    }

    #[test]
    fn zero_width_layout_is_not_usable() {
        let strip = StripLayout::new(9, 0.0, LayoutMode::Desktop);
        assert_eq!(one_set_width(&strip), None);
    }

    #[test]
    fn seeds_only_after_settle_delay() {
        let t0 = Instant::now();
        let mut strip = StripLayout::new(27, 1440.0, LayoutMode::Desktop);
        let mut state = CarouselState::default();
        let mut driver = AutoscrollDriver::new(1.0);
        driver.arm(t0, Duration::from_millis(100));

        assert_eq!(
            driver.tick(&mut state, &mut strip, t0 + Duration::from_millis(50)),
            FrameOutcome::Skipped
        );
        assert_eq!(driver.phase(), DriverPhase::Idle);

        let seeded = driver.tick(&mut state, &mut strip, t0 + Duration::from_millis(100));
        let one_set = strip.scroll_width() / 3.0;
        assert_eq!(seeded, FrameOutcome::Seeded { offset: one_set });
        assert_eq!(state.scroll_position, one_set);
        assert_eq!(strip.scroll_offset(), one_set);
        assert_eq!(driver.phase(), DriverPhase::Running);
    }

    #[test]
    fn unmeasured_layout_retries_seed() {
        let t0 = Instant::now();
        let mut strip = StripLayout::new(27, 0.0, LayoutMode::Desktop);
        let mut state = CarouselState::default();
        let mut driver = AutoscrollDriver::new(1.0);
        driver.arm(t0, Duration::ZERO);

        assert_eq!(driver.tick(&mut state, &mut strip, t0), FrameOutcome::Skipped);
        assert!(!state.scroll_position.is_nan());

        strip.relayout(1440.0, LayoutMode::Desktop);
        assert!(matches!(
            driver.tick(&mut state, &mut strip, t0),
            FrameOutcome::Seeded { .. }
        ));
    }

    #[test]
    fn advances_one_step_per_frame() {
        let t0 = Instant::now();
        let mut strip = StripLayout::new(27, 1440.0, LayoutMode::Desktop);
        let mut state = CarouselState::default();
        let mut driver = AutoscrollDriver::new(1.0);
        driver.arm(t0, Duration::ZERO);
        driver.tick(&mut state, &mut strip, t0);
        let start = state.scroll_position;
        for _ in 0..10 {
            driver.tick(&mut state, &mut strip, t0);
        }
        assert_eq!(state.scroll_position, start + 10.0);
        assert_eq!(strip.scroll_offset(), start + 10.0);
    }

    #[test]
    fn navigating_frames_only_read() {
        let t0 = Instant::now();
        let mut strip = StripLayout::new(27, 1440.0, LayoutMode::Desktop);
        let mut state = CarouselState::default();
        let mut driver = AutoscrollDriver::new(1.0);
        driver.arm(t0, Duration::ZERO);
        driver.tick(&mut state, &mut strip, t0);

        state.navigating = true;
        strip.set_scroll_offset(5000.0);
        assert_eq!(
            driver.tick(&mut state, &mut strip, t0),
            FrameOutcome::Synced { offset: 5000.0 }
        );
        assert_eq!(driver.phase(), DriverPhase::Navigating);
        assert_eq!(strip.scroll_offset(), 5000.0);
    }

    #[test]
    fn seed_never_writes_while_navigating() {
        let t0 = Instant::now();
        let mut strip = StripLayout::new(27, 1440.0, LayoutMode::Desktop);
        strip.set_scroll_offset(700.0);
        let mut state = CarouselState {
            navigating: true,
            ..CarouselState::default()
        };
        let mut driver = AutoscrollDriver::new(1.0);
        driver.arm(t0, Duration::ZERO);

        assert_eq!(
            driver.tick(&mut state, &mut strip, t0),
            FrameOutcome::Synced { offset: 700.0 }
        );
        assert_eq!(strip.scroll_offset(), 700.0);
        assert_eq!(driver.phase(), DriverPhase::Navigating);

        // The seed is consumed: once the animation ends autoscroll resumes in place.
        state.navigating = false;
        assert_eq!(
            driver.tick(&mut state, &mut strip, t0),
            FrameOutcome::Advanced { offset: 701.0 }
        );
    }
}
