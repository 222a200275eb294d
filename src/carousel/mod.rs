//! Seamless looping carousel engine.
//!
//! A [`Carousel`] owns the display list, the layout surface and all scroll
//! bookkeeping. Something outside calls [`Carousel::tick`] once per display
//! frame and feeds user input through [`Carousel::handle`]; nothing else
//! mutates carousel state.

pub mod autoscroll;
mod coordinator;
pub mod layout;
pub mod navigator;
pub mod shell;

pub use autoscroll::{AutoscrollDriver, DriverPhase, FrameOutcome};
pub use coordinator::{Carousel, CarouselOptions, TickReport};
pub use layout::{LayoutMeasurer, LayoutMode, StripLayout};
pub use navigator::{AnimationStep, CenteringNavigator, ScrollAnimation};
pub use shell::{PageShell, ScrollLock, TracingShell, inquiry_message};

/// Scroll bookkeeping shared by the driver, the navigator and the input handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselState {
    /// Sub-pixel scroll position, independent of what the container reports.
    pub scroll_position: f64,
    /// Pointer or touch interaction is suppressing autoscroll.
    pub paused: bool,
    /// An eased animation owns the scroll offset; the driver may only read it.
    pub navigating: bool,
    /// Display index shown in the detail overlay.
    pub selection: Option<usize>,
}

impl CarouselState {
    pub fn overlay_open(&self) -> bool {
        self.selection.is_some()
    }

    pub fn autoscroll_allowed(&self) -> bool {
        !self.paused && self.selection.is_none()
    }
}
