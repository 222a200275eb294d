use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::autoscroll::{AutoscrollDriver, DriverPhase, FrameOutcome};
use super::layout::{LayoutMeasurer, LayoutMode};
use super::navigator::{self, AnimationStep, CenteringNavigator};
use super::shell::{PageShell, ScrollLock};
use super::CarouselState;
use crate::config::Configuration;
use crate::events::{Direction, Interaction, Key};
use crate::projects::{DisplayList, Project};

/// Tunables for one mounted carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselOptions {
    pub step_px: f64,
    pub settle_delay: Duration,
    pub center_duration: Duration,
    pub step_duration: Duration,
    pub contact_scroll_delay: Duration,
    pub mobile_breakpoint: f64,
}

impl CarouselOptions {
    pub fn from_config(cfg: &Configuration) -> Self {
        Self {
            step_px: cfg.carousel.autoscroll_step_px,
            settle_delay: cfg.carousel.settle_delay,
            center_duration: cfg.carousel.center_duration,
            step_duration: cfg.carousel.step_duration,
            contact_scroll_delay: cfg.carousel.contact_scroll_delay,
            mobile_breakpoint: cfg.viewport.mobile_breakpoint,
        }
    }
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self::from_config(&Configuration::default())
    }
}

/// What happened during one [`Carousel::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub scroll: FrameOutcome,
    pub animation: Option<AnimationStep>,
}

/// One mounted carousel: display list, layout surface and the input state machine.
pub struct Carousel<M> {
    items: DisplayList,
    layout: M,
    state: CarouselState,
    driver: AutoscrollDriver,
    navigator: CenteringNavigator,
    shell: Arc<dyn PageShell>,
    options: CarouselOptions,
    mode: LayoutMode,
    scroll_lock: Option<ScrollLock>,
    open_on_arrival: Option<usize>,
    contact_scroll_at: Option<Instant>,
}

impl<M: LayoutMeasurer> Carousel<M> {
    /// Mounts the carousel and schedules the initial seed after the settle delay.
    pub fn mount(
        items: DisplayList,
        layout: M,
        shell: Arc<dyn PageShell>,
        options: CarouselOptions,
        now: Instant,
    ) -> Self {
        let mode = LayoutMode::for_viewport(layout.container_width(), options.mobile_breakpoint);
        let mut driver = AutoscrollDriver::new(options.step_px);
        driver.arm(now, options.settle_delay);
        info!(
            projects = items.canonical_len(),
            displayed = items.len(),
            ?mode,
            "carousel mounted"
        );
        Self {
            items,
            layout,
            state: CarouselState::default(),
            driver,
            navigator: CenteringNavigator::new(),
            shell,
            options,
            mode,
            scroll_lock: None,
            open_on_arrival: None,
            contact_scroll_at: None,
        }
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn layout(&self) -> &M {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut M {
        &mut self.layout
    }

    pub fn items(&self) -> &DisplayList {
        &self.items
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn driver_phase(&self) -> DriverPhase {
        self.driver.phase()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.state.selection.and_then(|i| self.items.get(i))
    }

    /// One-based position of the selected project within its copy, and the copy size.
    pub fn selection_position(&self) -> Option<(usize, usize)> {
        let canonical = self.items.canonical_index(self.state.selection?)?;
        Some((canonical + 1, self.items.canonical_len()))
    }

    pub fn compute_center_offset(&self, index: usize) -> f64 {
        navigator::compute_center_offset(&self.layout, index)
    }

    pub fn animate_scroll_to(&mut self, target: f64, duration: Duration, now: Instant) {
        self.navigator
            .animate_scroll_to(&mut self.state, &self.layout, target, duration, now);
    }

    /// One display frame: autoscroll first, then the eased animation, then due timers.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let scroll = self.driver.tick(&mut self.state, &mut self.layout, now);
        let animation = self.navigator.step(&mut self.state, &mut self.layout, now);
        if let Some(AnimationStep::Completed { .. }) = animation {
            if let Some(index) = self.open_on_arrival.take() {
                self.open_overlay(index);
            }
        }
        if self.contact_scroll_at.is_some_and(|at| now >= at) {
            self.contact_scroll_at = None;
            self.shell.scroll_to_contact();
        }
        TickReport { scroll, animation }
    }

    pub fn handle(&mut self, interaction: Interaction, now: Instant) {
        debug!(?interaction, "carousel input");
        match interaction {
            Interaction::PointerEnter | Interaction::TouchStart => self.state.paused = true,
            Interaction::PointerLeave => {
                if !self.state.overlay_open() {
                    self.state.paused = false;
                }
            }
            Interaction::Scrolled { offset } => self.scrolled(offset),
            Interaction::Click { index } => self.click(index, now),
            Interaction::Key { key } => self.key(key, now),
            Interaction::Navigate { direction } => self.step_carousel(direction, now),
            Interaction::OverlayNavigate { direction } => self.step_selection(direction),
            Interaction::Close => self.close_overlay(),
            Interaction::Inquire => self.inquire(now),
            Interaction::Resized { width } => self.resize(width),
        }
    }

    fn key(&mut self, key: Key, now: Instant) {
        match (key, self.state.overlay_open()) {
            (Key::ArrowLeft, true) => self.step_selection(Direction::Prev),
            (Key::ArrowRight, true) => self.step_selection(Direction::Next),
            (Key::Escape, true) => self.close_overlay(),
            (Key::ArrowLeft, false) => self.step_carousel(Direction::Prev, now),
            (Key::ArrowRight, false) => self.step_carousel(Direction::Next, now),
            (Key::Escape, false) => {}
        }
    }

    fn click(&mut self, index: usize, now: Instant) {
        if self.state.overlay_open() {
            return;
        }
        if index >= self.items.len() {
            debug!(index, "click outside display list ignored");
            return;
        }
        self.state.paused = true;
        let target = self.compute_center_offset(index);
        self.animate_scroll_to(target, self.options.center_duration, now);
        self.open_on_arrival = Some(index);
    }

    /// Moves the strip one card left or right of whatever is centered now.
    fn step_carousel(&mut self, direction: Direction, now: Instant) {
        self.state.paused = true;
        let Some(current) = navigator::nearest_centered_index(&self.layout) else {
            debug!("no measurable card to step from");
            return;
        };
        let target = clamp_step(current, direction, self.items.last_index());
        let offset = self.compute_center_offset(target);
        self.animate_scroll_to(offset, self.options.step_duration, now);
        self.open_on_arrival = None;
    }

    fn step_selection(&mut self, direction: Direction) {
        let Some(current) = self.state.selection else {
            return;
        };
        self.state.selection = Some(clamp_step(current, direction, self.items.last_index()));
    }

    fn open_overlay(&mut self, index: usize) {
        self.state.selection = Some(index);
        if self.scroll_lock.is_none() {
            self.scroll_lock = Some(ScrollLock::acquire(self.shell.clone()));
        }
        if let Some((n, total)) = self.selection_position() {
            debug!(index, "overlay opened on project {n} of {total}");
        }
    }

    fn close_overlay(&mut self) {
        if self.state.selection.take().is_none() {
            return;
        }
        self.scroll_lock = None;
        self.state.paused = false;
        debug!("overlay closed");
    }

    fn inquire(&mut self, now: Instant) {
        let Some(project) = self.selected_project() else {
            return;
        };
        let title = project.title.clone();
        self.shell.inquire(&title);
        self.close_overlay();
        self.contact_scroll_at = Some(now + self.options.contact_scroll_delay);
    }

    fn scrolled(&mut self, offset: f64) {
        if self.state.navigating {
            return;
        }
        self.layout.set_scroll_offset(offset);
        self.state.scroll_position = self.layout.scroll_offset();
    }

    fn resize(&mut self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            debug!(width, "ignoring invalid viewport width");
            return;
        }
        let mode = LayoutMode::for_viewport(width, self.options.mobile_breakpoint);
        if mode != self.mode {
            info!(?mode, width, "layout mode changed");
        }
        self.mode = mode;
        self.layout.relayout(width, mode);
    }

    /// Tears the carousel down, releasing the page scroll lock if the overlay was open.
    pub fn unmount(self) {
        info!(overlay_open = self.state.overlay_open(), "carousel unmounted");
    }
}

fn clamp_step(current: usize, direction: Direction, last: usize) -> usize {
    current
        .saturating_add_signed(direction.step())
        .min(last)
}
