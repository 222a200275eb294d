//! Layout measurement for the carousel strip.
//!
//! The carousel never touches a rendering surface directly. Everything it needs
//! to know about geometry, and the one thing it writes (the scroll offset), goes
//! through [`LayoutMeasurer`].

/// Responsive arrangement of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Two staggered rows of narrow cards.
    Mobile,
    /// One row of wide cards.
    Desktop,
}

impl LayoutMode {
    pub fn for_viewport(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }
}

/// Read access to the strip's layout plus control of its scroll offset.
///
/// Offsets returned by [`offset_of`](Self::offset_of) are relative to the
/// container's visible left edge, so they shift as the container scrolls.
pub trait LayoutMeasurer {
    /// Number of rendered children.
    fn child_count(&self) -> usize;
    /// Width of child `index`, or `None` if it cannot be measured.
    fn width_of(&self, index: usize) -> Option<f64>;
    /// Left edge of child `index` relative to the visible container edge.
    fn offset_of(&self, index: usize) -> Option<f64>;
    /// Visible width of the container.
    fn container_width(&self) -> f64;
    /// Total scrollable content width.
    fn scroll_width(&self) -> f64;
    /// Current scroll offset as the container reports it.
    fn scroll_offset(&self) -> f64;
    /// Requests a new scroll offset. The container may clamp it.
    fn set_scroll_offset(&mut self, offset: f64);
    /// Reflows the layout for a new viewport. Must not reset the scroll offset.
    fn relayout(&mut self, _viewport_width: f64, _mode: LayoutMode) {}
}

impl<M: LayoutMeasurer + ?Sized> LayoutMeasurer for Box<M> {
    fn child_count(&self) -> usize {
        (**self).child_count()
    }
    fn width_of(&self, index: usize) -> Option<f64> {
        (**self).width_of(index)
    }
    fn offset_of(&self, index: usize) -> Option<f64> {
        (**self).offset_of(index)
    }
    fn container_width(&self) -> f64 {
        (**self).container_width()
    }
    fn scroll_width(&self) -> f64 {
        (**self).scroll_width()
    }
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }
    fn set_scroll_offset(&mut self, offset: f64) {
        (**self).set_scroll_offset(offset)
    }
    fn relayout(&mut self, viewport_width: f64, mode: LayoutMode) {
        (**self).relayout(viewport_width, mode)
    }
}

/// Card sizing for one [`LayoutMode`], expressed in viewport fractions and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StripMetrics {
    card_fraction: f64,
    gap_px: f64,
    padding_left_px: f64,
    padding_right_fraction: f64,
    padding_right_px: f64,
    rows: usize,
}

impl StripMetrics {
    fn for_mode(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Desktop => Self {
                card_fraction: 0.6,
                gap_px: 32.0,
                padding_left_px: 24.0,
                padding_right_fraction: 0.0,
                padding_right_px: 24.0,
                rows: 1,
            },
            LayoutMode::Mobile => Self {
                card_fraction: 0.7,
                gap_px: 16.0,
                padding_left_px: 16.0,
                padding_right_fraction: 0.4,
                padding_right_px: 0.0,
                rows: 2,
            },
        }
    }
}

/// Pure-geometry stand-in for a horizontally scrolling card strip.
///
/// Desktop lays cards out in one row. Mobile flows them column-wise into two
/// rows, with every second card pushed right by half a card.
#[derive(Debug, Clone)]
pub struct StripLayout {
    viewport_width: f64,
    mode: LayoutMode,
    metrics: StripMetrics,
    count: usize,
    scroll_offset: f64,
}

impl StripLayout {
    pub fn new(count: usize, viewport_width: f64, mode: LayoutMode) -> Self {
        Self {
            viewport_width: viewport_width.max(0.0),
            mode,
            metrics: StripMetrics::for_mode(mode),
            count,
            scroll_offset: 0.0,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn card_width(&self) -> f64 {
        self.viewport_width * self.metrics.card_fraction
    }

    fn columns(&self) -> usize {
        self.count.div_ceil(self.metrics.rows)
    }

    /// Left edge of child `index` in content coordinates.
    pub fn content_x(&self, index: usize) -> Option<f64> {
        if index >= self.count || self.viewport_width <= 0.0 {
            return None;
        }
        let m = &self.metrics;
        let w = self.card_width();
        let column = index / m.rows;
        let stagger = if m.rows > 1 && index % m.rows == 1 {
            w / 2.0
        } else {
            0.0
        };
        Some(m.padding_left_px + column as f64 * (w + m.gap_px) + stagger)
    }

    fn content_width(&self) -> f64 {
        let columns = self.columns();
        if columns == 0 || self.viewport_width <= 0.0 {
            return 0.0;
        }
        let m = &self.metrics;
        let cards = columns as f64 * self.card_width() + (columns - 1) as f64 * m.gap_px;
        m.padding_left_px
            + cards
            + m.padding_right_px
            + self.viewport_width * m.padding_right_fraction
    }

    fn max_scroll(&self) -> f64 {
        (self.scroll_width() - self.container_width()).max(0.0)
    }
}

impl LayoutMeasurer for StripLayout {
    fn child_count(&self) -> usize {
        self.count
    }

    fn width_of(&self, index: usize) -> Option<f64> {
        (index < self.count && self.viewport_width > 0.0).then(|| self.card_width())
    }

    fn offset_of(&self, index: usize) -> Option<f64> {
        self.content_x(index).map(|x| x - self.scroll_offset)
    }

    fn container_width(&self) -> f64 {
        self.viewport_width
    }

    fn scroll_width(&self) -> f64 {
        if self.viewport_width <= 0.0 {
            return 0.0;
        }
        self.content_width().max(self.container_width())
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());
    }

    fn relayout(&mut self, viewport_width: f64, mode: LayoutMode) {
        self.viewport_width = viewport_width.max(0.0);
        self.mode = mode;
        self.metrics = StripMetrics::for_mode(mode);
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }
}
