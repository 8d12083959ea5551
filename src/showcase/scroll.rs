//! Scroll position to timeline progress.
//!
//! The trigger spans the whole scroll container: it starts when the container's
//! top reaches the viewport's top and ends when its bottom reaches the viewport's
//! bottom. Progress is applied directly, without smoothing.

use winit::event::MouseScrollDelta;

/// Maps a scroll offset onto `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTrigger {
    /// Offset of the container's top from the document top.
    pub container_top: f64,
    pub container_height: f64,
    pub viewport_height: f64,
}

impl ScrollTrigger {
    pub fn new(container_height: f64, viewport_height: f64) -> Self {
        Self {
            container_top: 0.0,
            container_height,
            viewport_height,
        }
    }

    pub fn start(&self) -> f64 {
        self.container_top
    }

    pub fn end(&self) -> f64 {
        self.container_top + self.container_height - self.viewport_height
    }

    /// Largest scroll offset the page allows.
    pub fn max_scroll(&self) -> f64 {
        self.end().max(self.start())
    }

    pub fn progress(&self, scroll_y: f64) -> f32 {
        let span = self.end() - self.start();
        if span <= 0.0 {
            // Everything fits on one screen, the timeline is either fully played or not at all
            return if scroll_y >= self.start() { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start()) / span).clamp(0.0, 1.0) as f32
    }
}

/// Pixels per wheel "line" when the platform reports line deltas.
const LINE_HEIGHT: f64 = 40.0;

/// Scroll offset of a page without a document, fed from mouse wheel events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualScroll {
    offset: f64,
}

impl VirtualScroll {
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Apply a wheel event, clamped to `0..=max_scroll`. Scrolling the wheel
    /// down (negative delta) moves further down the page.
    pub fn apply(&mut self, delta: MouseScrollDelta, max_scroll: f64) {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64 * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(position) => position.y,
        };
        self.offset = (self.offset - dy).clamp(0.0, max_scroll.max(0.0));
    }

    pub fn clamp_to(&mut self, max_scroll: f64) {
        self.offset = self.offset.clamp(0.0, max_scroll.max(0.0));
    }
}
