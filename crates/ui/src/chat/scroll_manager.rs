use std::time::{Duration, Instant};

use gpui::{Bounds, Pixels, ScrollHandle, point, px};
use yaac_core::LayoutMeasurements;

/// Frame interval used while a smooth scroll is in flight.
pub const ANIMATION_FRAME: Duration = Duration::from_millis(8);

#[derive(Debug, Clone, Copy)]
struct SmoothScroll {
    from_y: f32,
    started_at: Instant,
    duration: Duration,
}

/// Owns the list scroll handle, samples layout heights and animates jumps to the end.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    smooth_scroll: Option<SmoothScroll>,
    smooth_scroll_duration: Duration,
}

impl ScrollManager {
    pub fn new(smooth_scroll_duration: Duration) -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            smooth_scroll: None,
            smooth_scroll_duration,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn is_animating(&self) -> bool {
        self.smooth_scroll.is_some()
    }

    /// Heights of the viewport and the two newest rows.
    ///
    /// Rows are the first `message_count` children of the tracked element; rows
    /// that have not been laid out yet measure zero.
    pub fn measurements(&self, message_count: usize) -> LayoutMeasurements {
        let row = |index: Option<usize>| {
            index.and_then(|index| self.scroll_handle.bounds_for_item(index))
        };

        measure(
            self.scroll_handle.bounds(),
            row(message_count.checked_sub(1)),
            row(message_count.checked_sub(2)),
        )
    }

    /// Starts a smooth scroll toward the end; the caller drives `step` per frame.
    pub fn scroll_to_bottom(&mut self) {
        self.smooth_scroll = Some(SmoothScroll {
            from_y: f32::from(self.scroll_handle.offset().y),
            started_at: Instant::now(),
            duration: self.smooth_scroll_duration,
        });
    }

    /// Advances the smooth scroll by one frame. Returns whether it is still running.
    pub fn step(&mut self) -> bool {
        let Some(animation) = self.smooth_scroll else {
            return false;
        };

        // Re-read the target every frame; streamed text keeps growing the list.
        let target_y = self.bottom_y();
        let progress = if animation.duration.is_zero() {
            1.
        } else {
            (animation.started_at.elapsed().as_secs_f32() / animation.duration.as_secs_f32())
                .min(1.)
        };

        self.set_y(animation.from_y + (target_y - animation.from_y) * ease_out_cubic(progress));

        if progress >= 1. {
            self.smooth_scroll = None;
        }
        self.smooth_scroll.is_some()
    }

    /// User input wins over any running animation.
    pub fn interrupt(&mut self) {
        self.smooth_scroll = None;
    }

    fn bottom_y(&self) -> f32 {
        // GPUI uses negative Y offsets for scrolling down.
        let max_offset = self.scroll_handle.max_offset().height;
        if max_offset > Pixels::ZERO {
            -f32::from(max_offset)
        } else {
            0.
        }
    }

    fn set_y(&self, y: f32) {
        let current_x = self.scroll_handle.offset().x;
        self.scroll_handle.set_offset(point(current_x, px(y)));
    }
}

/// Row bounds are the bubble rows themselves; the list gap sits outside them.
fn measure(
    viewport: Bounds<Pixels>,
    last_row: Option<Bounds<Pixels>>,
    previous_row: Option<Bounds<Pixels>>,
) -> LayoutMeasurements {
    let height = |bounds: Option<Bounds<Pixels>>| {
        bounds
            .map(|bounds| f32::from(bounds.size.height))
            .unwrap_or(0.)
    };

    LayoutMeasurements::new(
        f32::from(viewport.size.height),
        height(last_row),
        height(previous_row),
    )
}

fn ease_out_cubic(progress: f32) -> f32 {
    1. - (1. - progress).powi(3)
}
