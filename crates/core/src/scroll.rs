use std::time::Duration;

/// Padding kept below the trailing spacer so no sliver of gap remains.
pub const DEFAULT_SPACER_PADDING: f32 = 24.;
/// Time for a freshly appended bubble to mount before scrolling to it.
pub const DEFAULT_SCROLL_AFTER_SUBMIT: Duration = Duration::from_millis(100);

/// Layout heights sampled from the rendered message list.
///
/// Bubbles that do not exist (fewer than two messages) measure zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMeasurements {
    pub container_height: f32,
    pub last_bubble_height: f32,
    pub previous_bubble_height: f32,
}

impl LayoutMeasurements {
    pub const fn new(
        container_height: f32,
        last_bubble_height: f32,
        previous_bubble_height: f32,
    ) -> Self {
        Self {
            container_height,
            last_bubble_height,
            previous_bubble_height,
        }
    }
}

/// Height of the invisible spacer after the last bubble.
///
/// Zero means the newest exchange already fills the viewport. Never negative,
/// including for non-finite measurements.
pub fn remaining_space(measurements: &LayoutMeasurements, padding: f32) -> f32 {
    let space = measurements.container_height
        - measurements.last_bubble_height
        - measurements.previous_bubble_height
        - padding;

    if space.is_finite() && space > 0. {
        space
    } else {
        0.
    }
}

/// Instruction for the view to smooth-scroll the end marker into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub delay: Duration,
}

impl ScrollRequest {
    pub const fn smooth_after(delay: Duration) -> Self {
        Self { delay }
    }
}

/// Owns the "jump to bottom" affordance and the spacer arithmetic.
#[derive(Debug, Clone)]
pub struct ScrollController {
    show_jump_to_bottom: bool,
    scroll_after_submit: Duration,
    spacer_padding: f32,
}

impl ScrollController {
    pub fn new(scroll_after_submit: Duration, spacer_padding: f32) -> Self {
        Self {
            show_jump_to_bottom: false,
            scroll_after_submit,
            spacer_padding,
        }
    }

    pub fn show_jump_to_bottom(&self) -> bool {
        self.show_jump_to_bottom
    }

    pub fn remaining_space(&self, measurements: &LayoutMeasurements) -> f32 {
        remaining_space(measurements, self.spacer_padding)
    }

    pub fn on_submit(&self) -> ScrollRequest {
        ScrollRequest::smooth_after(self.scroll_after_submit)
    }

    /// Any user-driven scroll takes control away from the affordance.
    pub fn on_manual_scroll(&mut self) {
        self.show_jump_to_bottom = false;
    }

    /// Shows the affordance once content fills the viewport.
    ///
    /// Returns whether the affordance is visible afterwards.
    pub fn on_stream_complete(&mut self, measurements: &LayoutMeasurements) -> bool {
        if self.remaining_space(measurements) == 0. {
            self.show_jump_to_bottom = true;
        }
        self.show_jump_to_bottom
    }

    /// The affordance stays up; only a manual scroll hides it.
    pub fn jump_to_bottom(&self) -> ScrollRequest {
        ScrollRequest::smooth_after(Duration::ZERO)
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_AFTER_SUBMIT, DEFAULT_SPACER_PADDING)
    }
}
