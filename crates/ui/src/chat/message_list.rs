use std::time::Duration;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use yaac_core::{LayoutMeasurements, Message, remaining_space};

use crate::chat::events::{JumpToBottomClicked, ManualScroll};
use crate::chat::scroll_manager::{ANIMATION_FRAME, ScrollManager};

const BUBBLE_MAX_WIDTH_RATIO: f32 = 0.7;
const BUBBLE_PADDING: Pixels = px(12.);
const ROW_GAP: Pixels = px(8.);
const STREAMING_DOT_SIZE: Pixels = px(8.);
const STREAMING_PULSE: Duration = Duration::from_millis(1_000);

/// Render-only view of the message sequence plus the trailing spacer and affordance.
pub struct MessageList {
    messages: Vec<Message>,
    show_jump_to_bottom: bool,
    spacer_padding: f32,
    scroll_manager: ScrollManager,
    animation_task: Option<Task<()>>,
}

impl EventEmitter<ManualScroll> for MessageList {}
impl EventEmitter<JumpToBottomClicked> for MessageList {}

impl MessageList {
    pub fn new(spacer_padding: f32, smooth_scroll: Duration, _cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            show_jump_to_bottom: false,
            spacer_padding,
            scroll_manager: ScrollManager::new(smooth_scroll),
            animation_task: None,
        }
    }

    pub fn set_messages(&mut self, messages: Vec<Message>, cx: &mut Context<Self>) {
        self.messages = messages;
        cx.notify();
    }

    /// Swaps in a patched message without resyncing the whole list.
    pub fn replace_message(&mut self, message: Message, cx: &mut Context<Self>) -> bool {
        let replaced = replace_by_id(&mut self.messages, message);
        if replaced {
            cx.notify();
        }
        replaced
    }

    pub fn set_show_jump_to_bottom(&mut self, show: bool, cx: &mut Context<Self>) {
        if self.show_jump_to_bottom != show {
            self.show_jump_to_bottom = show;
            cx.notify();
        }
    }

    /// Heights from the last completed layout pass.
    pub fn measurements(&self) -> LayoutMeasurements {
        self.scroll_manager.measurements(self.messages.len())
    }

    pub fn scroll_to_bottom(&mut self, cx: &mut Context<Self>) {
        self.scroll_manager.scroll_to_bottom();
        self.drive_animation(cx);
        cx.notify();
    }

    fn drive_animation(&mut self, cx: &mut Context<Self>) {
        if self.animation_task.is_some() || !self.scroll_manager.is_animating() {
            return;
        }

        self.animation_task = Some(cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(ANIMATION_FRAME).await;

                let running = this
                    .update(cx, |this, cx| {
                        let running = this.scroll_manager.step();
                        cx.notify();
                        running
                    })
                    .unwrap_or(false);

                if !running {
                    break;
                }
            }

            let _ = this.update(cx, |this, _cx| {
                this.animation_task = None;
            });
        }));
    }

    fn handle_scroll_wheel(&mut self, cx: &mut Context<Self>) {
        self.scroll_manager.interrupt();
        self.animation_task = None;
        cx.emit(ManualScroll);
    }

    fn render_message_row(
        &self,
        message: &Message,
        max_bubble_width: Pixels,
        cx: &Context<Self>,
    ) -> AnyElement {
        let theme = cx.theme();
        let content = if message.content.is_empty() {
            " ".to_string()
        } else {
            message.content.clone()
        };

        let bubble = h_flex()
            .max_w(max_bubble_width)
            .items_end()
            .gap_1()
            .p(BUBBLE_PADDING)
            .rounded_lg()
            .child(Label::new(content).text_sm());

        let bubble = if message.is_user() {
            bubble.bg(theme.primary).text_color(theme.primary_foreground)
        } else {
            bubble.bg(theme.muted).text_color(theme.foreground)
        };

        let bubble = bubble.when(message.is_streaming(), |bubble| {
            bubble.child(
                div()
                    .flex_shrink_0()
                    .mb_1()
                    .size(STREAMING_DOT_SIZE)
                    .rounded_full()
                    .bg(theme.foreground)
                    .with_animation(
                        ElementId::Name(SharedString::from(format!(
                            "streaming-dot-{}",
                            message.id
                        ))),
                        Animation::new(STREAMING_PULSE)
                            .repeat()
                            .with_easing(pulsating_between(0.3, 1.0)),
                        |dot, delta| dot.opacity(delta),
                    ),
            )
        });

        let row = h_flex().w_full();
        if message.is_user() {
            row.justify_end().child(bubble).into_any_element()
        } else {
            row.justify_start().child(bubble).into_any_element()
        }
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let measurements = self.measurements();
        let spacer_height = remaining_space(&measurements, self.spacer_padding);
        let list_width = f32::from(self.scroll_manager.handle().bounds().size.width);
        let max_bubble_width = if list_width > 0. {
            px(list_width * BUBBLE_MAX_WIDTH_RATIO)
        } else {
            px(470.)
        };

        let rows = self
            .messages
            .iter()
            .map(|message| self.render_message_row(message, max_bubble_width, cx))
            .collect::<Vec<_>>();

        div()
            .id("message-list-frame")
            .relative()
            .size_full()
            .min_h_0()
            .child(
                v_flex()
                    .id("message-list")
                    .size_full()
                    .p_4()
                    // Gap lives between rows so row bounds stay bubble-sized.
                    .gap(ROW_GAP)
                    .overflow_y_scroll()
                    .track_scroll(self.scroll_manager.handle())
                    .on_scroll_wheel(cx.listener(|this, _: &ScrollWheelEvent, _window, cx| {
                        this.handle_scroll_wheel(cx);
                    }))
                    .children(rows)
                    // End marker; reserves room so short replies do not jump the list.
                    .child(
                        div()
                            .id("message-list-end")
                            .flex_shrink_0()
                            .w_full()
                            .h(px(spacer_height)),
                    ),
            )
            .when(self.show_jump_to_bottom, |frame| {
                frame.child(
                    div().absolute().bottom(px(40.)).right(px(36.)).child(
                        Button::new("jump-to-bottom")
                            .ghost()
                            .small()
                            .icon(IconName::ArrowDown)
                            .on_click(cx.listener(|_this, _, _window, cx| {
                                cx.emit(JumpToBottomClicked);
                            })),
                    ),
                )
            })
    }
}

/// Streaming targets sit near the end, so search from the back.
fn replace_by_id(messages: &mut [Message], message: Message) -> bool {
    match messages.iter_mut().rev().find(|existing| existing.id == message.id) {
        Some(slot) => {
            *slot = message;
            true
        }
        None => false,
    }
}
