use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use yaac_core::ChatSettings;

use crate::chat::ChatView;

pub const APP_TITLE: &str = "Yet Another AI Chatbot";
/// Width and height of the chat card.
pub const WINDOW_WIDTH: f32 = 672.0;
pub const WINDOW_HEIGHT: f32 = 600.0;
#[cfg(target_os = "macos")]
const HEADER_LEFT_SAFE_PADDING: f32 = 78.0;
#[cfg(not(target_os = "macos"))]
const HEADER_LEFT_SAFE_PADDING: f32 = 16.0;

/// Computes the header height using a Zed-style responsive formula.
///
/// Keeps the title area consistent across macOS and Linux while still
/// respecting user font scaling via rem size.
fn header_height(window: &Window) -> Pixels {
    (2.5 * window.rem_size()).max(px(48.0))
}

gpui::actions!(shell, [Quit]);

/// Window root: a draggable title header above the chat view.
pub struct ChatAppShell {
    chat_view: Entity<ChatView>,
    title_bar_should_move: bool,
}

impl ChatAppShell {
    pub fn new(settings: ChatSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let chat_view = cx.new(|cx| ChatView::new(settings, window, cx));

        Self {
            chat_view,
            title_bar_should_move: false,
        }
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .bg(theme.background)
            .child(self.render_header(window, header_height(window), cx))
            .child(
                v_flex()
                    .id("main-content")
                    .flex_1()
                    .min_h_0()
                    .overflow_hidden()
                    .child(self.chat_view.clone()),
            )
    }
}

impl ChatAppShell {
    fn render_header(
        &self,
        window: &Window,
        height: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("app-header")
            .window_control_area(WindowControlArea::Drag)
            .on_mouse_down_out(cx.listener(|this, _, _window, _cx| {
                this.title_bar_should_move = false;
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = false;
                }),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = true;
                }),
            )
            .on_mouse_move(cx.listener(|this, _, window, _cx| {
                if this.title_bar_should_move {
                    this.title_bar_should_move = false;
                    window.start_window_move();
                }
            }))
            .w_full()
            .h(height)
            .flex_shrink_0()
            .pl(px(HEADER_LEFT_SAFE_PADDING))
            .pr_4()
            .items_center()
            .justify_between()
            .bg(theme.primary)
            .text_color(theme.primary_foreground)
            .child(
                div()
                    .text_xl()
                    .font_weight(FontWeight::SEMIBOLD)
                    .child(APP_TITLE),
            )
            .when(
                cfg!(target_os = "linux") && window.window_controls().window_menu,
                |header| {
                    header.on_mouse_down(MouseButton::Right, |event, window, _| {
                        window.show_window_menu(event.position);
                    })
                },
            )
            .child(self.render_linux_window_controls(cx))
    }

    fn render_linux_window_controls(&self, cx: &Context<Self>) -> AnyElement {
        #[cfg(target_os = "linux")]
        {
            h_flex()
                .id("linux-window-controls")
                .items_center()
                // Keep control clicks out of header drag gestures.
                .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                .gap_2()
                .child(
                    Button::new("linux-window-minimize")
                        .ghost()
                        .small()
                        .icon(IconName::WindowMinimize)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.minimize_window();
                        })),
                )
                .child(
                    Button::new("linux-window-close")
                        .ghost()
                        .small()
                        .icon(IconName::WindowClose)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.remove_window();
                        })),
                )
                .into_any_element()
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = cx;
            div().into_any_element()
        }
    }
}
