use std::collections::HashMap;

use gpui::*;
use gpui_component::{ActiveTheme, v_flex};
use gpui_tokio_bridge::Tokio;
use yaac_core::{
    ChatSession, ChatSettings, MessageId, RevealEvent, RevealEventStream, RevealWorker,
    ScrollRequest,
};

use crate::chat::events::{JumpToBottomClicked, ManualScroll, Submit};
use crate::chat::{MessageInput, MessageList};

/// Tasks backing one running reveal; dropping them cancels it.
struct ActiveReveal {
    _worker_task: Task<Result<(), gpui_tokio_bridge::JoinError>>,
    _reader_task: Task<()>,
}

/// Parent coordinator for message list, composer and reveal orchestration.
pub struct ChatView {
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    session: ChatSession,
    synced_revision: Option<u64>,
    active_reveals: HashMap<MessageId, ActiveReveal>,
}

impl ChatView {
    pub fn new(settings: ChatSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let spacer_padding = settings.spacer_padding;
        let smooth_scroll = settings.smooth_scroll();
        let message_list = cx.new(|cx| MessageList::new(spacer_padding, smooth_scroll, cx));
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.subscribe(&message_input, |this, _, event: &Submit, cx| {
            this.handle_submit(event.clone(), cx);
        })
        .detach();

        cx.subscribe(&message_list, |this, _, _event: &ManualScroll, cx| {
            this.handle_manual_scroll(cx);
        })
        .detach();

        cx.subscribe(&message_list, |this, _, _event: &JumpToBottomClicked, cx| {
            let request = this.session.jump_to_bottom();
            this.schedule_scroll(request, cx);
        })
        .detach();

        Self {
            message_list,
            message_input,
            session: ChatSession::new(settings),
            synced_revision: None,
            active_reveals: HashMap::new(),
        }
    }

    fn handle_submit(&mut self, event: Submit, cx: &mut Context<Self>) {
        let Some(outcome) = self.session.submit(&event.content) else {
            return;
        };

        let handle = self.session.start_reveal(&outcome);
        self.sync_messages(cx);
        self.schedule_scroll(outcome.scroll, cx);
        self.spawn_reveal(handle.worker, handle.stream, cx);
    }

    fn spawn_reveal(
        &mut self,
        worker: RevealWorker,
        mut stream: RevealEventStream,
        cx: &mut Context<Self>,
    ) {
        let target = stream.target();
        let worker_task = Tokio::spawn(cx, worker);

        let reader_task = cx.spawn(async move |this, cx| {
            while let Some(event) = stream.recv().await {
                let _ = this.update(cx, |this, cx| {
                    this.handle_reveal_event(event, cx);
                });
            }

            let _ = this.update(cx, |this, cx| {
                this.handle_reveal_closed(target, cx);
            });
        });

        // Independent per message: a second submit never touches the first reveal.
        self.active_reveals.insert(
            target,
            ActiveReveal {
                _worker_task: worker_task,
                _reader_task: reader_task,
            },
        );
    }

    fn handle_reveal_event(&mut self, event: RevealEvent, cx: &mut Context<Self>) {
        let target = event.target();
        let Some(finished) = self.session.apply_reveal_event(event) else {
            self.sync_message(target, cx);
            return;
        };

        // Heights come from the last painted frame, which may trail the final
        // characters by one batch; the check accepts that lag.
        let measurements = self.message_list.read(cx).measurements();
        self.session.complete_stream(finished, &measurements);
        self.sync_message(finished, cx);
    }

    fn handle_reveal_closed(&mut self, target: MessageId, cx: &mut Context<Self>) {
        if self.active_reveals.remove(&target).is_none() {
            return;
        }

        let still_streaming = self
            .session
            .store()
            .get(target)
            .is_some_and(|message| message.is_streaming());
        if still_streaming {
            tracing::warn!(%target, "reveal channel closed before completion");
        }
        cx.notify();
    }

    fn handle_manual_scroll(&mut self, cx: &mut Context<Self>) {
        self.session.handle_manual_scroll();
        self.sync_affordance(cx);
    }

    fn schedule_scroll(&mut self, request: ScrollRequest, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            if !request.delay.is_zero() {
                // Give freshly appended bubbles a chance to mount first.
                cx.background_executor().timer(request.delay).await;
            }

            let _ = this.update(cx, |this, cx| {
                this.message_list.update(cx, |list, cx| {
                    list.scroll_to_bottom(cx);
                });
            });
        })
        .detach();
    }

    fn sync_messages(&mut self, cx: &mut Context<Self>) {
        let revision = self.session.store().revision();
        if self.synced_revision != Some(revision) {
            self.synced_revision = Some(revision);
            let messages = self.session.store().messages().to_vec();
            self.message_list.update(cx, |list, cx| {
                list.set_messages(messages, cx);
            });
        }

        self.sync_affordance(cx);
    }

    /// Pushes one patched message to the list instead of the whole history.
    fn sync_message(&mut self, id: MessageId, cx: &mut Context<Self>) {
        let revision = self.session.store().revision();
        if self.synced_revision != Some(revision) {
            let replaced = match self.session.store().get(id).cloned() {
                Some(message) => self
                    .message_list
                    .update(cx, |list, cx| list.replace_message(message, cx)),
                None => false,
            };

            if !replaced {
                self.sync_messages(cx);
                return;
            }
            self.synced_revision = Some(revision);
        }

        self.sync_affordance(cx);
    }

    fn sync_affordance(&mut self, cx: &mut Context<Self>) {
        let show = self.session.show_jump_to_bottom();
        self.message_list.update(cx, |list, cx| {
            list.set_show_jump_to_bottom(show, cx);
        });
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            )
    }
}
