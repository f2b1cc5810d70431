use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ChatSettings;
use crate::input::can_submit;
use crate::message::{MessageId, MessagePatch};
use crate::reveal::{CannedResponses, RevealEvent, RevealHandle, start_reveal};
use crate::scroll::{LayoutMeasurements, ScrollController, ScrollRequest};
use crate::store::{MessageStore, Turn};

/// Result of one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub turn: Turn,
    /// Full text the assistant placeholder will receive.
    pub response: String,
    pub scroll: ScrollRequest,
}

/// Headless chat coordinator: store, reveal wiring and scroll affordance.
///
/// Streams are independent and keyed by assistant message id, so a second
/// submission while one reveal is running starts its own reveal.
pub struct ChatSession {
    store: MessageStore,
    scroll: ScrollController,
    responses: CannedResponses,
    settings: ChatSettings,
    rng: StdRng,
}

impl ChatSession {
    pub fn new(settings: ChatSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Deterministic response picks for tests and replays.
    pub fn with_seed(settings: ChatSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: ChatSettings, rng: StdRng) -> Self {
        Self {
            store: MessageStore::new(),
            scroll: settings.scroll_controller(),
            responses: settings.responses(),
            settings,
            rng,
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn responses(&self) -> &CannedResponses {
        &self.responses
    }

    /// Appends the user/assistant pair for `text` and picks the reply.
    ///
    /// Whitespace-only text is ignored and leaves the store untouched.
    pub fn submit(&mut self, text: &str) -> Option<SubmitOutcome> {
        if !can_submit(text) {
            return None;
        }

        let turn = self.store.push_turn(text);
        let response = self.responses.pick(&mut self.rng).to_string();

        tracing::debug!(
            user_id = %turn.user_id,
            assistant_id = %turn.assistant_id,
            response_chars = response.chars().count(),
            active_streams = self.store.streaming_ids().len(),
            "accepted submission"
        );

        Some(SubmitOutcome {
            turn,
            response,
            scroll: self.scroll.on_submit(),
        })
    }

    pub fn start_reveal(&self, outcome: &SubmitOutcome) -> RevealHandle {
        start_reveal(
            outcome.turn.assistant_id,
            outcome.response.clone(),
            self.settings.char_delay(),
        )
    }

    /// Applies one reveal event to the store.
    ///
    /// Returns the message id when the event finished its stream.
    pub fn apply_reveal_event(&mut self, event: RevealEvent) -> Option<MessageId> {
        match event {
            RevealEvent::Prefix { target, text } => {
                self.store.patch(target, MessagePatch::content(text));
                None
            }
            RevealEvent::Done { target } => {
                self.store
                    .patch(target, MessagePatch::streaming(false))
                    .then_some(target)
            }
        }
    }

    /// Post-stream affordance check against fresh layout measurements.
    pub fn complete_stream(&mut self, id: MessageId, measurements: &LayoutMeasurements) -> bool {
        let shown = self.scroll.on_stream_complete(measurements);
        tracing::debug!(%id, shown, "stream complete, affordance evaluated");
        shown
    }

    pub fn handle_manual_scroll(&mut self) {
        self.scroll.on_manual_scroll();
    }

    pub fn jump_to_bottom(&self) -> ScrollRequest {
        self.scroll.jump_to_bottom()
    }

    pub fn show_jump_to_bottom(&self) -> bool {
        self.scroll.show_jump_to_bottom()
    }

    pub fn remaining_space(&self, measurements: &LayoutMeasurements) -> f32 {
        self.scroll.remaining_space(measurements)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ChatSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn blank_submission_is_a_noop() {
        let mut session = ChatSession::with_seed(ChatSettings::default(), 1);

        for text in ["", "   ", "\n\t"] {
            assert!(session.submit(text).is_none());
        }
        assert!(session.store().is_empty());
        assert_eq!(session.store().revision(), 0);
    }

    #[test]
    fn submission_keeps_the_raw_text() {
        let mut session = ChatSession::with_seed(ChatSettings::default(), 1);
        let outcome = session.submit("  spaced\nout ").expect("accepted");

        let user = session.store().get(outcome.turn.user_id).expect("user message");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "  spaced\nout ");
        assert!(session.responses().contains(&outcome.response));
    }

    #[test]
    fn done_for_unknown_target_reports_nothing() {
        let mut session = ChatSession::with_seed(ChatSettings::default(), 1);
        assert_eq!(
            session.apply_reveal_event(RevealEvent::Done {
                target: MessageId::new(42)
            }),
            None
        );
    }
}
