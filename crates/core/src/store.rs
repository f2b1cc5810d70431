use crate::message::{IdAllocator, Message, MessageId, MessagePatch};

/// Ids of the two messages created by one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub user_id: MessageId,
    pub assistant_id: MessageId,
}

/// Ordered, append-only message sequence with in-place patching by id.
///
/// `revision` changes on every effective mutation so views can cheaply detect
/// when their snapshot is stale.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    ids: IdAllocator,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> MessageId {
        self.ids.next_id()
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = Message>) {
        let before = self.messages.len();
        self.messages.extend(records);

        if self.messages.len() != before {
            self.bump_revision();
        }
    }

    /// Applies `patch` to the message with `id`.
    ///
    /// Returns `false` without touching anything when no message matches.
    pub fn patch(&mut self, id: MessageId, patch: MessagePatch) -> bool {
        let Some(message) = self.messages.iter_mut().find(|message| message.id == id) else {
            tracing::trace!(%id, "ignored patch for unknown message");
            return false;
        };

        patch.apply_to(message);
        self.bump_revision();
        true
    }

    /// Appends a user message and its streaming assistant placeholder.
    pub fn push_turn(&mut self, text: impl Into<String>) -> Turn {
        let user_id = self.next_id();
        let assistant_id = self.next_id();

        self.append([
            Message::user(user_id, text),
            Message::assistant_streaming(assistant_id),
        ]);

        Turn {
            user_id,
            assistant_id,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn streaming_ids(&self) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|message| message.is_streaming())
            .map(|message| message.id)
            .collect()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageStatus, Role};

    #[test]
    fn push_turn_appends_user_then_streaming_placeholder() {
        let mut store = MessageStore::new();
        let turn = store.push_turn("hello");

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, turn.user_id);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hello");
        assert!(!messages[0].is_streaming());
        assert_eq!(messages[1].id, turn.assistant_id);
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].content.is_empty());
        assert!(messages[1].is_streaming());
        assert!(turn.user_id < turn.assistant_id);
    }

    #[test]
    fn patch_on_missing_id_is_silent_noop() {
        let mut store = MessageStore::new();
        store.push_turn("hi");
        let revision = store.revision();
        let snapshot = store.messages().to_vec();

        assert!(!store.patch(MessageId::new(999), MessagePatch::content("nope")));
        assert_eq!(store.messages(), snapshot.as_slice());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn patch_preserves_order_and_other_records() {
        let mut store = MessageStore::new();
        let first = store.push_turn("one");
        let second = store.push_turn("two");

        assert!(store.patch(first.assistant_id, MessagePatch::content("reply")));

        let ids = store.messages().iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                first.user_id,
                first.assistant_id,
                second.user_id,
                second.assistant_id
            ]
        );
        assert_eq!(store.get(first.assistant_id).map(|m| m.content.as_str()), Some("reply"));
        assert_eq!(store.get(second.assistant_id).map(|m| m.content.as_str()), Some(""));
        assert_eq!(
            store.get(first.user_id).map(|m| m.status),
            Some(MessageStatus::Done)
        );
    }

    #[test]
    fn streaming_ids_tracks_open_placeholders() {
        let mut store = MessageStore::new();
        let first = store.push_turn("a");
        let second = store.push_turn("b");
        assert_eq!(store.streaming_ids(), vec![first.assistant_id, second.assistant_id]);

        store.patch(first.assistant_id, MessagePatch::streaming(false));
        assert_eq!(store.streaming_ids(), vec![second.assistant_id]);
    }

    #[test]
    fn empty_append_leaves_revision_alone() {
        let mut store = MessageStore::new();
        store.append(Vec::new());
        assert_eq!(store.revision(), 0);
        assert!(store.is_empty());
    }
}
