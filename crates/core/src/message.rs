use std::fmt;

/// Stable identifier for one message.
///
/// Issued only by [`IdAllocator`]; ordering by id equals insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Monotonic id source owned by a single store.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns a fresh id strictly greater than every id issued before.
    pub fn next_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

/// Lifecycle status for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
    #[default]
    Done,
    Streaming,
    Cancelled,
}

/// Core message model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub status: MessageStatus,
}

impl Message {
    /// Creates a message with explicit status.
    pub fn new(
        id: MessageId,
        role: Role,
        content: impl Into<String>,
        status: MessageStatus,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            status,
        }
    }

    /// Creates a fully populated user message.
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, Role::User, content, MessageStatus::Done)
    }

    /// Creates an empty assistant placeholder while streaming.
    pub fn assistant_streaming(id: MessageId) -> Self {
        Self::new(id, Role::Assistant, String::new(), MessageStatus::Streaming)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }
}

/// Partial field update applied by id.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub streaming: Option<bool>,
}

impl MessagePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            streaming: None,
        }
    }

    pub fn streaming(streaming: bool) -> Self {
        Self {
            content: None,
            streaming: Some(streaming),
        }
    }

    pub(crate) fn apply_to(self, message: &mut Message) {
        if let Some(content) = self.content {
            message.content = content;
        }

        match self.streaming {
            Some(true) => message.status = MessageStatus::Streaming,
            // Only a live stream can finish; a cancelled message keeps its status.
            Some(false) if message.status == MessageStatus::Streaming => {
                message.status = MessageStatus::Done;
            }
            Some(false) | None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_issues_strictly_increasing_ids() {
        let mut ids = IdAllocator::new();
        let issued = (0..100).map(|_| ids.next_id()).collect::<Vec<_>>();

        assert_eq!(issued[0], MessageId::new(1));
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let mut message = Message::assistant_streaming(MessageId::new(7));

        MessagePatch::content("partial").apply_to(&mut message);
        assert_eq!(message.content, "partial");
        assert!(message.is_streaming());

        MessagePatch::streaming(false).apply_to(&mut message);
        assert_eq!(message.content, "partial");
        assert_eq!(message.status, MessageStatus::Done);
        assert_eq!(message.role, Role::Assistant);
    }

    #[test]
    fn finishing_a_cancelled_message_keeps_cancelled() {
        let mut message = Message::new(
            MessageId::new(3),
            Role::Assistant,
            "half",
            MessageStatus::Cancelled,
        );

        MessagePatch::streaming(false).apply_to(&mut message);
        assert_eq!(message.status, MessageStatus::Cancelled);
    }
}
