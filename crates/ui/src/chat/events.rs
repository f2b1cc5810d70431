/// Emitted when the user submits composer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Emitted for every user-driven scroll of the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualScroll;

/// Emitted when the floating jump-to-bottom button is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpToBottomClicked;
