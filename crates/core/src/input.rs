/// What a press of Enter does in the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    Submit,
    InsertNewline,
}

/// Send is enabled only for text with non-whitespace content.
pub fn can_submit(text: &str) -> bool {
    !text.trim().is_empty()
}

pub fn enter_action(shift: bool) -> EnterAction {
    if shift {
        EnterAction::InsertNewline
    } else {
        EnterAction::Submit
    }
}
