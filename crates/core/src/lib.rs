#![deny(unsafe_code)]

//! Toolkit-independent core of the chat widget.
//!
//! The GPUI front end in the `yaac` crate is a thin adapter over
//! [`session::ChatSession`]; everything that can be tested without a window
//! lives here.
pub mod config;
pub mod error;
pub mod input;
/// Message entities and partial updates.
pub mod message;
/// Timed character reveal of canned responses.
pub mod reveal;
pub mod scroll;
pub mod session;
pub mod store;

pub use config::ChatSettings;
pub use error::{ConfigError, ConfigResult};
pub use input::{EnterAction, can_submit, enter_action};
pub use message::{IdAllocator, Message, MessageId, MessagePatch, MessageStatus, Role};
pub use reveal::{
    CannedResponses, RevealEvent, RevealEventStream, RevealHandle, RevealWorker, start_reveal,
};
pub use scroll::{LayoutMeasurements, ScrollController, ScrollRequest, remaining_space};
pub use session::{ChatSession, SubmitOutcome};
pub use store::{MessageStore, Turn};
