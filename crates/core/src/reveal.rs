//! Timed character reveal of a canned response into one assistant message.
//!
//! A reveal is split into a [`RevealWorker`] that sleeps between characters on
//! tokio and a [`RevealEventStream`] the owner drains on its own executor. The
//! two halves only share an mpsc channel and a oneshot cancel signal.

use std::time::Duration;

use futures::future::BoxFuture;
use rand::Rng;
use snafu::ensure;
use tokio::sync::{mpsc, oneshot};

use crate::error::{ConfigResult, InvalidSettingSnafu};
use crate::message::MessageId;

pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(5);
pub const DEFAULT_ACKNOWLEDGEMENT: &str =
    "Thank you for your message! I'm processing your request...";
pub const DEFAULT_FILLER_TOKEN: &str = "stream ";
/// Long enough to overflow the message viewport.
pub const DEFAULT_FILLER_REPEAT: usize = 130;

/// Fixed, non-empty pool of replies picked regardless of the user's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponses {
    responses: Vec<String>,
}

impl CannedResponses {
    pub fn new(responses: Vec<String>) -> ConfigResult<Self> {
        ensure!(
            !responses.is_empty(),
            InvalidSettingSnafu {
                stage: "canned-responses-new",
                details: "response pool must not be empty".to_string(),
            }
        );

        Ok(Self { responses })
    }

    /// The short acknowledgement plus the repeated filler.
    pub fn standard() -> Self {
        Self {
            responses: vec![
                DEFAULT_ACKNOWLEDGEMENT.to_string(),
                DEFAULT_FILLER_TOKEN.repeat(DEFAULT_FILLER_REPEAT),
            ],
        }
    }

    /// Picks one response uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.random_range(0..self.responses.len());
        &self.responses[index]
    }

    pub fn contains(&self, text: &str) -> bool {
        self.responses.iter().any(|response| response == text)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.responses
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    /// Everything revealed so far, one character longer than the previous prefix.
    Prefix { target: MessageId, text: String },
    Done { target: MessageId },
}

impl RevealEvent {
    pub fn target(&self) -> MessageId {
        match self {
            Self::Prefix { target, .. } | Self::Done { target } => *target,
        }
    }
}

pub type RevealWorker = BoxFuture<'static, ()>;

pub struct RevealEventStream {
    target: MessageId,
    events: mpsc::UnboundedReceiver<RevealEvent>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

pub struct RevealHandle {
    pub stream: RevealEventStream,
    pub worker: RevealWorker,
}

impl RevealEventStream {
    fn new(
        target: MessageId,
        events: mpsc::UnboundedReceiver<RevealEvent>,
        cancel_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            target,
            events,
            cancel_tx: Some(cancel_tx),
        }
    }

    pub fn target(&self) -> MessageId {
        self.target
    }

    pub async fn recv(&mut self) -> Option<RevealEvent> {
        self.events.recv().await
    }

    /// Stops the worker before its next character. Returns `false` if the
    /// worker already finished or cancel was called before.
    pub fn cancel(&mut self) -> bool {
        self.cancel_tx
            .take()
            .map(|tx| tx.send(()).is_ok())
            .unwrap_or(false)
    }
}

impl Drop for RevealEventStream {
    fn drop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }
}

/// Builds a reveal of `response` into `target`, one character per `char_delay`.
///
/// Nothing happens until the returned worker is polled.
pub fn start_reveal(
    target: MessageId,
    response: impl Into<String>,
    char_delay: Duration,
) -> RevealHandle {
    let response = response.into();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let worker = Box::pin(async move {
        tracing::debug!(%target, chars = response.chars().count(), "reveal started");
        let mut revealed = String::with_capacity(response.len());

        for ch in response.chars() {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => {
                    tracing::debug!(%target, revealed = revealed.chars().count(), "reveal cancelled");
                    return;
                }
                _ = tokio::time::sleep(char_delay) => {}
            }

            revealed.push(ch);
            let event = RevealEvent::Prefix {
                target,
                text: revealed.clone(),
            };
            if event_tx.send(event).is_err() {
                // Receiver is gone; nobody can observe further progress.
                return;
            }
        }

        let _ = event_tx.send(RevealEvent::Done { target });
        tracing::debug!(%target, "reveal finished");
    });

    RevealHandle {
        stream: RevealEventStream::new(target, event_rx, cancel_tx),
        worker,
    }
}
