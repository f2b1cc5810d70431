#![deny(unsafe_code)]

/// Chat widget front end.
///
/// This crate renders the [`yaac_core`] chat session with GPUI and
/// gpui-component: a message list with a streaming assistant bubble, a
/// composer, and a floating jump-to-bottom affordance.
pub mod app;
/// Chat views and their event contracts.
pub mod chat;
