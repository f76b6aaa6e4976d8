//! # Interface Layer
//!
//! The chat-facing command surface: handlers bound to command names.

pub mod commands;
