//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the bridge.
//! Independent of the Matrix and Mastodon client libraries, serving as the contract for the other layers.

pub mod config;
pub mod error;
pub mod paths;
pub mod traits;
pub mod types;
