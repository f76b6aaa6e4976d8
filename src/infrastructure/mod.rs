//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (FeedProvider for Mastodon, ChatTransport for
//! Matrix) and the on-disk item store.

pub mod mastodon;
pub mod matrix;
pub mod store;
