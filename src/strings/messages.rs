//! # Messages
//!
//! Constant strings and format functions for user-facing replies and a few log lines.

use std::time::Duration;

pub const RELOADED: &str = "I have reloaded your timelines for you.";
pub const POLL_ALREADY_RUNNING: &str = "The home timeline is already being posted to this room. Use `!stop` first.";
pub const POLL_STOPPED: &str = "Stopped posting the home timeline to this room.";
pub const POLL_NOT_RUNNING: &str = "Nothing is being posted to this room.";

pub fn poll_started(interval: Duration) -> String {
    format!("Posting the home timeline to this room every {} seconds.", interval.as_secs())
}

pub fn command_failed(command: &str, err: &str) -> String {
    format!("⚠️ `{command}` failed: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id}")
}

pub fn join_invite_fail(room_id: &str, err: &str) -> String {
    format!("Failed to join room {room_id} after invite: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";
pub const SHUTDOWN: &str = "Shutting down...";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_messages() {
        assert_eq!(
            poll_started(Duration::from_secs(300)),
            "Posting the home timeline to this room every 300 seconds."
        );
        assert_eq!(command_failed("home", "boom"), "⚠️ `home` failed: boom");
    }
}
