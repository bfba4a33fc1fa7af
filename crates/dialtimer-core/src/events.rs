use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change on the screen produces an Event.
/// Front-ends drain them after each input or countdown message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        countdown_id: u64,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownTick {
        countdown_id: u64,
        remaining_ms: u64,
        display: String,
        at: DateTime<Utc>,
    },
    CountdownFinished {
        countdown_id: u64,
        at: DateTime<Utc>,
    },
    /// Stopped by the user before or after reaching zero.
    CountdownStopped {
        countdown_id: u64,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    AlarmStarted {
        stream_id: u32,
        at: DateTime<Utc>,
    },
    AlarmStopped {
        stream_id: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The `type` tag this event serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CountdownStarted { .. } => "CountdownStarted",
            Event::CountdownTick { .. } => "CountdownTick",
            Event::CountdownFinished { .. } => "CountdownFinished",
            Event::CountdownStopped { .. } => "CountdownStopped",
            Event::AlarmStarted { .. } => "AlarmStarted",
            Event::AlarmStopped { .. } => "AlarmStopped",
        }
    }
}
