//! Alarm playback.
//!
//! The screen only talks to [`AlarmPlayer`]. [`AlarmPool`] implements it on
//! top of any [`ClipSink`], and [`TerminalBell`] is the sink the CLI ships.

mod bell;
mod pool;

pub use bell::TerminalBell;
pub use pool::{AlarmPool, ClipSettings};

use serde::{Deserialize, Serialize};

use crate::error::AlarmError;

/// An active playback stream, or the sentinel for "nothing playing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamHandle {
    None,
    Active(u32),
}

impl StreamHandle {
    pub fn is_active(&self) -> bool {
        matches!(self, StreamHandle::Active(_))
    }

    pub fn stream_id(&self) -> Option<u32> {
        match self {
            StreamHandle::Active(id) => Some(*id),
            StreamHandle::None => None,
        }
    }
}

/// Capability the screen needs to ring an alarm.
pub trait AlarmPlayer {
    /// Start the alarm. Returns [`StreamHandle::None`] if nothing can play.
    fn play(&mut self) -> StreamHandle;

    /// Stop a stream. Idempotent; the sentinel and stale handles are ignored.
    fn stop(&mut self, handle: StreamHandle);
}

impl<P: AlarmPlayer + ?Sized> AlarmPlayer for Box<P> {
    fn play(&mut self) -> StreamHandle {
        (**self).play()
    }

    fn stop(&mut self, handle: StreamHandle) {
        (**self).stop(handle)
    }
}

/// Output device for one repetition of the alarm clip.
pub trait ClipSink: Send + 'static {
    /// Acquire the device. Called once when the clip is loaded.
    fn prepare(&mut self) -> Result<(), AlarmError>;

    /// Play the clip once at `volume` (0.0 ..= 1.0).
    fn emit(&mut self, volume: f32) -> Result<(), AlarmError>;
}
