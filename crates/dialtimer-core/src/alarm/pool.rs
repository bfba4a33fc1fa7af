//! Single-stream playback pool.
//!
//! The clip is loaded once. Each `play` replays it `1 + loops` times, one
//! repetition per clip period, on a task of the current tokio runtime. A new
//! `play` replaces whatever stream was running.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::{AlarmPlayer, ClipSink, StreamHandle};

/// How the loaded clip is played back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipSettings {
    /// Extra repetitions after the first.
    pub loops: u32,
    pub volume: f32,
    /// Length of one repetition.
    pub period: Duration,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            loops: 10,
            volume: 1.0,
            period: Duration::from_millis(1_000),
        }
    }
}

struct Playback {
    stream_id: u32,
    task: JoinHandle<()>,
}

pub struct AlarmPool<S: ClipSink> {
    sink: Option<Arc<Mutex<S>>>,
    settings: ClipSettings,
    next_stream_id: u32,
    playing: Option<Playback>,
}

impl<S: ClipSink> AlarmPool<S> {
    /// Load the clip into `sink`.
    ///
    /// A sink that fails to prepare leaves the pool unloaded: `play` then
    /// returns [`StreamHandle::None`] and `stop` does nothing.
    pub fn load(mut sink: S, settings: ClipSettings) -> Self {
        let sink = match sink.prepare() {
            Ok(()) => Some(Arc::new(Mutex::new(sink))),
            Err(e) => {
                tracing::warn!("alarm clip not loaded: {e}");
                None
            }
        };
        Self {
            sink,
            settings,
            next_stream_id: 1,
            playing: None,
        }
    }

    /// A pool with no clip; every call is a no-op.
    pub fn unloaded(settings: ClipSettings) -> Self {
        Self {
            sink: None,
            settings,
            next_stream_id: 1,
            playing: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.sink.is_some()
    }

    pub fn settings(&self) -> &ClipSettings {
        &self.settings
    }

    /// Whether a stream's playback task is still running.
    pub fn is_playing(&self) -> bool {
        self.playing.as_ref().is_some_and(|p| !p.task.is_finished())
    }
}

impl<S: ClipSink> AlarmPlayer for AlarmPool<S> {
    fn play(&mut self) -> StreamHandle {
        let Some(sink) = self.sink.clone() else {
            return StreamHandle::None;
        };
        if let Some(previous) = self.playing.take() {
            previous.task.abort();
        }

        let stream_id = self.next_stream_id;
        self.next_stream_id = self.next_stream_id.wrapping_add(1).max(1);

        let settings = self.settings;
        let task = tokio::spawn(async move {
            for _ in 0..=settings.loops {
                let emitted = match sink.lock() {
                    Ok(mut guard) => guard.emit(settings.volume),
                    Err(_) => return,
                };
                if let Err(e) = emitted {
                    tracing::warn!(stream_id, "alarm playback failed: {e}");
                    return;
                }
                tokio::time::sleep(settings.period).await;
            }
        });
        tracing::info!(stream_id, loops = settings.loops, "alarm started");

        self.playing = Some(Playback { stream_id, task });
        StreamHandle::Active(stream_id)
    }

    fn stop(&mut self, handle: StreamHandle) {
        let StreamHandle::Active(id) = handle else {
            return;
        };
        if self.playing.as_ref().is_some_and(|p| p.stream_id == id) {
            if let Some(playback) = self.playing.take() {
                playback.task.abort();
                tracing::info!(stream_id = id, "alarm stopped");
            }
        }
    }
}

impl<S: ClipSink> Drop for AlarmPool<S> {
    fn drop(&mut self) {
        if let Some(playback) = self.playing.take() {
            playback.task.abort();
        }
    }
}
