//! Screen controller.
//!
//! Owns everything the single timer screen shows: the three dial values,
//! whether a countdown is running, and the display string. Countdown
//! callbacks never touch the screen directly; they post [`ScreenMsg`]s onto
//! a channel that the front-end feeds back through [`Screen::apply`] on the
//! same event loop as user input.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::alarm::{AlarmPlayer, StreamHandle};
use crate::events::Event;
use crate::timer::{
    format_hms, CountdownEngine, CountdownHandle, DialDuration, TimeUnit, DEFAULT_TICK_INTERVAL,
    SCROLL_SENSITIVITY,
};

pub const FINISHED_TEXT: &str = "FINISH!";

/// Message posted by a running countdown.
///
/// `run` identifies which start produced it; messages from an earlier run
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMsg {
    Tick { run: u64, remaining_ms: u64 },
    Finished { run: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Running {
        countdown: CountdownHandle,
        remaining_ms: u64,
    },
    /// Reached zero; shown until the user stops.
    Finished { countdown: CountdownHandle },
}

impl ScreenState {
    pub fn mode(&self) -> ScreenMode {
        match self {
            ScreenState::Idle => ScreenMode::Idle,
            ScreenState::Running { .. } => ScreenMode::Running,
            ScreenState::Finished { .. } => ScreenMode::Finished,
        }
    }
}

/// What the front-end should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Selector { dial: DialDuration, focus: TimeUnit },
    Countdown { display: &'a str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSettings {
    pub sensitivity: f64,
    pub tick_interval: Duration,
    pub finished_text: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            sensitivity: SCROLL_SENSITIVITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            finished_text: FINISHED_TEXT.to_string(),
        }
    }
}

pub struct Screen<A: AlarmPlayer> {
    dial: DialDuration,
    focus: TimeUnit,
    state: ScreenState,
    display: String,
    run: u64,
    countdown: CountdownEngine,
    alarm: A,
    stream: StreamHandle,
    settings: ScreenSettings,
    tx: mpsc::UnboundedSender<ScreenMsg>,
    events: Vec<Event>,
}

impl<A: AlarmPlayer> Screen<A> {
    /// Build a screen. The receiver must be drained into [`Screen::apply`].
    pub fn new(alarm: A, settings: ScreenSettings) -> (Self, mpsc::UnboundedReceiver<ScreenMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let screen = Self {
            dial: DialDuration::default(),
            focus: TimeUnit::Hour,
            state: ScreenState::Idle,
            display: format_hms(0),
            run: 0,
            countdown: CountdownEngine::with_period(settings.tick_interval),
            alarm,
            stream: StreamHandle::None,
            settings,
            tx,
            events: Vec::new(),
        };
        (screen, rx)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn dial(&self) -> DialDuration {
        self.dial
    }

    pub fn focus(&self) -> TimeUnit {
        self.focus
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    /// True from start until stop, including while the alarm rings.
    pub fn is_running(&self) -> bool {
        self.state != ScreenState::Idle
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn settings(&self) -> &ScreenSettings {
        &self.settings
    }

    pub fn alarm_stream(&self) -> StreamHandle {
        self.stream
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running() {
            "STOP"
        } else {
            "START"
        }
    }

    pub fn view(&self) -> View<'_> {
        match self.state {
            ScreenState::Idle => View::Selector {
                dial: self.dial,
                focus: self.focus,
            },
            _ => View::Countdown {
                display: &self.display,
            },
        }
    }

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Dial input (idle only) ───────────────────────────────────────

    /// Replace all three dial values.
    pub fn set_dial(&mut self, dial: DialDuration) -> bool {
        if self.is_running() {
            return false;
        }
        self.dial = dial;
        self.display = format_hms(dial.total_ms());
        true
    }

    /// Apply a vertical drag to `unit`. Returns the new value, or `None`
    /// while a countdown is showing.
    pub fn scroll(&mut self, unit: TimeUnit, raw_delta: f64) -> Option<u32> {
        if self.is_running() {
            return None;
        }
        self.focus = unit;
        let value = self.dial.scroll(unit, raw_delta, self.settings.sensitivity);
        self.display = format_hms(self.dial.total_ms());
        Some(value)
    }

    /// Step the focused unit by whole steps.
    pub fn nudge(&mut self, steps: i32) -> Option<u32> {
        if self.is_running() {
            return None;
        }
        let value = self.dial.nudge(self.focus, steps);
        self.display = format_hms(self.dial.total_ms());
        Some(value)
    }

    pub fn set_focus(&mut self, unit: TimeUnit) {
        self.focus = unit;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    // ── Buttons ──────────────────────────────────────────────────────

    /// START while idle, STOP otherwise.
    pub fn press(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Freeze the dial into a countdown and start it.
    ///
    /// Starting again while running replaces the running countdown.
    pub fn start(&mut self) -> CountdownHandle {
        self.silence();

        self.run += 1;
        let run = self.run;
        let total_ms = self.dial.total_ms();

        let tick_tx = self.tx.clone();
        let finish_tx = self.tx.clone();
        let countdown = self.countdown.start(
            total_ms,
            move |remaining_ms| {
                let _ = tick_tx.send(ScreenMsg::Tick { run, remaining_ms });
            },
            move || {
                let _ = finish_tx.send(ScreenMsg::Finished { run });
            },
        );

        self.state = ScreenState::Running {
            countdown,
            remaining_ms: total_ms,
        };
        self.display = format_hms(total_ms);
        self.events.push(Event::CountdownStarted {
            countdown_id: countdown.id(),
            total_ms,
            at: Utc::now(),
        });
        countdown
    }

    /// Cancel the countdown, silence the alarm and go back to the dial.
    /// Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        let (countdown, remaining_ms) = match self.state {
            ScreenState::Idle => return false,
            ScreenState::Running {
                countdown,
                remaining_ms,
            } => {
                self.countdown.cancel(countdown);
                (countdown, remaining_ms)
            }
            ScreenState::Finished { countdown } => (countdown, 0),
        };
        self.silence();

        self.state = ScreenState::Idle;
        self.display = format_hms(self.dial.total_ms());
        self.events.push(Event::CountdownStopped {
            countdown_id: countdown.id(),
            remaining_ms,
            at: Utc::now(),
        });
        true
    }

    /// Feed a countdown message back in. Returns `false` for stale ones.
    pub fn apply(&mut self, msg: ScreenMsg) -> bool {
        let ScreenState::Running { countdown, .. } = self.state else {
            tracing::debug!(?msg, "dropping countdown message, not running");
            return false;
        };

        match msg {
            ScreenMsg::Tick { run, remaining_ms } if run == self.run => {
                self.state = ScreenState::Running {
                    countdown,
                    remaining_ms,
                };
                self.display = format_hms(remaining_ms);
                self.events.push(Event::CountdownTick {
                    countdown_id: countdown.id(),
                    remaining_ms,
                    display: self.display.clone(),
                    at: Utc::now(),
                });
                true
            }
            ScreenMsg::Finished { run } if run == self.run => {
                self.state = ScreenState::Finished { countdown };
                self.display = self.settings.finished_text.clone();
                self.events.push(Event::CountdownFinished {
                    countdown_id: countdown.id(),
                    at: Utc::now(),
                });

                self.stream = self.alarm.play();
                if let Some(stream_id) = self.stream.stream_id() {
                    self.events.push(Event::AlarmStarted {
                        stream_id,
                        at: Utc::now(),
                    });
                }
                true
            }
            stale => {
                tracing::debug!(?stale, current = self.run, "dropping stale countdown message");
                false
            }
        }
    }

    fn silence(&mut self) {
        let stream = std::mem::replace(&mut self.stream, StreamHandle::None);
        let Some(stream_id) = stream.stream_id() else {
            return;
        };
        self.alarm.stop(stream);
        self.events.push(Event::AlarmStopped {
            stream_id,
            at: Utc::now(),
        });
    }
}
