//! # dialtimer Core Library
//!
//! This library provides the logic behind the dialtimer countdown screen.
//! Front-ends (the terminal UI and the headless CLI commands) are thin
//! layers that feed input into a [`Screen`] and draw what it reports.
//!
//! ## Architecture
//!
//! - **Dial**: gesture deltas mapped onto clamped hour/minute/second values
//! - **Countdown Engine**: tokio task ticking once per period, cancellable
//! - **Alarm**: single-stream playback pool behind the [`AlarmPlayer`] trait
//! - **Screen**: state machine composing the above (idle, running, finished)
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: start/cancel countdowns with tick and finish callbacks
//! - [`Screen`]: the controller behind the single timer screen
//! - [`Config`]: application configuration management

pub mod alarm;
pub mod error;
pub mod events;
pub mod screen;
pub mod storage;
pub mod timer;

pub use alarm::{AlarmPlayer, AlarmPool, ClipSettings, ClipSink, StreamHandle, TerminalBell};
pub use error::{AlarmError, ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use screen::{Screen, ScreenMode, ScreenMsg, ScreenSettings, ScreenState, View};
pub use storage::Config;
pub use timer::{
    format_hms, select, CountdownEngine, CountdownHandle, CountdownState, DialDuration, TimeUnit,
};
