mod dial;
mod engine;
mod format;

pub use dial::{
    select, select_with, DialDuration, TimeUnit, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
    SCROLL_SENSITIVITY,
};
pub use engine::{CountdownEngine, CountdownHandle, CountdownState, DEFAULT_TICK_INTERVAL};
pub use format::format_hms;
