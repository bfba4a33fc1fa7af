//! Dial selector: turns vertical gestures into clamped hour/minute/second
//! values and freezes them into a millisecond duration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Steps per pixel of vertical drag.
pub const SCROLL_SENSITIVITY: f64 = 0.05;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 3] = [TimeUnit::Hour, TimeUnit::Minute, TimeUnit::Second];

    /// Largest value the dial for this unit can show.
    pub fn max(self) -> u32 {
        match self {
            TimeUnit::Hour => 23,
            TimeUnit::Minute | TimeUnit::Second => 59,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
            TimeUnit::Second => "second",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeUnit::Hour => TimeUnit::Minute,
            TimeUnit::Minute => TimeUnit::Second,
            TimeUnit::Second => TimeUnit::Hour,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TimeUnit::Hour => TimeUnit::Second,
            TimeUnit::Minute => TimeUnit::Hour,
            TimeUnit::Second => TimeUnit::Minute,
        }
    }
}

/// Map a raw drag delta onto a dial value using [`SCROLL_SENSITIVITY`].
///
/// A negative delta (dragging upward) increases the value.
pub fn select(current: u32, raw_delta: f64, unit_max: u32) -> u32 {
    select_with(current, raw_delta, unit_max, SCROLL_SENSITIVITY)
}

/// Same as [`select`] with an explicit sensitivity.
///
/// The step is truncated toward zero, so small deltas do nothing. The
/// result always lands in `[0, unit_max]`.
pub fn select_with(current: u32, raw_delta: f64, unit_max: u32, sensitivity: f64) -> u32 {
    let scaled = -raw_delta * sensitivity;
    if !scaled.is_finite() {
        return current.min(unit_max);
    }
    // `as` saturates, so huge deltas still clamp correctly below.
    let step = scaled.trunc() as i64;
    let value = i64::from(current).saturating_add(step);
    value.clamp(0, i64::from(unit_max)) as u32
}

/// The three dial values selected on the idle screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialDuration {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DialDuration {
    /// Build a duration, rejecting values a dial could never show.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ValidationError> {
        let dial = Self {
            hour,
            minute,
            second,
        };
        for unit in TimeUnit::ALL {
            let value = dial.get(unit);
            if value > unit.max() {
                return Err(ValidationError::OutOfRange {
                    unit: unit.title(),
                    value,
                    max: unit.max(),
                });
            }
        }
        Ok(dial)
    }

    pub fn get(&self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Hour => self.hour,
            TimeUnit::Minute => self.minute,
            TimeUnit::Second => self.second,
        }
    }

    fn slot(&mut self, unit: TimeUnit) -> &mut u32 {
        match unit {
            TimeUnit::Hour => &mut self.hour,
            TimeUnit::Minute => &mut self.minute,
            TimeUnit::Second => &mut self.second,
        }
    }

    /// Apply a drag gesture to one unit. Returns the new value.
    pub fn scroll(&mut self, unit: TimeUnit, raw_delta: f64, sensitivity: f64) -> u32 {
        let slot = self.slot(unit);
        *slot = select_with(*slot, raw_delta, unit.max(), sensitivity);
        *slot
    }

    /// Move one unit by whole steps, clamped to its range.
    pub fn nudge(&mut self, unit: TimeUnit, steps: i32) -> u32 {
        let slot = self.slot(unit);
        let value = i64::from(*slot) + i64::from(steps);
        *slot = value.clamp(0, i64::from(unit.max())) as u32;
        *slot
    }

    pub fn total_ms(&self) -> u64 {
        u64::from(self.hour) * MS_PER_HOUR
            + u64::from(self.minute) * MS_PER_MINUTE
            + u64::from(self.second) * MS_PER_SECOND
    }
}
