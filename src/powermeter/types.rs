use serde::Deserialize;

/* Calibration of the reference power meter (current channel A, voltage channel B) */
pub const CURRENT_OFFSET: f64 = 26.722;
pub const CURRENT_SCALE: f64 = 0.9904;
pub const VOLTAGE_OFFSET: f64 = 6.787;
pub const VOLTAGE_SCALE: f64 = 1.236;

/* Power integrated over nanosecond ticks is divided by this to get the reported energy */
pub const ENERGY_UNIT_DIVISOR: f64 = 1e15;

pub const CALIBRATED_FIELDS: usize = 7;

/// Calibration coefficients for the two meter channels.
///
/// `current = current_offset + channel_a * current_scale` and
/// `voltage = voltage_offset + channel_b * voltage_scale`. The defaults are the
/// coefficients of the reference device; recalibrated devices override them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub current_offset: f64, // Current at raw reading zero
    pub current_scale: f64,  // Current per raw count
    pub voltage_offset: f64, // Voltage at raw reading zero
    pub voltage_scale: f64,  // Voltage per raw count
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            current_offset: CURRENT_OFFSET,
            current_scale: CURRENT_SCALE,
            voltage_offset: VOLTAGE_OFFSET,
            voltage_scale: VOLTAGE_SCALE,
        }
    }
}

/// Closed integration interval over offset time plus the output unit divisor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyConfig {
    pub start: i64,
    pub end: i64,
    pub unit_divisor: f64,
}

impl EnergyConfig {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            unit_divisor: ENERGY_UNIT_DIVISOR,
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start as f64 <= time && time <= self.end as f64
    }

    pub fn is_degenerate(&self) -> bool {
        self.start > self.end
    }
}

/// One line of the logger output: `time,channelA,channelB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub time: i64,      // Timestamp in nanoseconds
    pub channel_a: f64, // Raw current channel reading
    pub channel_b: f64, // Raw voltage channel reading
}

/// A raw sample converted to physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedRecord {
    pub time: i64,
    pub channel_a: f64,
    pub channel_b: f64,
    pub current: f64,
    pub voltage: f64,
    pub power: f64,       // Always current * voltage
    pub offset_time: i64, // time - first time of the run
}

/// Median of one filter window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedRecord {
    pub time: f64, // Median offset time
    pub current: f64,
    pub voltage: f64,
    pub power: f64, // current * voltage of the medians
}

/// Counters collected while calibrating a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplingStats {
    pub samples: u64,
    pub first_time: Option<i64>,
    pub last_time: Option<i64>,
    pub max_interval: i64,    // Largest gap between consecutive timestamps
    pub backwards_steps: u64, // Timestamps lower than their predecessor
}

impl SamplingStats {
    pub fn duration(&self) -> i64 {
        match (self.first_time, self.last_time) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}
