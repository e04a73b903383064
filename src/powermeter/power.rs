use super::types::{CalibratedRecord, SmoothedRecord};

pub fn calculate_power_from_current_and_voltage(current: f64, voltage: f64) -> f64 {
    current * voltage
}

/// A point on the power-over-time curve, as consumed by the energy integrator.
pub trait PowerSample {
    fn sample_time(&self) -> f64;
    fn sample_power(&self) -> f64;
}

impl PowerSample for CalibratedRecord {
    fn sample_time(&self) -> f64 {
        self.offset_time as f64
    }

    fn sample_power(&self) -> f64 {
        self.power
    }
}

impl PowerSample for SmoothedRecord {
    fn sample_time(&self) -> f64 {
        self.time
    }

    fn sample_power(&self) -> f64 {
        self.power
    }
}

/// Plain `(time, power)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerPoint {
    pub time: f64,
    pub power: f64,
}

impl PowerPoint {
    pub fn of<S: PowerSample>(sample: &S) -> Self {
        Self {
            time: sample.sample_time(),
            power: sample.sample_power(),
        }
    }
}

impl PowerSample for PowerPoint {
    fn sample_time(&self) -> f64 {
        self.time
    }

    fn sample_power(&self) -> f64 {
        self.power
    }
}
