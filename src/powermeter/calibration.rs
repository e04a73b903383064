use super::power::calculate_power_from_current_and_voltage;
use super::types::{CalibratedRecord, CalibrationConfig, RawSample, SamplingStats};

/*
* @brief Convert a raw current channel reading to current.
* @param raw Raw channel A value
* @param config Calibration coefficients
* @return Current
*/
pub fn channel_to_current(raw: f64, config: &CalibrationConfig) -> f64 {
    config.current_offset + raw * config.current_scale
}

/*
* @brief Convert a raw voltage channel reading to voltage.
* @param raw Raw channel B value
* @param config Calibration coefficients
* @return Voltage
*/
pub fn channel_to_voltage(raw: f64, config: &CalibrationConfig) -> f64 {
    config.voltage_offset + raw * config.voltage_scale
}

/// Calibrates raw samples of one run.
///
/// The first timestamp seen becomes the origin of `offset_time` for the rest of
/// the run. A new run needs a new `Calibrator`.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    config: CalibrationConfig,
    first_time: Option<i64>,
    stats: SamplingStats,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            first_time: None,
            stats: SamplingStats::default(),
        }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn first_time(&self) -> Option<i64> {
        self.first_time
    }

    pub fn stats(&self) -> &SamplingStats {
        &self.stats
    }

    pub fn calibrate(&mut self, sample: &RawSample) -> CalibratedRecord {
        let first_time = *self.first_time.get_or_insert_with(|| {
            log::debug!("First timestamp of run: {}", sample.time);
            sample.time
        });

        self.update_stats(sample.time);

        let current = channel_to_current(sample.channel_a, &self.config);
        let voltage = channel_to_voltage(sample.channel_b, &self.config);

        CalibratedRecord {
            time: sample.time,
            channel_a: sample.channel_a,
            channel_b: sample.channel_b,
            current,
            voltage,
            power: calculate_power_from_current_and_voltage(current, voltage),
            offset_time: sample.time - first_time,
        }
    }

    fn update_stats(&mut self, time: i64) {
        if let Some(last) = self.stats.last_time {
            let interval = time - last;
            if interval < 0 {
                if self.stats.backwards_steps == 0 {
                    log::warn!("Timestamp {} is lower than its predecessor {}", time, last);
                }
                self.stats.backwards_steps += 1;
            } else if interval > self.stats.max_interval {
                self.stats.max_interval = interval;
            }
        } else {
            self.stats.first_time = Some(time);
        }

        self.stats.last_time = Some(time);
        self.stats.samples += 1;
    }
}
