use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use super::types::RawSample;

const ADC_MAX: f64 = 4095.0; // 12-bit converter
const NS_PER_SECOND: f64 = 1e9;

const CURRENT_LEVEL: f64 = 1200.0; // Mean raw reading on channel A
const VOLTAGE_LEVEL: f64 = 2400.0; // Mean raw reading on channel B
const LOAD_SWING: f64 = 0.25; // Relative amplitude of the load variation
const LOAD_PERIOD: f64 = 1.0; // Seconds per load cycle
const NOISE_COUNTS: f64 = 8.0; // Uniform noise on both channels (+/- counts)

/// Parameters of a simulated logger run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub samples: usize,
    pub sampling_frequency: f64, // Hz
    pub start_time: i64,         // ns, first timestamp written
    pub current_level: f64,
    pub voltage_level: f64,
    pub load_swing: f64,
    pub noise: f64,
    pub seed: Option<u64>, // Fixed seed for reproducible logs
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            sampling_frequency: 1000.0,
            start_time: 0,
            current_level: CURRENT_LEVEL,
            voltage_level: VOLTAGE_LEVEL,
            load_swing: LOAD_SWING,
            noise: NOISE_COUNTS,
            seed: None,
        }
    }
}

/// Sampling interval in whole nanoseconds, rounded to nearest.
pub fn frequency_to_interval(frequency: f64) -> i64 {
    (NS_PER_SECOND / frequency).round() as i64
}

fn adc_counts(value: f64) -> f64 {
    value.round().clamp(0.0, ADC_MAX)
}

/*
* @brief Generate a raw two-channel log like the one written by the sampling logger.
* @param config Simulation parameters
* @return Raw samples with nanosecond timestamps
* @note Channel A follows a slow sinusoidal load, channel B stays at its level;
*       both get uniform noise and are quantized to the 12-bit ADC range.
*/
pub fn generate_samples(config: &SimulationConfig) -> Vec<RawSample> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let interval = frequency_to_interval(config.sampling_frequency);
    let noise = config.noise.abs();

    (0..config.samples)
        .map(|i| {
            let time = config.start_time + i as i64 * interval;
            let seconds = (i as i64 * interval) as f64 / NS_PER_SECOND;

            let load = 1.0 + config.load_swing * (2.0 * PI * seconds / LOAD_PERIOD).sin();
            let channel_a = config.current_level * load + rng.gen_range(-noise..=noise);
            let channel_b = config.voltage_level + rng.gen_range(-noise..=noise);

            RawSample {
                time,
                channel_a: adc_counts(channel_a),
                channel_b: adc_counts(channel_b),
            }
        })
        .collect()
}
