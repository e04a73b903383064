//! Sliding-window median filter over calibrated records.
//!
//! Current, voltage and offset time each get their own window. Once the windows
//! are full, every new record first emits the medians of the windows as they
//! are, then the oldest entries are dropped and the new record is appended. The
//! record that triggers an emission is therefore only part of the next one.

use std::collections::VecDeque;

use super::error::{PowermeterError, Result};
use super::power::calculate_power_from_current_and_voltage;
use super::types::{CalibratedRecord, SmoothedRecord};

/// Median of a set of values; the mean of the two middle values for even counts.
pub fn median<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().copied().collect();
    if sorted.is_empty() {
        return None;
    }

    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[derive(Debug, Clone)]
pub struct MedianFilter {
    window_size: usize,
    current_window: VecDeque<f64>,
    voltage_window: VecDeque<f64>,
    time_window: VecDeque<f64>,
}

impl MedianFilter {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(PowermeterError::Config(format!(
                "median window size must be at least 1, got {}",
                window_size
            )));
        }

        Ok(Self {
            window_size,
            current_window: VecDeque::with_capacity(window_size),
            voltage_window: VecDeque::with_capacity(window_size),
            time_window: VecDeque::with_capacity(window_size),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.current_window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_window.is_empty()
    }

    fn is_ready(&self) -> bool {
        self.current_window.len() >= self.window_size
            && self.voltage_window.len() >= self.window_size
            && self.time_window.len() >= self.window_size
    }

    /// Feed one record; returns the medians of the window as it was before this record.
    pub fn push(&mut self, record: &CalibratedRecord) -> Option<SmoothedRecord> {
        let emitted = if self.is_ready() {
            let smoothed = self.window_medians();

            self.current_window.pop_front();
            self.voltage_window.pop_front();
            self.time_window.pop_front();

            smoothed
        } else {
            log::trace!("Median window filling: {}/{}", self.len() + 1, self.window_size);
            None
        };

        self.current_window.push_back(record.current);
        self.voltage_window.push_back(record.voltage);
        self.time_window.push_back(record.offset_time as f64);

        emitted
    }

    fn window_medians(&self) -> Option<SmoothedRecord> {
        let current = median(&self.current_window)?;
        let voltage = median(&self.voltage_window)?;
        let time = median(&self.time_window)?;

        Some(SmoothedRecord {
            time,
            current,
            voltage,
            power: calculate_power_from_current_and_voltage(current, voltage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(offset_time: i64, current: f64, voltage: f64) -> CalibratedRecord {
        CalibratedRecord {
            time: offset_time,
            channel_a: 0.0,
            channel_b: 0.0,
            current,
            voltage,
            power: current * voltage,
            offset_time,
        }
    }

    fn run(filter: &mut MedianFilter, records: &[CalibratedRecord]) -> Vec<SmoothedRecord> {
        records.iter().filter_map(|r| filter.push(r)).collect()
    }

    #[test]
    fn median_of_odd_and_even_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[] as &[f64]), None);
    }

    #[test]
    fn rejects_zero_window() {
        assert!(matches!(MedianFilter::new(0), Err(PowermeterError::Config(_))));
    }

    #[test]
    fn emits_pre_insertion_window() {
        let mut filter = MedianFilter::new(3).unwrap();
        let input = [
            record(0, 1.0, 1.0),
            record(1, 2.0, 2.0),
            record(2, 3.0, 3.0),
            record(3, 4.0, 4.0),
        ];

        assert_eq!(filter.push(&input[0]), None);
        assert_eq!(filter.push(&input[1]), None);
        assert_eq!(filter.push(&input[2]), None);

        let smoothed = filter.push(&input[3]).unwrap();
        assert_eq!(smoothed.time, 1.0);
        assert_eq!(smoothed.current, 2.0);
        assert_eq!(smoothed.voltage, 2.0);
        assert_eq!(smoothed.power, 4.0);
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn window_of_one_delays_by_one_record() {
        let mut filter = MedianFilter::new(1).unwrap();
        let input: Vec<CalibratedRecord> = (0..5)
            .map(|i| record(i * 10, i as f64 + 0.5, 2.0 * i as f64))
            .collect();

        let output = run(&mut filter, &input);

        assert_eq!(output.len(), input.len() - 1);
        for (out, inp) in output.iter().zip(input.iter()) {
            assert_eq!(out.time, inp.offset_time as f64);
            assert_eq!(out.current, inp.current);
            assert_eq!(out.voltage, inp.voltage);
        }
    }

    #[test]
    fn output_count_for_stream_length() {
        for window_size in 1..6 {
            for n in 0..12 {
                let mut filter = MedianFilter::new(window_size).unwrap();
                let input: Vec<CalibratedRecord> =
                    (0..n).map(|i| record(i, i as f64, i as f64)).collect();
                let output = run(&mut filter, &input);
                assert_eq!(output.len(), (n as usize).saturating_sub(window_size));
            }
        }
    }

    #[test]
    fn suppresses_single_spike() {
        let mut filter = MedianFilter::new(3).unwrap();
        let input = [
            record(0, 5.0, 230.0),
            record(1, 5.0, 230.0),
            record(2, 500.0, 230.0),
            record(3, 5.0, 230.0),
            record(4, 5.0, 230.0),
            record(5, 5.0, 230.0),
        ];

        let output = run(&mut filter, &input);

        assert_eq!(output.len(), 3);
        assert!(output.iter().all(|s| s.current == 5.0));
        assert!(output.iter().all(|s| s.power == 5.0 * 230.0));
    }

    #[test]
    fn even_window_averages_middle_values() {
        let mut filter = MedianFilter::new(2).unwrap();
        let input = [record(0, 1.0, 10.0), record(3, 2.0, 20.0), record(4, 9.0, 9.0)];

        let output = run(&mut filter, &input);

        assert_eq!(output.len(), 1);
        assert_eq!(output[0].time, 1.5);
        assert_eq!(output[0].current, 1.5);
        assert_eq!(output[0].voltage, 15.0);
        assert_eq!(output[0].power, 22.5);
    }
}
