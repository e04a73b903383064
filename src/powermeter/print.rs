use super::processing::PipelineReport;
use super::records::format_float;
use super::types::{CalibrationConfig, EnergyConfig, SamplingStats};

/// The one-line energy report written to stdout.
pub fn energy_report(energy: f64) -> String {
    format!("energy: {}", format_float(energy))
}

/*
* @brief Print the calibration coefficients in use.
*/
pub fn print_calibration(config: &CalibrationConfig) {
    log::info!("Calibration:");
    log::info!("  Current: {} + raw * {}", config.current_offset, config.current_scale);
    log::info!("  Voltage: {} + raw * {}", config.voltage_offset, config.voltage_scale);
}

/*
* @brief Print the sampling statistics of a calibrated run.
* @note Timestamps are the logger's, in nanoseconds.
*/
pub fn print_sampling(stats: &SamplingStats) {
    log::info!("Sampling:");
    log::info!("  Samples: {}", stats.samples);
    log::info!("  Duration: {} ns", stats.duration());
    log::info!("  Max. sampling interval: {} ns", stats.max_interval);
    if stats.backwards_steps > 0 {
        log::warn!("  Timestamps going backwards: {}", stats.backwards_steps);
    }
}

pub fn print_smoothing(window_size: usize, read: u64, written: u64) {
    log::info!("Median filter:");
    log::info!("  Window size: {}", window_size);
    log::info!("  Records read: {}", read);
    log::info!("  Records written: {}", written);
}

/*
* @brief Print the integration interval and result.
*/
pub fn print_energy(config: &EnergyConfig, samples: u64, energy: f64) {
    log::info!("Energy:");
    log::info!("  Interval: [{}, {}]", config.start, config.end);
    log::info!("  Samples in interval: {}", samples);
    log::info!("  Energy: {}", format_float(energy));
}

pub fn print_pipeline(config: &EnergyConfig, report: &PipelineReport) {
    print_sampling(&report.sampling);
    if report.smoothed_records > 0 {
        log::info!("  Smoothed records: {}", report.smoothed_records);
    }
    print_energy(config, report.integrated_samples, report.energy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_report_format() {
        assert_eq!(energy_report(300.0 / 1e15), "energy: 3e-13");
        assert_eq!(energy_report(0.0), "energy: 0.0");
        assert_eq!(energy_report(1.5), "energy: 1.5");
    }
}
