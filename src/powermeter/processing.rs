use std::io::{Read, Write};

use super::{
    calibration::Calibrator,
    energy::EnergyIntegrator,
    error::Result,
    median::MedianFilter,
    records::{RecordReader, RecordWriter},
    types::*,
};

/*
* @brief Calibrate every raw sample of a log and write the calibrated records.
* @param reader Raw log
* @param writer Destination of the 7-field records
* @param calibrator Calibrator owning the run state
*/
pub fn calibrate_log<R: Read, W: Write>(
    reader: RecordReader<R>,
    writer: &mut RecordWriter<W>,
    calibrator: &mut Calibrator,
) -> Result<()> {
    for sample in reader.raw_samples() {
        let record = calibrator.calibrate(&sample?);
        writer.write_calibrated(&record)?;
    }
    writer.flush()
}

/*
* @brief Run the median filter over a calibrated file.
* @param reader Calibrated records
* @param writer Destination of the 4-field records
* @param filter Median filter owning the windows
* @return Number of records read
*/
pub fn smooth_log<R: Read, W: Write>(
    reader: RecordReader<R>,
    writer: &mut RecordWriter<W>,
    filter: &mut MedianFilter,
) -> Result<u64> {
    let mut read = 0;
    for record in reader.calibrated_records() {
        if let Some(smoothed) = filter.push(&record?) {
            writer.write_smoothed(&smoothed)?;
        }
        read += 1;
    }
    writer.flush()?;
    Ok(read)
}

/*
* @brief Integrate power over the interval of the integrator.
* @param reader Calibrated records
* @param integrator Integrator holding the interval and accumulator
* @return Energy in the reported unit
*/
pub fn integrate_log<R: Read>(reader: RecordReader<R>, integrator: &mut EnergyIntegrator) -> Result<f64> {
    for record in reader.calibrated_records() {
        integrator.push(&record?);
    }
    Ok(integrator.energy())
}

/// Result of a full in-memory run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineReport {
    pub energy: f64,
    pub integrated_samples: u64,
    pub smoothed_records: u64,
    pub sampling: SamplingStats,
}

/// Calibration, optional median smoothing and energy integration in one pass.
///
/// Without a filter the integrator sees every calibrated record; with one it
/// only sees the smoothed records, integrated over their median time.
#[derive(Debug, Clone)]
pub struct Pipeline {
    calibrator: Calibrator,
    filter: Option<MedianFilter>,
    integrator: EnergyIntegrator,
    smoothed_records: u64,
}

impl Pipeline {
    pub fn new(calibration: CalibrationConfig, energy: EnergyConfig) -> Self {
        Self {
            calibrator: Calibrator::new(calibration),
            filter: None,
            integrator: EnergyIntegrator::new(energy),
            smoothed_records: 0,
        }
    }

    pub fn with_median_filter(mut self, window_size: usize) -> Result<Self> {
        self.filter = Some(MedianFilter::new(window_size)?);
        Ok(self)
    }

    pub fn push(&mut self, sample: &RawSample) {
        let record = self.calibrator.calibrate(sample);

        match self.filter.as_mut() {
            Some(filter) => {
                if let Some(smoothed) = filter.push(&record) {
                    self.smoothed_records += 1;
                    self.integrator.push(&smoothed);
                }
            }
            None => self.integrator.push(&record),
        }
    }

    pub fn run<R: Read>(mut self, reader: RecordReader<R>) -> Result<PipelineReport> {
        for sample in reader.raw_samples() {
            self.push(&sample?);
        }
        Ok(self.report())
    }

    pub fn report(&self) -> PipelineReport {
        PipelineReport {
            energy: self.integrator.energy(),
            integrated_samples: self.integrator.samples(),
            smoothed_records: self.smoothed_records,
            sampling: *self.calibrator.stats(),
        }
    }
}
