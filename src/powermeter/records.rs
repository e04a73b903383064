//! Comma-separated record I/O: headerless, one record per line.
//!
//! Raw logs carry `time,channelA,channelB`; calibrated files carry
//! `time,channelA,channelB,current,voltage,power,offsetTime`; smoothed files
//! carry `medianTime,medianCurrent,medianVoltage,medianPower`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use super::error::{PowermeterError, Result};
use super::types::*;

/// Shortest round-trip form, always with a fractional part or exponent (`2.0`, `1e-13`).
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Shortest form of a raw reading; integral readings print without a fraction (`512`).
pub fn format_raw(value: f64) -> String {
    format!("{}", value)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn parse_field<T: FromStr>(record: &StringRecord, field: usize) -> Result<T> {
    let value = record.get(field).unwrap_or_default();
    value.parse().map_err(|_| PowermeterError::Parse {
        line: line_of(record),
        field,
        value: value.to_string(),
    })
}

fn check_width(record: &StringRecord, expected: usize, stage: &'static str) -> Result<()> {
    if record.len() < expected {
        return Err(PowermeterError::Format {
            line: line_of(record),
            found: record.len(),
            expected,
            stage,
        });
    }
    Ok(())
}

/// A missing raw field reads as empty and fails to parse.
pub fn parse_raw_sample(record: &StringRecord) -> Result<RawSample> {
    Ok(RawSample {
        time: parse_field(record, 0)?,
        channel_a: parse_field(record, 1)?,
        channel_b: parse_field(record, 2)?,
    })
}

pub fn parse_calibrated_record(record: &StringRecord) -> Result<CalibratedRecord> {
    check_width(record, CALIBRATED_FIELDS, "calibrate")?;

    Ok(CalibratedRecord {
        time: parse_field(record, 0)?,
        channel_a: parse_field(record, 1)?,
        channel_b: parse_field(record, 2)?,
        current: parse_field(record, 3)?,
        voltage: parse_field(record, 4)?,
        power: parse_field(record, 5)?,
        offset_time: parse_field(record, 6)?,
    })
}

pub struct RecordReader<R> {
    reader: csv::Reader<R>,
}

impl RecordReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(rdr: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(rdr);

        Self { reader }
    }

    pub fn raw_samples(self) -> impl Iterator<Item = Result<RawSample>> {
        self.reader
            .into_records()
            .map(|record| parse_raw_sample(&record?))
    }

    pub fn calibrated_records(self) -> impl Iterator<Item = Result<CalibratedRecord>> {
        self.reader
            .into_records()
            .map(|record| parse_calibrated_record(&record?))
    }
}

pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
    written: u64,
}

impl RecordWriter<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn from_writer(wtr: W) -> Self {
        let writer = WriterBuilder::new().has_headers(false).from_writer(wtr);
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write_raw(&mut self, sample: &RawSample) -> Result<()> {
        self.writer.write_record(&[
            sample.time.to_string(),
            format_raw(sample.channel_a),
            format_raw(sample.channel_b),
        ])?;
        self.written += 1;
        Ok(())
    }

    pub fn write_calibrated(&mut self, record: &CalibratedRecord) -> Result<()> {
        self.writer.write_record(&[
            record.time.to_string(),
            format_raw(record.channel_a),
            format_raw(record.channel_b),
            format_float(record.current),
            format_float(record.voltage),
            format_float(record.power),
            record.offset_time.to_string(),
        ])?;
        self.written += 1;
        Ok(())
    }

    pub fn write_smoothed(&mut self, record: &SmoothedRecord) -> Result<()> {
        self.writer.write_record(&[
            format_float(record.time),
            format_float(record.current),
            format_float(record.voltage),
            format_float(record.power),
        ])?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
