use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use powermeter_insight::{
    calibrate_log, generate_samples, integrate_log, print, smooth_log, CalibrationConfig, Calibrator,
    EnergyConfig, EnergyIntegrator, MedianFilter, Pipeline, PowermeterConfig, RecordReader, RecordWriter,
    SimulationConfig,
};

/// Power meter log processing
#[derive(Parser, Debug)]
#[command(author, version, about = "Calibrate, smooth and integrate two-channel power meter logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a raw log (time,channelA,channelB) to current, voltage and power
    #[command(allow_negative_numbers = true)]
    Calibrate {
        /// Raw log file
        file: PathBuf,
        #[command(flatten)]
        calibration: CalibrationArgs,
        /// Write records here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Median-filter current, voltage and time of a calibrated file
    Median {
        /// Calibrated file
        file: PathBuf,
        /// Number of samples in the median window
        window_size: usize,
        /// Write records here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Integrate power of a calibrated file between two offset times (inclusive)
    #[command(allow_negative_numbers = true)]
    Energy {
        /// Calibrated file
        file: PathBuf,
        /// Start of the interval (offset time)
        start: i64,
        /// End of the interval (offset time)
        end: i64,
    },
    /// Calibrate, optionally smooth, and integrate a raw log in one pass
    #[command(allow_negative_numbers = true)]
    Pipeline {
        /// Raw log file
        file: PathBuf,
        /// Start of the interval (offset time)
        start: i64,
        /// End of the interval (offset time)
        end: i64,
        /// Integrate the median-filtered signal with this window size
        #[arg(short, long)]
        window: Option<usize>,
        #[command(flatten)]
        calibration: CalibrationArgs,
    },
    /// Write a synthetic raw log
    Simulate {
        /// Number of samples
        #[arg(short = 'n', long, default_value_t = 1000)]
        samples: usize,
        /// Sampling frequency in Hz
        #[arg(short = 'F', long, default_value_t = 1000.0)]
        frequency: f64,
        /// First timestamp in ns
        #[arg(long, default_value_t = 0)]
        start_time: i64,
        /// Seed for reproducible logs
        #[arg(long)]
        seed: Option<u64>,
        /// Write samples here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CalibrationArgs {
    /// TOML file with a [calibration] table
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    current_offset: Option<f64>,
    #[arg(long)]
    current_scale: Option<f64>,
    #[arg(long)]
    voltage_offset: Option<f64>,
    #[arg(long)]
    voltage_scale: Option<f64>,
}

impl CalibrationArgs {
    /// File values first, then command-line overrides.
    fn resolve(&self) -> anyhow::Result<CalibrationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                PowermeterConfig::load(path)
                    .with_context(|| format!("Failed to load configuration {}", path.display()))?
                    .calibration
            }
            None => CalibrationConfig::default(),
        };

        if let Some(v) = self.current_offset {
            config.current_offset = v;
        }
        if let Some(v) = self.current_scale {
            config.current_scale = v;
        }
        if let Some(v) = self.voltage_offset {
            config.voltage_offset = v;
        }
        if let Some(v) = self.voltage_scale {
            config.voltage_scale = v;
        }

        PowermeterConfig { calibration: config }.validate()?;
        Ok(config)
    }
}

fn open_reader(path: &Path) -> anyhow::Result<RecordReader<File>> {
    RecordReader::from_path(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<RecordWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(RecordWriter::from_writer(sink))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Calibrate {
            file,
            calibration,
            output,
        } => {
            let config = calibration.resolve()?;
            print::print_calibration(&config);

            let mut calibrator = Calibrator::new(config);
            let mut writer = open_writer(output.as_deref())?;
            calibrate_log(open_reader(&file)?, &mut writer, &mut calibrator)
                .with_context(|| format!("Failed to calibrate {}", file.display()))?;

            print::print_sampling(calibrator.stats());
        }
        Command::Median {
            file,
            window_size,
            output,
        } => {
            let mut filter = MedianFilter::new(window_size)?;
            let mut writer = open_writer(output.as_deref())?;
            let read = smooth_log(open_reader(&file)?, &mut writer, &mut filter)
                .with_context(|| format!("Failed to smooth {}", file.display()))?;

            print::print_smoothing(window_size, read, writer.written());
        }
        Command::Energy { file, start, end } => {
            let config = EnergyConfig::new(start, end);
            let mut integrator = EnergyIntegrator::new(config);
            let energy = integrate_log(open_reader(&file)?, &mut integrator)
                .with_context(|| format!("Failed to integrate {}", file.display()))?;

            print::print_energy(&config, integrator.samples(), energy);
            println!("{}", print::energy_report(energy));
        }
        Command::Pipeline {
            file,
            start,
            end,
            window,
            calibration,
        } => {
            let calibration = calibration.resolve()?;
            print::print_calibration(&calibration);

            let energy_config = EnergyConfig::new(start, end);
            let mut pipeline = Pipeline::new(calibration, energy_config);
            if let Some(window_size) = window {
                pipeline = pipeline.with_median_filter(window_size)?;
            }

            let report = pipeline
                .run(open_reader(&file)?)
                .with_context(|| format!("Failed to process {}", file.display()))?;

            print::print_pipeline(&energy_config, &report);
            println!("{}", print::energy_report(report.energy));
        }
        Command::Simulate {
            samples,
            frequency,
            start_time,
            seed,
            output,
        } => {
            if !(frequency.is_finite() && frequency > 0.0) {
                anyhow::bail!("sampling frequency must be positive, got {}", frequency);
            }

            let config = SimulationConfig {
                samples,
                sampling_frequency: frequency,
                start_time,
                seed,
                ..Default::default()
            };

            let mut writer = open_writer(output.as_deref())?;
            for sample in generate_samples(&config) {
                writer.write_raw(&sample)?;
            }
            writer.flush()?;

            log::info!("Simulated {} samples at {} Hz", writer.written(), frequency);
        }
    }

    Ok(())
}
