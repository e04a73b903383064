mod calibration;
mod config;
mod energy;
mod error;
pub mod generate_signal;
mod median;
mod power;
pub mod print;
mod processing;
pub mod records;
mod types;

pub use calibration::{channel_to_current, channel_to_voltage, Calibrator};
pub use config::PowermeterConfig;
pub use energy::{integrate_energy, EnergyIntegrator};
pub use error::{PowermeterError, Result};
pub use generate_signal::{generate_samples, SimulationConfig};
pub use median::{median, MedianFilter};
pub use power::{PowerPoint, PowerSample};
pub use processing::{calibrate_log, integrate_log, smooth_log, Pipeline, PipelineReport};
pub use records::{RecordReader, RecordWriter};
pub use types::*;
