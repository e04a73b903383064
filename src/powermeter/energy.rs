use super::power::{PowerPoint, PowerSample};
use super::types::EnergyConfig;

/*
 * Trapezoid between two consecutive samples of the power curve.
 * The area is in power * time-ticks; the integrator scales the total.
 */
fn trapezoid_area(previous: &PowerPoint, current: &PowerPoint) -> f64 {
    (current.time - previous.time) * (previous.power + current.power) / 2.0
}

/// Trapezoidal integration of power over offset time inside a closed interval.
///
/// Samples outside `[start, end]` are ignored without touching the state, so a
/// gap in the data is bridged by a single trapezoid between the samples on
/// either side of it, as long as both are inside the interval.
#[derive(Debug, Clone)]
pub struct EnergyIntegrator {
    config: EnergyConfig,
    previous: Option<PowerPoint>,
    energy: f64,  // Accumulated area in raw units
    samples: u64, // Samples that fell inside the interval
}

impl EnergyIntegrator {
    pub fn new(config: EnergyConfig) -> Self {
        if config.is_degenerate() {
            log::warn!(
                "Integration interval [{}, {}] is empty, energy will be zero",
                config.start,
                config.end
            );
        }

        Self {
            config,
            previous: None,
            energy: 0.0,
            samples: 0,
        }
    }

    pub fn config(&self) -> &EnergyConfig {
        &self.config
    }

    pub fn push<S: PowerSample>(&mut self, sample: &S) {
        let point = PowerPoint::of(sample);

        if !self.config.contains(point.time) {
            return;
        }

        match self.previous {
            Some(previous) => self.energy += trapezoid_area(&previous, &point),
            None => log::debug!("Entering integration interval at t = {}", point.time),
        }

        self.previous = Some(point);
        self.samples += 1;
    }

    /// Samples that were inside the interval so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Accumulated energy before unit conversion.
    pub fn raw_energy(&self) -> f64 {
        self.energy
    }

    /// Accumulated energy in the reported unit.
    pub fn energy(&self) -> f64 {
        self.energy / self.config.unit_divisor
    }
}

/// Integrate a whole stream of samples.
pub fn integrate_energy<'a, S, I>(samples: I, config: EnergyConfig) -> f64
where
    S: PowerSample + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut integrator = EnergyIntegrator::new(config);
    for sample in samples {
        integrator.push(sample);
    }
    integrator.energy()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(f64, f64)]) -> Vec<PowerPoint> {
        pairs
            .iter()
            .map(|&(time, power)| PowerPoint { time, power })
            .collect()
    }

    #[test]
    fn integrates_triangle() {
        let samples = points(&[(0.0, 10.0), (10.0, 20.0), (20.0, 10.0)]);
        let mut integrator = EnergyIntegrator::new(EnergyConfig::new(0, 20));
        samples.iter().for_each(|s| integrator.push(s));

        assert_eq!(integrator.raw_energy(), 300.0);
        assert_eq!(integrator.energy(), 300.0 / 1e15);
        assert_eq!(integrator.samples(), 3);
    }

    #[test]
    fn bounds_are_inclusive() {
        let samples = points(&[(0.0, 1.0), (5.0, 1.0), (10.0, 1.0), (15.0, 1.0)]);
        let mut integrator = EnergyIntegrator::new(EnergyConfig::new(5, 10));
        samples.iter().for_each(|s| integrator.push(s));

        assert_eq!(integrator.raw_energy(), 5.0);
    }

    #[test]
    fn zero_for_empty_or_single_sample_interval() {
        let samples = points(&[(0.0, 10.0), (10.0, 20.0), (20.0, 10.0)]);

        assert_eq!(integrate_energy(&samples, EnergyConfig::new(30, 40)), 0.0);
        assert_eq!(integrate_energy(&samples, EnergyConfig::new(5, 15)), 0.0);
        assert_eq!(integrate_energy(&samples, EnergyConfig::new(10, 10)), 0.0);
        assert_eq!(integrate_energy(&[] as &[PowerPoint], EnergyConfig::new(0, 10)), 0.0);
    }

    #[test]
    fn reversed_interval_yields_zero() {
        let samples = points(&[(0.0, 10.0), (10.0, 20.0), (20.0, 10.0)]);

        assert_eq!(integrate_energy(&samples, EnergyConfig::new(20, 0)), 0.0);
    }

    #[test]
    fn scales_linearly_with_power() {
        let samples = points(&[(0.0, 3.0), (4.0, 7.5), (9.0, 1.25), (12.0, 6.0)]);
        let scaled: Vec<PowerPoint> = samples
            .iter()
            .map(|p| PowerPoint {
                time: p.time,
                power: p.power * 4.0,
            })
            .collect();

        let config = EnergyConfig::new(0, 12);
        let base = integrate_energy(&samples, config);
        assert_eq!(integrate_energy(&scaled, config), base * 4.0);
    }

    #[test]
    fn bridges_samples_outside_interval() {
        // The sample at t = 25 is outside, the state is not reset by it.
        let samples = points(&[(0.0, 2.0), (25.0, 100.0), (10.0, 2.0)]);
        let mut integrator = EnergyIntegrator::new(EnergyConfig::new(0, 20));
        samples.iter().for_each(|s| integrator.push(s));

        assert_eq!(integrator.raw_energy(), 20.0);
        assert_eq!(integrator.samples(), 2);
    }
}
