use crate::config::MpptConfig;
use crate::telemetry::{Sample, Telemetry};

pub mod po;

/// Perturb and observe tracker state. Lives for the whole run of the firmware.
#[derive(Debug, Clone)]
pub struct Mppt {
    config: MpptConfig,

    voltage_old: f32,
    power_old: f32,
    output: f32,
}

impl Mppt {
    pub fn new(config: MpptConfig) -> Self {
        Self {
            output: config.initial_duty.clamp(config.min_duty, config.max_duty),
            config,

            voltage_old: 0.0,
            power_old: 0.0,
        }
    }

    pub fn config(&self) -> &MpptConfig {
        &self.config
    }

    pub fn duty(&self) -> f32 {
        self.output
    }

    pub fn previous_voltage(&self) -> f32 {
        self.voltage_old
    }

    pub fn previous_power(&self) -> f32 {
        self.power_old
    }

    /// Runs one tick and returns the new duty cycle.
    pub fn step(&mut self, voltage: f32, current: f32) -> f32 {
        self.update(Sample { voltage, current }).duty
    }

    /// Runs one tick and returns what the tick used and produced.
    ///
    /// With a zero duty cycle the stage draws no power, so the sample is treated as zero
    /// regardless of what the sensors report. The previous voltage and power are refreshed on
    /// every tick, including ticks inside the dead-band.
    pub fn update(&mut self, sample: Sample) -> Telemetry {
        let sample = if self.output == 0.0 {
            Sample::default()
        } else {
            sample
        };
        let power = sample.power();

        self.output = po::iteration(
            self.output,
            sample.voltage,
            power,
            self.voltage_old,
            self.power_old,
            &self.config,
        );

        self.voltage_old = sample.voltage;
        self.power_old = power;

        Telemetry {
            voltage: sample.voltage,
            current: sample.current,
            power,
            duty: self.output,
        }
    }
}

impl Default for Mppt {
    fn default() -> Self {
        Self::new(MpptConfig::DEFAULT)
    }
}
