//! Panel and buck stage model for running the control loop away from the board.
//!
//! The panel follows `I = Isc * g * (1 - exp((V - Voc) / a))` where `g` is the irradiance
//! factor. The stage presents `R_load / D^2` to the panel, so a lower duty cycle raises the
//! panel voltage as on the real converter. The operating point is where the panel curve
//! meets that resistance.

use std::cell::Cell;
use std::convert::Infallible;
use std::time::Duration;

use embedded_hal_0_2::blocking::delay::DelayMs;

use crate::pwm::PwmActuator;
use crate::sensors::{CurrentSource, VoltageSource};
use crate::telemetry::Sample;

const BISECTION_STEPS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub short_circuit_current: f32,
    pub open_circuit_voltage: f32,
    /// Sharpness of the knee of the I-V curve, in volts.
    pub knee: f32,
}

impl Panel {
    /// A small 6V / 400mA panel, within range of the ADS1115 and the INA219 preset.
    pub const SMALL: Self = Self {
        short_circuit_current: 0.4,
        open_circuit_voltage: 6.0,
        knee: 0.3,
    };

    pub fn current_at(&self, voltage: f32, irradiance: f32) -> f32 {
        let shape = 1.0 - ((voltage - self.open_circuit_voltage) / self.knee).exp();
        (self.short_circuit_current * irradiance * shape).max(0.0)
    }
}

/// Simulated charger hardware. Implements the sensor and PWM traits on shared references so
/// one bench can be handed to the control loop three times.
#[derive(Debug)]
pub struct Bench {
    panel: Panel,
    load_ohms: f32,
    irradiance: Cell<f32>,
    duty: Cell<f32>,
}

impl Bench {
    pub fn new(panel: Panel, load_ohms: f32) -> Self {
        Self {
            panel,
            load_ohms,
            irradiance: Cell::new(1.0),
            duty: Cell::new(0.0),
        }
    }

    pub fn set_irradiance(&self, irradiance: f32) {
        self.irradiance.set(irradiance.max(0.0));
    }

    pub fn duty(&self) -> f32 {
        self.duty.get()
    }

    pub fn operating_point(&self) -> Sample {
        self.operating_point_at(self.duty.get())
    }

    pub fn operating_point_at(&self, duty: f32) -> Sample {
        let irradiance = self.irradiance.get();
        let voc = self.panel.open_circuit_voltage;

        if duty <= 0.0 {
            return Sample {
                voltage: voc,
                current: 0.0,
            };
        }

        let conductance = duty * duty / self.load_ohms;
        let (mut low, mut high) = (0.0, voc);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (low + high);
            if self.panel.current_at(mid, irradiance) > mid * conductance {
                low = mid;
            } else {
                high = mid;
            }
        }

        let voltage = 0.5 * (low + high);
        Sample {
            voltage,
            current: voltage * conductance,
        }
    }

    /// Best power over a fine duty sweep up to `max_duty`.
    pub fn max_power(&self, max_duty: f32) -> f32 {
        (0..=1000)
            .map(|i| self.operating_point_at(max_duty * i as f32 / 1000.0).power())
            .fold(0.0, f32::max)
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new(Panel::SMALL, 5.0)
    }
}

impl VoltageSource for &Bench {
    type Error = Infallible;

    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        Ok(self.operating_point().voltage)
    }
}

impl CurrentSource for &Bench {
    type Error = Infallible;

    fn read_current(&mut self) -> Result<f32, Self::Error> {
        Ok(self.operating_point().current)
    }
}

impl PwmActuator for &Bench {
    type Error = Infallible;

    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), Self::Error> {
        self.duty.set(fraction.clamp(0.0, 1.0));
        Ok(())
    }
}

/// Blocking delay on the host thread.
pub struct ThreadDelay;

impl DelayMs<u32> for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}
