/// Output stage driven by a duty cycle fraction.
pub trait PwmActuator {
    type Error: std::fmt::Debug;

    /// Sets the fraction of the PWM period the output is high. Values outside [0, 1] are
    /// clamped. Writing the same fraction again leaves the output as it was.
    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), Self::Error>;
}

impl<T: PwmActuator + ?Sized> PwmActuator for &mut T {
    type Error = T::Error;

    fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), Self::Error> {
        (**self).set_duty_cycle(fraction)
    }
}

/// Compare value for `fraction` at the given timer resolution.
pub fn duty_counts(fraction: f32, resolution_bits: u8) -> u32 {
    let max = (1u32 << resolution_bits) - 1;
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (fraction * max as f32).round() as u32
}

#[cfg(target_os = "espidf")]
pub use ledc::LedcPwm;

#[cfg(target_os = "espidf")]
mod ledc {
    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::ledc::{config::TimerConfig, LedcChannel, LedcDriver, LedcTimer, LedcTimerDriver};
    use esp_idf_hal::ledc::Resolution;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::prelude::*;
    use esp_idf_sys::EspError;

    use super::{duty_counts, PwmActuator};
    use crate::config::PwmConfig;
    use crate::error::InitError;

    /// Duty cycle output on an LEDC channel.
    pub struct LedcPwm<'d> {
        driver: LedcDriver<'d>,
        resolution_bits: u8,
    }

    impl<'d> LedcPwm<'d> {
        /// Starts the timer and channel with the output held low.
        pub fn new<C: LedcChannel, T: LedcTimer>(
            channel: impl Peripheral<P = C> + 'd,
            timer: impl Peripheral<P = T> + 'd,
            pin: impl Peripheral<P = impl OutputPin> + 'd,
            config: &PwmConfig,
        ) -> Result<Self, InitError> {
            let resolution = match config.resolution_bits {
                8 => Resolution::Bits8,
                10 => Resolution::Bits10,
                12 => Resolution::Bits12,
                bits => return Err(InitError::Pwm(format!("unsupported resolution {bits}"))),
            };

            let timer = LedcTimerDriver::new(
                timer,
                &TimerConfig::new()
                    .frequency(config.frequency_hz.Hz().into())
                    .resolution(resolution),
            )
            .map_err(|e| InitError::Pwm(e.to_string()))?;

            let mut driver = LedcDriver::new(channel, timer, pin)
                .map_err(|e| InitError::Pwm(e.to_string()))?;
            driver
                .set_duty(0)
                .map_err(|e| InitError::Pwm(e.to_string()))?;

            Ok(Self {
                driver,
                resolution_bits: config.resolution_bits,
            })
        }
    }

    impl PwmActuator for LedcPwm<'_> {
        type Error = EspError;

        fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), Self::Error> {
            let duty = duty_counts(fraction, self.resolution_bits).min(self.driver.get_max_duty());
            self.driver.set_duty(duty)
        }
    }
}
