use thiserror::Error;

/// Faults raised while bringing up the charger hardware. Any of them stops the firmware.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to set up PWM output: {0}")]
    Pwm(String),
    #[error("Failed to set up I2C bus: {0}")]
    Bus(String),
    #[error("Failed to initialize ADS. ({0})")]
    Adc(String),
    #[error("Failed to find INA219 chip ({0})")]
    CurrentSensor(String),
}

/// A sensor read that failed during a control tick.
#[derive(Debug, Error)]
pub enum SampleError<VE, CE> {
    #[error("voltage read failed: {0:?}")]
    Voltage(VE),
    #[error("current read failed: {0:?}")]
    Current(CE),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_errors_keep_console_wording() {
        let adc = InitError::Adc("I2C NACK".to_owned());
        assert_eq!(adc.to_string(), "Failed to initialize ADS. (I2C NACK)");

        let ina = InitError::CurrentSensor("timeout".to_owned());
        assert!(ina.to_string().starts_with("Failed to find INA219 chip"));
    }
}
