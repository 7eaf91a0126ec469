use embedded_hal_0_2::blocking::i2c::{Read, Write};
use ::ina219::INA219;

use super::{counts_to_amps, CurrentSource};
use crate::config::SensorConfig;
use crate::error::InitError;

/// Charge current from an INA219 on the 0.1 ohm shunt.
pub struct Ina219Current<I2C> {
    ina: INA219<I2C>,
    config: SensorConfig,
}

impl<I2C, E> Ina219Current<I2C>
where
    I2C: Write<Error = E> + Read<Error = E>,
    E: std::fmt::Debug,
{
    /// Writes the calibration register. The chip not acknowledging it means it is not there.
    pub fn new(i2c: I2C, config: &SensorConfig) -> Result<Self, InitError> {
        let mut ina = INA219::new(i2c, config.ina219_address);
        ina.calibrate(config.ina219_calibration)
            .map_err(|e| InitError::CurrentSensor(format!("{e:?}")))?;

        Ok(Self {
            ina,
            config: *config,
        })
    }
}

impl<I2C, E> CurrentSource for Ina219Current<I2C>
where
    I2C: Write<Error = E> + Read<Error = E>,
    E: std::fmt::Debug,
{
    type Error = E;

    fn read_current(&mut self) -> Result<f32, Self::Error> {
        let raw = self.ina.current()?;
        Ok(counts_to_amps(raw, &self.config))
    }
}
