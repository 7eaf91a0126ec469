use ads1x1x::ic::{Ads1115, Resolution16Bit};
use ads1x1x::interface::I2cInterface;
use ads1x1x::{channel, mode, Ads1x1x, FullScaleRange, SlaveAddr};
use embedded_hal_0_2::adc::OneShot as _;
use embedded_hal_0_2::blocking::i2c::{Write, WriteRead};

use super::{counts_to_volts, VoltageSource};
use crate::config::SensorConfig;
use crate::error::InitError;

type Adc<I2C> = Ads1x1x<I2cInterface<I2C>, Ads1115, Resolution16Bit, mode::OneShot>;

/// Panel voltage on single-ended channel A0 of an ADS1115 at its default address.
pub struct Ads1115Voltage<I2C> {
    adc: Adc<I2C>,
    config: SensorConfig,
}

impl<I2C, E> Ads1115Voltage<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: std::fmt::Debug,
{
    /// Selects the +/-6.144V range (gain 2/3). This is the first bus transaction, so a
    /// missing chip fails here.
    pub fn new(i2c: I2C, config: &SensorConfig) -> Result<Self, InitError> {
        let mut adc = Ads1x1x::new_ads1115(i2c, SlaveAddr::default());
        adc.set_full_scale_range(FullScaleRange::Within6_144V)
            .map_err(|e| InitError::Adc(format!("{e:?}")))?;

        Ok(Self {
            adc,
            config: *config,
        })
    }
}

impl<I2C, E> VoltageSource for Ads1115Voltage<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: std::fmt::Debug,
{
    type Error = ads1x1x::Error<E>;

    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        let raw = nb::block!(self.adc.read(&mut channel::SingleA0))?;
        Ok(counts_to_volts(raw, &self.config))
    }
}
