#[cfg(target_os = "espidf")]
mod ads1115;
#[cfg(target_os = "espidf")]
mod ina219;

#[cfg(target_os = "espidf")]
pub use self::ads1115::Ads1115Voltage;
#[cfg(target_os = "espidf")]
pub use self::ina219::Ina219Current;

use crate::config::SensorConfig;

/// Panel voltage for a raw ADS1115 reading.
pub fn counts_to_volts(raw: i16, config: &SensorConfig) -> f32 {
    raw as f32 * config.volts_per_count
}

/// Charge current for a raw INA219 current register. The register counts in milliamp
/// steps set by the calibration.
pub fn counts_to_amps(raw: i16, config: &SensorConfig) -> f32 {
    raw as f32 * config.ina219_milliamps_per_count / 1000.0
}

/// Panel voltage in volts.
pub trait VoltageSource {
    type Error: std::fmt::Debug;

    fn read_voltage(&mut self) -> Result<f32, Self::Error>;
}

/// Charge current in amps.
pub trait CurrentSource {
    type Error: std::fmt::Debug;

    fn read_current(&mut self) -> Result<f32, Self::Error>;
}

impl<T: VoltageSource + ?Sized> VoltageSource for &mut T {
    type Error = T::Error;

    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        (**self).read_voltage()
    }
}

impl<T: CurrentSource + ?Sized> CurrentSource for &mut T {
    type Error = T::Error;

    fn read_current(&mut self) -> Result<f32, Self::Error> {
        (**self).read_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: SensorConfig = SensorConfig::DEFAULT;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn adc_counts_to_volts() {
        assert_eq!(counts_to_volts(0, &CONFIG), 0.0);
        assert!(close(counts_to_volts(1000, &CONFIG), 0.1875));
        assert!(close(counts_to_volts(32767, &CONFIG), 6.1438));
        assert!(close(counts_to_volts(-100, &CONFIG), -0.01875));
    }

    #[test]
    fn ina219_counts_to_amps() {
        assert_eq!(counts_to_amps(0, &CONFIG), 0.0);
        assert!(close(counts_to_amps(8000, &CONFIG), 0.4));
        assert!(close(counts_to_amps(20, &CONFIG), 0.001));
        assert!(close(counts_to_amps(-2000, &CONFIG), -0.1));
    }
}
