/// Tuning of the perturb and observe tracker.
///
/// The duty bounds and the sign convention used by [`crate::mppt::po`] belong to the
/// converter topology on the charger board. The 0.9 cap keeps a minimum off-time in the
/// power stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MpptConfig {
    /// Duty cycle the tracker starts from after a reset.
    pub initial_duty: f32,
    /// Duty change applied by one perturbation.
    pub step: f32,
    /// Power changes (in watts) at or below this magnitude do not perturb the duty cycle.
    pub dead_band: f32,
    pub min_duty: f32,
    pub max_duty: f32,
}

impl MpptConfig {
    pub const DEFAULT: Self = Self {
        initial_duty: 0.5,
        step: 0.01,
        dead_band: 0.001,
        min_duty: 0.0,
        max_duty: 0.9,
    };
}

impl Default for MpptConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmConfig {
    pub frequency_hz: u32,
    pub resolution_bits: u8,
}

impl PwmConfig {
    pub const DEFAULT: Self = Self {
        frequency_hz: 10_000,
        resolution_bits: 8,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// ADS1115 scale at the +/-6.144V full scale range (gain 2/3).
    pub volts_per_count: f32,
    pub ina219_address: u8,
    /// Value written to the INA219 calibration register. 8192 with the 0.1 ohm shunt gives
    /// the 16V / 400mA preset.
    pub ina219_calibration: u16,
    pub ina219_milliamps_per_count: f32,
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        volts_per_count: 0.1875 * 0.001,
        ina219_address: 0x40,
        ina219_calibration: 8192,
        ina219_milliamps_per_count: 0.05,
    };
}

/// Time between two control ticks.
pub const TICK_PERIOD_MS: u32 = match option_env!("MPPT_TICK_PERIOD_MS") {
    Some(value) => konst::result::unwrap_ctx!(konst::primitive::parse_u32(value)),
    None => 1000,
};

/// Pause after bringing up the serial console and after each sensor during startup.
pub const SETTLE_DELAY_MS: u32 = match option_env!("MPPT_SETTLE_DELAY_MS") {
    Some(value) => konst::result::unwrap_ctx!(konst::primitive::parse_u32(value)),
    None => 1000,
};

const _: () = assert!(TICK_PERIOD_MS > 0, "MPPT_TICK_PERIOD_MS must be positive");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_matches_charger_board() {
        let config = MpptConfig::default();
        assert_eq!(config.initial_duty, 0.5);
        assert_eq!(config.step, 0.01);
        assert_eq!(config.dead_band, 0.001);
        assert_eq!((config.min_duty, config.max_duty), (0.0, 0.9));
    }

    #[test]
    fn adc_scale_is_in_volts() {
        let volts = 32767.0 * SensorConfig::DEFAULT.volts_per_count;
        assert!((volts - 6.144).abs() < 0.001);
    }
}
