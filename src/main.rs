use solar_mppt_charger::config::{MpptConfig, TICK_PERIOD_MS};
use solar_mppt_charger::fault;

#[cfg(target_os = "espidf")]
use esp_idf_sys as _; // If using the `binstart` feature of `esp-idf-sys`, always keep this module imported

#[cfg(target_os = "espidf")]
mod board {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use solar_mppt_charger::charger::Charger;
    use solar_mppt_charger::config::{MpptConfig, PwmConfig, SensorConfig, SETTLE_DELAY_MS};
    use solar_mppt_charger::error::InitError;
    use solar_mppt_charger::mppt::Mppt;
    use solar_mppt_charger::pwm::LedcPwm;
    use solar_mppt_charger::sensors::{Ads1115Voltage, Ina219Current};

    pub type BoardCharger = Charger<
        Ads1115Voltage<I2cDriver<'static>>,
        Ina219Current<I2cDriver<'static>>,
        LedcPwm<'static>,
    >;

    /// Brings up the PWM output (GPIO5), the ADS1115 on I2C0 (SDA 21, SCL 22) and the INA219
    /// on I2C1 (SDA 33, SCL 32).
    pub fn start(peripherals: Peripherals, mppt: MpptConfig) -> Result<BoardCharger, InitError> {
        let pwm = LedcPwm::new(
            peripherals.ledc.channel0,
            peripherals.ledc.timer0,
            peripherals.pins.gpio5,
            &PwmConfig::DEFAULT,
        )?;

        let config = I2cConfig::new().baudrate(400.kHz().into());

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21,
            peripherals.pins.gpio22,
            &config,
        )
        .map_err(|e| InitError::Bus(e.to_string()))?;
        let voltage = Ads1115Voltage::new(i2c, &SensorConfig::DEFAULT)?;
        log::info!("ADS1115 ready");
        FreeRtos::delay_ms(SETTLE_DELAY_MS);

        let i2c = I2cDriver::new(
            peripherals.i2c1,
            peripherals.pins.gpio33,
            peripherals.pins.gpio32,
            &config,
        )
        .map_err(|e| InitError::Bus(e.to_string()))?;
        let current = Ina219Current::new(i2c, &SensorConfig::DEFAULT)?;
        log::info!("INA219 ready");
        FreeRtos::delay_ms(SETTLE_DELAY_MS);

        Ok(Charger::new(voltage, current, pwm, Mppt::new(mppt)))
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::peripherals::Peripherals;

    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    fault::install_panic_hook();

    // Give the serial console time to come up
    FreeRtos::delay_ms(solar_mppt_charger::config::SETTLE_DELAY_MS);

    let Some(peripherals) = Peripherals::take() else {
        fault::fail_stop(&solar_mppt_charger::error::InitError::Bus(
            "peripherals already taken".to_owned(),
        ));
    };

    match board::start(peripherals, MpptConfig::DEFAULT) {
        Ok(charger) => charger.run(&mut FreeRtos, TICK_PERIOD_MS),
        Err(e) => fault::fail_stop(&e),
    }
}

/// Runs the control loop against the simulated panel.
#[cfg(not(target_os = "espidf"))]
fn main() {
    use solar_mppt_charger::charger::Charger;
    use solar_mppt_charger::mppt::Mppt;
    use solar_mppt_charger::sim;

    fault::install_panic_hook();

    let bench = sim::Bench::default();
    let charger = Charger::new(&bench, &bench, &bench, Mppt::new(MpptConfig::DEFAULT));
    charger.run(&mut sim::ThreadDelay, TICK_PERIOD_MS)
}
