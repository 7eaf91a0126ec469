use embedded_hal_0_2::blocking::delay::DelayMs;

use crate::error::SampleError;
use crate::mppt::Mppt;
use crate::pwm::PwmActuator;
use crate::sensors::{CurrentSource, VoltageSource};
use crate::telemetry::{Sample, Telemetry};

/// The control loop: sample the panel, update the tracker, drive the power stage.
pub struct Charger<V, C, P> {
    voltage: V,
    current: C,
    pwm: P,
    mppt: Mppt,
}

impl<V, C, P> Charger<V, C, P>
where
    V: VoltageSource,
    C: CurrentSource,
    P: PwmActuator,
{
    pub fn new(voltage: V, current: C, pwm: P, mppt: Mppt) -> Self {
        Self {
            voltage,
            current,
            pwm,
            mppt,
        }
    }

    pub fn mppt(&self) -> &Mppt {
        &self.mppt
    }

    pub fn sample(&mut self) -> Result<Sample, SampleError<V::Error, C::Error>> {
        let voltage = self
            .voltage
            .read_voltage()
            .map_err(SampleError::Voltage)?;
        let current = self
            .current
            .read_current()
            .map_err(SampleError::Current)?;
        Ok(Sample { voltage, current })
    }

    /// Runs one control tick. A failed sensor read leaves the tracker and the output as
    /// they were.
    pub fn tick(&mut self) -> Result<Telemetry, SampleError<V::Error, C::Error>> {
        let sample = self.sample()?;
        let telemetry = self.mppt.update(sample);

        if let Err(e) = self.pwm.set_duty_cycle(telemetry.duty) {
            log::warn!("Failed to set duty cycle {:.5}: {e:?}", telemetry.duty);
        }

        Ok(telemetry)
    }

    pub fn run(mut self, delay: &mut impl DelayMs<u32>, period_ms: u32) -> ! {
        log::info!(
            "Tracking with {:?}, tick every {period_ms} ms",
            self.mppt.config()
        );

        loop {
            match self.tick() {
                Ok(telemetry) => println!("{telemetry}"),
                Err(e) => log::warn!("Skipping tick: {e}"),
            }

            delay.delay_ms(period_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Result<f32, &'static str>>);

    impl Scripted {
        fn new(values: &[Result<f32, &'static str>]) -> Self {
            Self(values.iter().copied().collect())
        }
    }

    impl VoltageSource for Scripted {
        type Error = &'static str;

        fn read_voltage(&mut self) -> Result<f32, Self::Error> {
            self.0.pop_front().unwrap_or(Err("script exhausted"))
        }
    }

    impl CurrentSource for Scripted {
        type Error = &'static str;

        fn read_current(&mut self) -> Result<f32, Self::Error> {
            self.0.pop_front().unwrap_or(Err("script exhausted"))
        }
    }

    #[derive(Default)]
    struct Recorder {
        duties: Vec<f32>,
    }

    impl PwmActuator for Recorder {
        type Error = ();

        fn set_duty_cycle(&mut self, fraction: f32) -> Result<(), Self::Error> {
            self.duties.push(fraction);
            Ok(())
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn ticks_drive_pwm_with_tracker_output() {
        let mut voltage = Scripted::new(&[Ok(10.0), Ok(8.0)]);
        let mut current = Scripted::new(&[Ok(1.0), Ok(1.0)]);
        let mut pwm = Recorder::default();
        let mut charger = Charger::new(&mut voltage, &mut current, &mut pwm, Mppt::default());

        let first = charger.tick().unwrap();
        assert_eq!(first.power, 10.0);
        assert!(close(first.duty, 0.49));

        let second = charger.tick().unwrap();
        assert_eq!(second.power, 8.0);
        assert!(close(second.duty, 0.48));

        drop(charger);
        assert_eq!(pwm.duties.len(), 2);
        assert!(close(pwm.duties[0], 0.49));
        assert!(close(pwm.duties[1], 0.48));
    }

    #[test]
    fn failed_read_skips_tick() {
        let mut voltage = Scripted::new(&[Ok(10.0), Err("nack"), Ok(8.0)]);
        let mut current = Scripted::new(&[Ok(1.0), Ok(1.0)]);
        let mut pwm = Recorder::default();
        let mut charger = Charger::new(&mut voltage, &mut current, &mut pwm, Mppt::default());

        charger.tick().unwrap();
        let err = charger.tick().unwrap_err();
        assert!(matches!(err, SampleError::Voltage("nack")));
        assert!(close(charger.mppt().duty(), 0.49));
        assert_eq!(charger.mppt().previous_voltage(), 10.0);

        // The current reading meant for the skipped tick was never taken.
        let third = charger.tick().unwrap();
        assert!(close(third.duty, 0.48));

        drop(charger);
        assert_eq!(pwm.duties.len(), 2);
    }

    #[test]
    fn failed_current_read_is_reported() {
        let mut voltage = Scripted::new(&[Ok(10.0)]);
        let mut current = Scripted::new(&[Err("timeout")]);
        let mut charger = Charger::new(
            &mut voltage,
            &mut current,
            Recorder::default(),
            Mppt::default(),
        );

        let err = charger.tick().unwrap_err();
        assert_eq!(err.to_string(), "current read failed: \"timeout\"");
        assert_eq!(charger.mppt().duty(), 0.5);
    }
}
