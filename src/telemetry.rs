use std::fmt;

/// One panel reading, in volts and amps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub voltage: f32,
    pub current: f32,
}

impl Sample {
    pub fn power(&self) -> f32 {
        (self.voltage * self.current).abs()
    }
}

/// What a control tick worked with, printed once per tick on the serial console.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub voltage: f32,
    pub current: f32,
    pub power: f32,
    pub duty: f32,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V: {:.5} V, I: {:.5} A, P: {:.5} W, D: {:.5}",
            self.voltage, self.current, self.power, self.duty
        )
    }
}
