pub mod charger;
pub mod config;
pub mod error;
pub mod fault;
pub mod mppt;
pub mod pwm;
pub mod sensors;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod telemetry;
