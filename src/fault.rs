use crate::error::InitError;

/// Reports a startup fault on the console and stops. Without working sensors there is no
/// safe duty cycle, so there is no retry.
pub fn fail_stop(error: &InitError) -> ! {
    println!("{error}");
    log::error!("Charger halted: {error}");
    halt()
}

/// Uses rusts `panic_hook` to report a panic on the serial console, then halts instead of
/// letting the device restart.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = if let Some(message) = panic_info.payload().downcast_ref::<&'static str>() {
            (*message).to_owned()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "Unknown panic message".to_owned()
        };

        match panic_info.location() {
            Some(location) => println!(
                "FATAL ERROR ({}:{}:{}): {message}",
                location.file(),
                location.line(),
                location.column(),
            ),
            None => println!("FATAL ERROR: {message}"),
        }

        halt()
    }));
}

#[cfg(target_os = "espidf")]
fn halt() -> ! {
    use esp_idf_hal::delay::FreeRtos;

    // Keep yielding so the idle task watchdog stays quiet.
    loop {
        FreeRtos::delay_ms(1000);
    }
}

#[cfg(not(target_os = "espidf"))]
fn halt() -> ! {
    std::process::exit(1)
}
