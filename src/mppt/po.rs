use crate::config::MpptConfig;

/// One perturb and observe update of the duty cycle.
///
/// Lowering the duty cycle raises the panel voltage on this converter, so a power gain
/// while the voltage rose keeps lowering the duty cycle and a power loss reverses it.
/// Changes with no voltage movement leave the duty cycle alone.
pub fn iteration(
    prev_output: f32,
    voltage: f32,
    power: f32,
    prev_voltage: f32,
    prev_power: f32,
    config: &MpptConfig,
) -> f32 {
    let dv = voltage - prev_voltage;
    let dp = power - prev_power;

    log::debug!("dv: {dv}, dp: {dp}");

    let mut output = prev_output;

    if dp.abs() > config.dead_band {
        if dp > 0.0 {
            if dv > 0.0 {
                output -= config.step;
            } else if dv < 0.0 {
                output += config.step;
            }
        } else if dv > 0.0 {
            output += config.step;
        } else if dv < 0.0 {
            output -= config.step;
        }
    }

    output.clamp(config.min_duty, config.max_duty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: MpptConfig = MpptConfig::DEFAULT;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn sign_table() {
        // (dp, dv, expected change)
        let cases = [
            (1.0, 1.0, -CONFIG.step),
            (1.0, -1.0, CONFIG.step),
            (-1.0, 1.0, CONFIG.step),
            (-1.0, -1.0, -CONFIG.step),
        ];

        for (dp, dv, change) in cases {
            let output = iteration(0.5, 5.0 + dv, 2.0 + dp, 5.0, 2.0, &CONFIG);
            assert!(
                close(output, 0.5 + change),
                "dp {dp} dv {dv}: got {output}"
            );
        }
    }

    #[test]
    fn unchanged_voltage_does_not_perturb() {
        assert_eq!(iteration(0.5, 5.0, 3.0, 5.0, 2.0, &CONFIG), 0.5);
        assert_eq!(iteration(0.5, 5.0, 1.0, 5.0, 2.0, &CONFIG), 0.5);
    }

    #[test]
    fn dead_band_is_inclusive() {
        assert_eq!(iteration(0.5, 6.0, 2.0005, 5.0, 2.0, &CONFIG), 0.5);
        assert_eq!(iteration(0.5, 4.0, 1.9995, 5.0, 2.0, &CONFIG), 0.5);
        assert_eq!(iteration(0.5, 6.0, 1.0, 5.0, 1.0, &CONFIG), 0.5);
        assert!(close(iteration(0.5, 6.0, 2.01, 5.0, 2.0, &CONFIG), 0.49));
    }

    #[test]
    fn output_is_clamped() {
        // dp < 0, dv < 0 pushes down, dp < 0, dv > 0 pushes up.
        assert_eq!(iteration(0.0, 4.0, 1.0, 5.0, 2.0, &CONFIG), 0.0);
        assert_eq!(iteration(0.9, 6.0, 1.0, 5.0, 2.0, &CONFIG), 0.9);
        assert_eq!(iteration(0.899, 6.0, 1.0, 5.0, 2.0, &CONFIG), 0.9);
    }

    #[test]
    fn custom_tuning() {
        let config = MpptConfig {
            step: 0.05,
            dead_band: 0.5,
            ..MpptConfig::DEFAULT
        };
        assert_eq!(iteration(0.5, 6.0, 2.4, 5.0, 2.0, &config), 0.5);
        assert!(close(iteration(0.5, 6.0, 2.6, 5.0, 2.0, &config), 0.45));
    }
}
