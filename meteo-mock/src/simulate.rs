use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Light level as a percentage over one day.
pub fn simulated_luminosity(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    const MAX_DAYLIGHT: f64 = 100.0;
    const MAX_MOONLIGHT: f64 = 5.0;

    const SUNRISE_START: f64 = 0.23;
    const SUNRISE_END: f64 = 0.30;
    const SUNSET_START: f64 = 0.70;
    const SUNSET_END: f64 = 0.77;

    if (SUNRISE_START..=SUNSET_END).contains(&day_fraction) {
        if day_fraction <= SUNRISE_END {
            let sunrise = (day_fraction - SUNRISE_START) / (SUNRISE_END - SUNRISE_START) * FRAC_PI_2;
            (sunrise.sin() * MAX_DAYLIGHT).max(MAX_MOONLIGHT)
        } else if day_fraction >= SUNSET_START {
            let sunset = (day_fraction - SUNSET_START) / (SUNSET_END - SUNSET_START) * FRAC_PI_2;
            (sunset.cos() * MAX_DAYLIGHT).max(MAX_MOONLIGHT)
        } else {
            MAX_DAYLIGHT
        }
    } else {
        // Moonlight peaks at midnight
        (radians.cos().max(0.0) * MAX_MOONLIGHT).max(0.1)
    }
}

/// Humidity percentage, wetter at night.
pub fn simulated_humidity(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    if (0.3..=0.7).contains(&day_fraction) {
        (65.0 - radians.sin().max(0.0) * 20.0).round()
    } else {
        (radians.cos().max(0.0) * 25.0 + 65.0).round()
    }
}

/// Temperature in Celsius, coldest before dawn and warmest mid-afternoon.
pub fn simulated_temperature(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    16.0 - 9.0 * (radians - FRAC_PI_4).cos()
}
