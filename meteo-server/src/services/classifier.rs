//! Rule-based labels derived from the latest readings.
//!
//! Every function is total: an absent or non-finite input, or a value below every
//! stated range, falls through to the default label.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ressenti {
    Froid,
    Doux,
    Chaud,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    Nuit,
    Soir,
    Jour,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Pluvieux,
    Nuageux,
    Ensoleille,
    Neigeux,
    Normal,
}

impl Ressenti {
    pub fn label(&self) -> &'static str {
        match self {
            Ressenti::Froid => "froid",
            Ressenti::Doux => "doux",
            Ressenti::Chaud => "chaud",
            Ressenti::Unknown => "unknown",
        }
    }
}

impl DayPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::Nuit => "Nuit",
            DayPeriod::Soir => "Soir",
            DayPeriod::Jour => "Jour",
            DayPeriod::Unknown => "unknown",
        }
    }
}

impl WeatherCondition {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Pluvieux => "Pluvieux",
            WeatherCondition::Nuageux => "Nuageux",
            WeatherCondition::Ensoleille => "Ensoleillé",
            WeatherCondition::Neigeux => "Neigeux",
            WeatherCondition::Normal => "Temps normal",
        }
    }
}

macro_rules! impl_display_label {
    ($($label:ty),*) => {
        $(
            impl fmt::Display for $label {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

impl_display_label!(Ressenti, DayPeriod, WeatherCondition);

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Feels-like label from the temperature in Celsius.
pub fn ressenti(temperature: Option<f64>) -> Ressenti {
    match finite(temperature) {
        Some(t) if (0.0..=20.0).contains(&t) => Ressenti::Froid,
        Some(t) if t > 20.0 && t <= 25.0 => Ressenti::Doux,
        Some(t) if t > 25.0 => Ressenti::Chaud,
        _ => Ressenti::Unknown,
    }
}

/// Period of the day from the luminosity percentage.
pub fn period_of_day(luminosity: Option<f64>) -> DayPeriod {
    match finite(luminosity) {
        Some(l) if (0.0..=20.0).contains(&l) => DayPeriod::Nuit,
        Some(l) if l > 20.0 && l <= 50.0 => DayPeriod::Soir,
        Some(l) if l > 50.0 => DayPeriod::Jour,
        _ => DayPeriod::Unknown,
    }
}

/// Ordered decision list, first match wins. The ranges overlap, so the rule order
/// decides ties and must stay as is.
pub fn weather_condition(temperature: Option<f64>, humidity: Option<f64>, luminosity: Option<f64>) -> WeatherCondition {
    let (Some(t), Some(h), Some(l)) = (finite(temperature), finite(humidity), finite(luminosity)) else {
        return WeatherCondition::Normal;
    };

    if t <= 20.0 && h >= 80.0 && l <= 50.0 {
        WeatherCondition::Pluvieux
    } else if t > 20.0 && h >= 50.0 && l >= 50.0 {
        WeatherCondition::Nuageux
    } else if t >= 20.0 && h <= 50.0 && l > 80.0 {
        WeatherCondition::Ensoleille
    } else if t <= 0.0 && (30.0..=70.0).contains(&l) && h >= 80.0 {
        WeatherCondition::Neigeux
    } else {
        WeatherCondition::Normal
    }
}
