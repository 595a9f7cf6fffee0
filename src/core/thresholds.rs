use bon::Builder;

use crate::{
    prelude::*,
    quantity::{power::Watts, temperature::Celsius},
};

/// Comfort band, price percentiles and the heater rating.
#[must_use]
#[derive(Copy, Clone, Debug, Builder)]
pub struct Thresholds {
    /// Absolute floor: below it the heater is always on.
    pub min_temperature: Celsius,

    pub normal_min_temperature: Celsius,
    pub normal_max_temperature: Celsius,

    /// Absolute ceiling: above it the heater is always off.
    pub max_temperature: Celsius,

    /// Percentile of today's prices below which energy is considered cheap.
    pub low_price_percentile: f64,

    /// Percentile of today's prices above which energy is considered expensive.
    pub high_price_percentile: f64,

    pub heater_power: Watts,
}

impl Thresholds {
    pub fn validate(self) -> Result<Self> {
        ensure!(
            self.min_temperature < self.normal_min_temperature
                && self.normal_min_temperature < self.normal_max_temperature
                && self.normal_max_temperature < self.max_temperature,
            "temperatures must be strictly increasing: min ({}) < normal min ({}) < normal max ({}) < max ({})",
            self.min_temperature,
            self.normal_min_temperature,
            self.normal_max_temperature,
            self.max_temperature,
        );
        ensure!(
            (0.0..=100.0).contains(&self.low_price_percentile)
                && (0.0..=100.0).contains(&self.high_price_percentile),
            "price percentiles must be within 0..=100",
        );
        ensure!(
            self.low_price_percentile < self.high_price_percentile,
            "low price percentile ({}) must be lower than the high one ({})",
            self.low_price_percentile,
            self.high_price_percentile,
        );
        ensure!(self.heater_power > Watts::ZERO, "heater power must be positive");
        Ok(self)
    }
}
