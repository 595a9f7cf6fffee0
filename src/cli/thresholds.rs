use clap::Parser;

use crate::{
    core::thresholds::Thresholds,
    prelude::*,
    quantity::{power::Watts, temperature::Celsius},
};

#[derive(Copy, Clone, Parser)]
pub struct ThresholdsArgs {
    /// Below this temperature, the heater is always on.
    #[clap(long, env = "MIN_TEMPERATURE", default_value = "2", allow_negative_numbers = true)]
    min_temperature: Celsius,

    #[clap(
        long,
        env = "NORMAL_MIN_TEMPERATURE",
        default_value = "4",
        allow_negative_numbers = true
    )]
    normal_min_temperature: Celsius,

    #[clap(
        long,
        env = "NORMAL_MAX_TEMPERATURE",
        default_value = "7",
        allow_negative_numbers = true
    )]
    normal_max_temperature: Celsius,

    /// Above this temperature, the heater is always off.
    #[clap(long, env = "MAX_TEMPERATURE", default_value = "10", allow_negative_numbers = true)]
    max_temperature: Celsius,

    /// Today's price percentile below which the heater is turned on.
    #[clap(long, env = "LOW_PRICE_PERCENTILE", default_value = "15")]
    low_price_percentile: f64,

    /// Today's price percentile above which the heater is turned off.
    #[clap(long, env = "HIGH_PRICE_PERCENTILE", default_value = "70")]
    high_price_percentile: f64,

    /// Rated heater power, used for the cost estimates.
    #[clap(long = "heater-power-watts", env = "HEATER_POWER_WATTS", default_value = "1250")]
    heater_power: Watts,
}

impl ThresholdsArgs {
    pub fn build(self) -> Result<Thresholds> {
        Thresholds::builder()
            .min_temperature(self.min_temperature)
            .normal_min_temperature(self.normal_min_temperature)
            .normal_max_temperature(self.normal_max_temperature)
            .max_temperature(self.max_temperature)
            .low_price_percentile(self.low_price_percentile)
            .high_price_percentile(self.high_price_percentile)
            .heater_power(self.heater_power)
            .build()
            .validate()
            .context("invalid thresholds")
    }
}
