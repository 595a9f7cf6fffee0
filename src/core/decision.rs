//! Heater power decision: an ordered list of rules where the first matching one wins.
//!
//! Safety limits dominate the price extremes, which dominate the comfort band,
//! which dominates the short-horizon comparison with the next hour's price.

use crate::{
    core::{power::Power, price_table::PriceSnapshot, thresholds::Thresholds},
    quantity::temperature::Celsius,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Reason {
    #[display("temperature is below the absolute minimum")]
    BelowMinTemperature,

    #[display("temperature is above the absolute maximum")]
    AboveMaxTemperature,

    #[display("price is below today's low percentile")]
    BelowLowPercentile,

    #[display("price is above today's high percentile")]
    AboveHighPercentile,

    #[display("temperature is below the normal minimum")]
    BelowNormalMinTemperature,

    #[display("temperature is above the normal maximum")]
    AboveNormalMaxTemperature,

    #[display("price is lower than the next hour's")]
    CheaperThanNextHour,

    #[display("price is higher than the next hour's")]
    PricierThanNextHour,

    #[display("nothing to gain, staying off")]
    Indifferent,
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    pub power: Power,
    pub reason: Reason,
}

struct Rule {
    reason: Reason,
    power: Power,
    applies: fn(Celsius, &PriceSnapshot, &Thresholds) -> bool,
}

const RULES: [Rule; 8] = [
    Rule {
        reason: Reason::BelowMinTemperature,
        power: Power::On,
        applies: |temperature, _, thresholds| temperature < thresholds.min_temperature,
    },
    Rule {
        reason: Reason::AboveMaxTemperature,
        power: Power::Off,
        applies: |temperature, _, thresholds| temperature > thresholds.max_temperature,
    },
    Rule {
        reason: Reason::BelowLowPercentile,
        power: Power::On,
        applies: |_, prices, _| prices.current < prices.low,
    },
    Rule {
        reason: Reason::AboveHighPercentile,
        power: Power::Off,
        applies: |_, prices, _| prices.current > prices.high,
    },
    Rule {
        reason: Reason::BelowNormalMinTemperature,
        power: Power::On,
        applies: |temperature, _, thresholds| temperature < thresholds.normal_min_temperature,
    },
    Rule {
        reason: Reason::AboveNormalMaxTemperature,
        power: Power::Off,
        applies: |temperature, _, thresholds| temperature > thresholds.normal_max_temperature,
    },
    Rule {
        reason: Reason::CheaperThanNextHour,
        power: Power::On,
        applies: |_, prices, _| prices.current < prices.next,
    },
    Rule {
        reason: Reason::PricierThanNextHour,
        power: Power::Off,
        applies: |_, prices, _| prices.current > prices.next,
    },
];

const FALLBACK: Decision = Decision { power: Power::Off, reason: Reason::Indifferent };

pub fn decide(temperature: Celsius, prices: &PriceSnapshot, thresholds: &Thresholds) -> Decision {
    RULES
        .iter()
        .find(|rule| (rule.applies)(temperature, prices, thresholds))
        .map_or(FALLBACK, |rule| Decision { power: rule.power, reason: rule.reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::thresholds::tests::thresholds, quantity::price::KilowattHourPrice};

    /// Prices that trigger none of the price rules.
    const NEUTRAL: PriceSnapshot = PriceSnapshot {
        current: KilowattHourPrice(0.5),
        next: KilowattHourPrice(0.5),
        low: KilowattHourPrice(0.3),
        high: KilowattHourPrice(0.7),
    };

    /// Temperature within the normal band.
    const COMFORTABLE: Celsius = Celsius(5.5);

    fn decide_with(temperature: Celsius, prices: PriceSnapshot) -> Decision {
        decide(temperature, &prices, &thresholds())
    }

    fn with_current(current: f64) -> PriceSnapshot {
        PriceSnapshot { current: KilowattHourPrice(current), ..NEUTRAL }
    }

    fn with_next(next: f64) -> PriceSnapshot {
        PriceSnapshot { next: KilowattHourPrice(next), ..NEUTRAL }
    }

    #[test]
    fn neutral_inputs_fall_back_to_off() {
        assert_eq!(decide_with(COMFORTABLE, NEUTRAL), FALLBACK);
    }

    #[test]
    fn below_min_temperature_wins_over_everything() {
        let decision = decide_with(Celsius(1.0), with_current(100.0));
        assert_eq!(decision, Decision { power: Power::On, reason: Reason::BelowMinTemperature });
    }

    #[test]
    fn above_max_temperature_wins_over_cheap_price() {
        let decision = decide_with(Celsius(10.5), with_current(0.0));
        assert_eq!(decision, Decision { power: Power::Off, reason: Reason::AboveMaxTemperature });
    }

    #[test]
    fn cheap_price_wins_over_comfort_band() {
        let decision = decide_with(Celsius(9.0), with_current(0.1));
        assert_eq!(decision, Decision { power: Power::On, reason: Reason::BelowLowPercentile });
    }

    #[test]
    fn expensive_price_wins_over_comfort_band() {
        let decision = decide_with(Celsius(3.0), with_current(0.9));
        assert_eq!(decision, Decision { power: Power::Off, reason: Reason::AboveHighPercentile });
    }

    #[test]
    fn below_normal_min_temperature_wins_over_next_hour() {
        let decision = decide_with(Celsius(3.0), with_next(0.4));
        assert_eq!(
            decision,
            Decision { power: Power::On, reason: Reason::BelowNormalMinTemperature },
        );
    }

    #[test]
    fn above_normal_max_temperature_wins_over_next_hour() {
        let decision = decide_with(Celsius(8.0), with_next(0.6));
        assert_eq!(
            decision,
            Decision { power: Power::Off, reason: Reason::AboveNormalMaxTemperature },
        );
    }

    #[test]
    fn cheaper_than_next_hour() {
        let decision = decide_with(COMFORTABLE, with_next(0.6));
        assert_eq!(decision, Decision { power: Power::On, reason: Reason::CheaperThanNextHour });
    }

    #[test]
    fn pricier_than_next_hour() {
        let decision = decide_with(COMFORTABLE, with_next(0.4));
        assert_eq!(decision, Decision { power: Power::Off, reason: Reason::PricierThanNextHour });
    }

    #[test]
    fn temperature_comparisons_are_strict() {
        // Exactly on a threshold, the next rules decide:
        assert_eq!(decide_with(Celsius(2.0), with_current(0.9)).reason, Reason::AboveHighPercentile);
        assert_eq!(decide_with(Celsius(10.0), with_current(0.1)).reason, Reason::BelowLowPercentile);
        assert_eq!(decide_with(Celsius(4.0), with_next(0.6)).reason, Reason::CheaperThanNextHour);
        assert_eq!(decide_with(Celsius(7.0), with_next(0.4)).reason, Reason::PricierThanNextHour);
    }

    #[test]
    fn price_comparisons_are_strict() {
        assert_eq!(decide_with(Celsius(3.0), with_current(0.3)).reason, Reason::BelowNormalMinTemperature);
        assert_eq!(decide_with(Celsius(8.0), with_current(0.7)).reason, Reason::AboveNormalMaxTemperature);
        assert_eq!(decide_with(COMFORTABLE, with_next(0.5)).reason, Reason::Indifferent);
    }

    #[test]
    fn floor_wins_with_uninitialized_prices() {
        let prices = PriceSnapshot {
            current: KilowattHourPrice::ZERO,
            next: KilowattHourPrice::ZERO,
            low: KilowattHourPrice::ZERO,
            high: KilowattHourPrice::ZERO,
        };
        assert_eq!(decide_with(Celsius(1.0), prices).power, Power::On);
        assert_eq!(decide_with(COMFORTABLE, prices).reason, Reason::Indifferent);
    }

    /// Every input combination matches the first applicable rule in the list.
    #[test]
    fn first_applicable_rule_wins() {
        let temperatures = [1.0, 2.0, 3.0, 4.0, 5.5, 7.0, 8.0, 10.0, 11.0].map(Celsius);
        let prices = [0.1, 0.3, 0.4, 0.5, 0.6, 0.7, 0.9].map(KilowattHourPrice);
        for temperature in temperatures {
            for current in prices {
                for next in prices {
                    let snapshot = PriceSnapshot { current, next, ..NEUTRAL };
                    let decision = decide_with(temperature, snapshot);
                    let expected = RULES
                        .iter()
                        .position(|rule| (rule.applies)(temperature, &snapshot, &thresholds()));
                    match expected {
                        Some(index) => {
                            assert_eq!(decision.reason, RULES[index].reason);
                            assert_eq!(decision.power, RULES[index].power);
                        }
                        None => assert_eq!(decision, FALLBACK),
                    }
                }
            }
        }
    }
}
