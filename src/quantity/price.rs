use crate::quantity::{cost::Cost, energy::KilowattHours};

quantity!(
    /// Price of one kilowatt-hour in the currency of the price provider.
    KilowattHourPrice, via: f64, suffix: "¤/kWh", precision: 4
);

implement_mul!(KilowattHours, KilowattHourPrice, Cost);

impl KilowattHourPrice {
    /// Arithmetic mean of the two prices.
    pub fn midpoint(self, other: Self) -> Self {
        (self + other) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn energy_times_price_is_cost() {
        let cost = KilowattHours(1.25) * KilowattHourPrice(0.5);
        assert_abs_diff_eq!(cost.0, 0.625);
    }

    #[test]
    fn test_midpoint() {
        assert_abs_diff_eq!(KilowattHourPrice(0.4).midpoint(KilowattHourPrice(0.6)).0, 0.5);
    }

    #[test]
    fn prices_are_totally_ordered() {
        assert!(KilowattHourPrice(-0.01) < KilowattHourPrice::ZERO);
        assert_eq!(KilowattHourPrice(0.3).max(KilowattHourPrice(0.2)), KilowattHourPrice(0.3));
    }
}
