use crate::quantity::{energy::KilowattHours, time::Hours};

quantity!(Watts, via: f64, suffix: "W", precision: 0);
quantity!(Kilowatts, via: f64, suffix: "kW", precision: 3);

impl From<Watts> for Kilowatts {
    fn from(watts: Watts) -> Self {
        Self(watts.0 / 1000.0)
    }
}

implement_mul!(Kilowatts, Hours, KilowattHours);

impl std::ops::Mul<Hours> for Watts {
    type Output = KilowattHours;

    fn mul(self, hours: Hours) -> Self::Output {
        Kilowatts::from(self) * hours
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn watts_over_hours_is_energy() {
        assert_abs_diff_eq!((Watts(1250.0) * Hours(0.25)).0, 0.3125);
    }

    #[test]
    fn parse_watts_ok() -> crate::prelude::Result {
        assert_eq!("1250".parse::<Watts>()?, Watts(1250.0));
        Ok(())
    }
}
