quantity!(
    /// Temperature in degrees Celsius.
    Celsius, via: f64, suffix: "°C", precision: 2
);

impl Celsius {
    /// Convert the Hue sensor reading, which comes in hundredths of a degree.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_centidegrees(centidegrees: i64) -> Self {
        Self(centidegrees as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_centidegrees() {
        assert_abs_diff_eq!(Celsius::from_centidegrees(2134).0, 21.34);
        assert_abs_diff_eq!(Celsius::from_centidegrees(-150).0, -1.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Celsius(4.5).to_string(), "4.50 °C");
    }
}
