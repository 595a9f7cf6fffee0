use std::fmt::{Debug, Display, Formatter};

use chrono::TimeDelta;

/// Renders the duration as `HH:MM:SS`, hours are not wrapped at 24. Negative durations render as zero.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct FormattedDuration(pub TimeDelta);

impl Debug for FormattedDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let total_seconds = u64::try_from(self.0.num_seconds()).unwrap_or_default();
        write!(
            f,
            "{:02}:{:02}:{:02}",
            total_seconds / 3600,
            total_seconds % 3600 / 60,
            total_seconds % 60,
        )
    }
}
