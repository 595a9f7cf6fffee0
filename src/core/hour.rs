use std::fmt::{Display, Formatter};

use chrono::Timelike;

use crate::prelude::*;

/// Hour of the day, always within `0..24`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Hour(u8);

impl Hour {
    pub const N_HOURS: usize = 24;

    /// Hour of the wall-clock time.
    #[expect(clippy::cast_possible_truncation)]
    pub fn of(time: &impl Timelike) -> Self {
        // `Timelike::hour()` is guaranteed to be within `0..24`.
        Self(time.hour() as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The following hour of the same day, `None` for the last hour.
    pub const fn next(self) -> Option<Self> {
        if self.0 + 1 < 24 { Some(Self(self.0 + 1)) } else { None }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..24).map(Self)
    }
}

impl TryFrom<u32> for Hour {
    type Error = Error;

    fn try_from(hour: u32) -> Result<Self> {
        ensure!(hour < 24, "hour `{hour}` is out of range");
        Ok(Self(u8::try_from(hour)?))
    }
}

impl std::str::FromStr for Hour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s.parse::<u32>()?)
    }
}

impl Display for Hour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}
