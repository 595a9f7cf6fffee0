/// Heater power directive and the plug state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, clap::ValueEnum, derive_more::Display)]
pub enum Power {
    #[display("on")]
    On,

    #[display("off")]
    Off,
}

impl Power {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for Power {
    fn from(is_on: bool) -> Self {
        if is_on { Self::On } else { Self::Off }
    }
}

impl From<Power> for bool {
    fn from(power: Power) -> Self {
        power.is_on()
    }
}
