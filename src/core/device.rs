use async_trait::async_trait;

use crate::{core::power::Power, prelude::*, quantity::temperature::Celsius};

#[async_trait]
pub trait TemperatureSensor: Sync {
    async fn read_temperature(&self) -> Result<Celsius>;
}

/// Smart plug powering the heater.
#[async_trait]
pub trait Switch: Sync {
    async fn power(&self) -> Result<Power>;

    async fn set_power(&self, power: Power) -> Result;
}
