use async_trait::async_trait;

use crate::{core::price_table::PriceSchedule, prelude::*};

#[async_trait]
pub trait PriceProvider: Sync {
    /// Fetch today's and, when already published, tomorrow's hourly prices.
    async fn get_prices(&self) -> Result<PriceSchedule>;
}
