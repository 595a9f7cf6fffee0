//! Single evaluation step: read the temperature, keep the prices fresh, decide and switch.

use std::time::Duration;

use bon::{Builder, bon};
use chrono::{DateTime, Local};

use crate::{
    core::{
        decision::decide,
        device::{Switch, TemperatureSensor},
        hour::Hour,
        power::Power,
        price_table::{IngestError, PriceTable, TableState},
        provider::PriceProvider,
        session::{SessionTracker, Transition},
        thresholds::Thresholds,
    },
    prelude::*,
    quantity::{price::KilowattHourPrice, temperature::Celsius},
};

#[must_use]
#[derive(Copy, Clone, Debug, Builder)]
pub struct Timing {
    /// Pause after switching the heater on.
    pub debounce_after_on: Duration,

    pub debounce_after_off: Duration,

    /// Pause after the provider returned an irregular day.
    pub anomaly_backoff: Duration,

    /// Hour after which tomorrow's prices are expected to be published.
    pub publication_hour: Hour,
}

pub struct ControlLoop<S, W, P> {
    sensor: S,
    switch: W,
    provider: P,
    thresholds: Thresholds,
    timing: Timing,
    price_table: PriceTable,
    tracker: SessionTracker,
    is_anomaly_detected: bool,
}

#[bon]
impl<S: TemperatureSensor, W: Switch, P: PriceProvider> ControlLoop<S, W, P> {
    #[builder]
    pub fn new(sensor: S, switch: W, provider: P, thresholds: Thresholds, timing: Timing) -> Self {
        Self {
            sensor,
            switch,
            provider,
            thresholds,
            timing,
            price_table: PriceTable::default(),
            tracker: SessionTracker::new(thresholds.heater_power),
            is_anomaly_detected: false,
        }
    }
}

impl<S: TemperatureSensor, W: Switch, P: PriceProvider> ControlLoop<S, W, P> {
    /// Run one evaluation and return the extra pause requested before the next one.
    ///
    /// Failures of the collaborators are logged and never propagated.
    #[instrument(skip_all, fields(now = %now.format("%F %T")))]
    pub async fn iterate(&mut self, now: DateTime<Local>) -> Duration {
        let temperature = match self.sensor.read_temperature().await {
            Ok(temperature) => temperature,
            Err(error) => {
                error!("failed to read the temperature, skipping the iteration: {error:#}");
                return Duration::ZERO;
            }
        };

        if self.price_table.rotate_if_needed(now.date_naive()) {
            info!("rotated tomorrow's prices into today");
        }
        let backoff =
            if self.should_refresh(now) { self.refresh(now).await } else { Duration::ZERO };

        let hour = Hour::of(&now);
        let prices = self.price_table.snapshot(hour, &self.thresholds);
        let decision = decide(temperature, &prices, &self.thresholds);
        info!(
            rule = %decision.reason,
            power = %decision.power,
            %temperature,
            current_price = %prices.current,
            next_price = %prices.next,
            low_percentile = %prices.low,
            high_percentile = %prices.high,
            "evaluated",
        );

        backoff + self.apply(decision.power, prices.current, temperature, now).await
    }

    fn should_refresh(&self, now: DateTime<Local>) -> bool {
        if self.is_anomaly_detected {
            return true;
        }
        match self.price_table.state() {
            TableState::Uninitialized => true,
            TableState::TodayOnly => {
                Hour::of(&now) >= self.timing.publication_hour
                    || self.price_table.is_stale(now.date_naive())
            }
            TableState::TodayAndTomorrow => false,
        }
    }

    /// Fetch and ingest the prices, returning the backoff pause on an irregular day.
    async fn refresh(&mut self, now: DateTime<Local>) -> Duration {
        let schedule = match self.provider.get_prices().await {
            Ok(schedule) => schedule,
            Err(error) => {
                warn!("failed to fetch the prices, keeping the old ones: {error:#}");
                return Duration::ZERO;
            }
        };
        match self.price_table.ingest(&schedule, now) {
            Ok(state) => {
                self.is_anomaly_detected = false;
                info!(%state, "ingested the prices");
                Duration::ZERO
            }
            Err(error @ IngestError::IrregularDay { .. }) => {
                error!(
                    backoff = %humantime::format_duration(self.timing.anomaly_backoff),
                    "{error}, backing off",
                );
                self.price_table.invalidate();
                self.is_anomaly_detected = true;
                self.timing.anomaly_backoff
            }
            Err(error @ IngestError::NoValidEntries) => {
                error!("{error}, keeping the old prices");
                Duration::ZERO
            }
        }
    }

    /// Switch the plug if needed and return the debounce pause.
    async fn apply(
        &mut self,
        directive: Power,
        price: KilowattHourPrice,
        temperature: Celsius,
        now: DateTime<Local>,
    ) -> Duration {
        let actual = match self.switch.power().await {
            Ok(actual) => actual,
            Err(error) => {
                error!("failed to read the plug state: {error:#}");
                return Duration::ZERO;
            }
        };
        if directive != actual
            && let Err(error) = self.switch.set_power(directive).await
        {
            error!(%directive, "failed to switch the plug: {error:#}");
            return Duration::ZERO;
        }
        let transition = self.tracker.apply(directive, actual, price, temperature, now);
        debug!(session = ?self.tracker.session());
        match transition {
            Transition::Unchanged => Duration::ZERO,
            Transition::SwitchedOn => {
                info!(%price, %temperature, "switched the heater on");
                self.timing.debounce_after_on
            }
            Transition::SwitchedOff(report) => {
                info!(
                    %price,
                    cost = %report.cost,
                    start_temperature = ?report.start_temperature,
                    end_temperature = %report.end_temperature,
                    elapsed = %report.elapsed,
                    "switched the heater off",
                );
                self.timing.debounce_after_off
            }
        }
    }
}
