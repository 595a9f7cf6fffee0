//! Rolling two-day table of hourly prices.

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use itertools::Itertools;

use crate::{
    core::{hour::Hour, thresholds::Thresholds},
    prelude::*,
    quantity::price::KilowattHourPrice,
};

/// Single hourly price as published by the provider.
#[derive(Copy, Clone, Debug)]
pub struct HourlyPrice {
    /// Start of the hour, in the provider's own offset.
    pub starts_at: DateTime<FixedOffset>,

    pub price: KilowattHourPrice,
}

/// Hourly prices of one day.
///
/// `None` marks an entry that failed to parse: it still counts towards the day length.
pub type DayPrices = Vec<Option<HourlyPrice>>;

/// Prices returned by a single provider query.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct PriceSchedule {
    pub today: DayPrices,

    /// `None` until the provider publishes tomorrow's prices.
    pub tomorrow: Option<DayPrices>,
}

impl PriceSchedule {
    /// Build the schedule treating an empty tomorrow as not yet published.
    pub fn from_days(today: DayPrices, tomorrow: DayPrices) -> Self {
        Self { today, tomorrow: (!tomorrow.is_empty()).then_some(tomorrow) }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Day {
    #[display("today")]
    Today,

    #[display("tomorrow")]
    Tomorrow,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, derive_more::Display)]
pub enum TableState {
    #[default]
    #[display("uninitialized")]
    Uninitialized,

    #[display("today only")]
    TodayOnly,

    #[display("today and tomorrow")]
    TodayAndTomorrow,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error(
        "{day} has {n_entries} hourly prices instead of 24, irregular (daylight saving time) days are not supported"
    )]
    IrregularDay { day: Day, n_entries: usize },

    #[error("none of today's prices could be parsed")]
    NoValidEntries,
}

/// Prices relevant for a single decision.
#[derive(Copy, Clone, Debug)]
pub struct PriceSnapshot {
    pub current: KilowattHourPrice,
    pub next: KilowattHourPrice,

    /// Today's low percentile price.
    pub low: KilowattHourPrice,

    /// Today's high percentile price.
    pub high: KilowattHourPrice,
}

#[must_use]
#[derive(Clone, Debug, Default)]
pub struct PriceTable {
    today: [KilowattHourPrice; Hour::N_HOURS],
    tomorrow: [KilowattHourPrice; Hour::N_HOURS],
    state: TableState,
    last_fetched_at: Option<DateTime<Local>>,
}

impl PriceTable {
    pub const fn state(&self) -> TableState {
        self.state
    }

    pub const fn row(&self, day: Day) -> &[KilowattHourPrice; Hour::N_HOURS] {
        match day {
            Day::Today => &self.today,
            Day::Tomorrow => &self.tomorrow,
        }
    }

    /// Store the freshly fetched prices.
    ///
    /// The table is left untouched on error. Tomorrow is dropped, rather than rejected,
    /// when it does not have exactly 24 hours.
    pub fn ingest(
        &mut self,
        schedule: &PriceSchedule,
        now: DateTime<Local>,
    ) -> Result<TableState, IngestError> {
        Self::check_day_length(Day::Today, &schedule.today)?;

        let today = Self::valid_slots(Day::Today, &schedule.today);
        if today.is_empty() {
            return Err(IngestError::NoValidEntries);
        }
        let tomorrow = schedule
            .tomorrow
            .as_deref()
            .filter(|tomorrow| match Self::check_day_length(Day::Tomorrow, tomorrow) {
                Ok(()) => true,
                Err(error) => {
                    warn!("{error}, ignoring tomorrow");
                    false
                }
            })
            .map(|tomorrow| Self::valid_slots(Day::Tomorrow, tomorrow))
            .filter(|slots| {
                if slots.is_empty() {
                    warn!("none of tomorrow's prices could be parsed, ignoring tomorrow");
                }
                !slots.is_empty()
            });

        for (hour, price) in today {
            self.today[hour.index()] = price;
        }
        self.tomorrow = [KilowattHourPrice::ZERO; Hour::N_HOURS];
        self.state = match tomorrow {
            Some(slots) => {
                for (hour, price) in slots {
                    self.tomorrow[hour.index()] = price;
                }
                TableState::TodayAndTomorrow
            }
            None => TableState::TodayOnly,
        };
        self.last_fetched_at = Some(now);
        Ok(self.state)
    }

    /// Shift tomorrow's prices into today once the calendar date has changed.
    ///
    /// Returns whether the rotation took place.
    pub fn rotate_if_needed(&mut self, current_date: NaiveDate) -> bool {
        let is_next_day =
            self.last_fetched_at.is_some_and(|fetched_at| current_date > fetched_at.date_naive());
        if self.state == TableState::TodayAndTomorrow && is_next_day {
            self.today = self.tomorrow;
            self.tomorrow = [KilowattHourPrice::ZERO; Hour::N_HOURS];
            self.state = TableState::TodayOnly;
            true
        } else {
            false
        }
    }

    /// Forget the table state so that the next refresh is forced, keeping the prices.
    pub const fn invalidate(&mut self) {
        self.state = TableState::Uninitialized;
    }

    /// Whether today's row was fetched on an earlier date than `current_date`.
    pub fn is_stale(&self, current_date: NaiveDate) -> bool {
        self.last_fetched_at.is_none_or(|fetched_at| fetched_at.date_naive() < current_date)
    }

    /// Percentile of the day's prices, linearly interpolated between the closest ranks.
    ///
    /// `percentile` is clamped to `0..=100`.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentile(&self, day: Day, percentile: f64) -> KilowattHourPrice {
        let sorted = self.row(day).iter().copied().sorted().collect_vec();
        let rank = percentile.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
        let lower = sorted[rank.floor() as usize];
        let upper = sorted[rank.ceil() as usize];
        lower + (upper - lower) * rank.fract()
    }

    pub const fn price_at(&self, hour: Hour) -> KilowattHourPrice {
        self.today[hour.index()]
    }

    /// Price of the following hour, crossing into tomorrow's row after the last hour.
    pub fn next_hour_price(&self, hour: Hour) -> KilowattHourPrice {
        match hour.next() {
            Some(next_hour) => self.today[next_hour.index()],
            None if self.state == TableState::TodayAndTomorrow => self.tomorrow[0],
            None => KilowattHourPrice::ZERO,
        }
    }

    pub fn snapshot(&self, hour: Hour, thresholds: &Thresholds) -> PriceSnapshot {
        PriceSnapshot {
            current: self.price_at(hour),
            next: self.next_hour_price(hour),
            low: self.percentile(Day::Today, thresholds.low_price_percentile),
            high: self.percentile(Day::Today, thresholds.high_price_percentile),
        }
    }

    fn check_day_length(day: Day, prices: &[Option<HourlyPrice>]) -> Result<(), IngestError> {
        if prices.len() == Hour::N_HOURS {
            Ok(())
        } else {
            Err(IngestError::IrregularDay { day, n_entries: prices.len() })
        }
    }

    fn valid_slots(day: Day, prices: &[Option<HourlyPrice>]) -> Vec<(Hour, KilowattHourPrice)> {
        prices
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                if entry.is_none() {
                    warn!(%day, index, "skipping a malformed price entry");
                }
                entry.map(|entry| (Hour::of(&entry.starts_at), entry.price))
            })
            .collect()
    }
}
