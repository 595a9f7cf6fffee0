//! Heating session bookkeeping and the energy cost estimate of each on/off cycle.

use chrono::{DateTime, Local, TimeDelta, Timelike};

use crate::{
    core::power::Power,
    fmt::FormattedDuration,
    quantity::{cost::Cost, power::Watts, price::KilowattHourPrice, temperature::Celsius, time::Hours},
};

/// Moment the plug was switched.
#[derive(Copy, Clone, Debug)]
pub struct SwitchEvent {
    pub at: DateTime<Local>,
    pub price: KilowattHourPrice,
    pub temperature: Celsius,
}

/// Current heating cycle, overwritten in place by every following one.
#[must_use]
#[derive(Copy, Clone, Debug, Default)]
pub struct PowerSession {
    /// `None` until the heater is switched on by us.
    pub on: Option<SwitchEvent>,

    pub off: Option<SwitchEvent>,
}

#[derive(Copy, Clone, Debug)]
pub struct CostReport {
    pub cost: Cost,

    /// `None` when the heater had been switched on before we saw it.
    pub start_temperature: Option<Celsius>,

    pub end_temperature: Celsius,
    pub elapsed: FormattedDuration,
}

#[derive(Copy, Clone, Debug)]
pub enum Transition {
    Unchanged,
    SwitchedOn,
    SwitchedOff(CostReport),
}

#[must_use]
pub struct SessionTracker {
    heater_power: Watts,
    session: PowerSession,
}

impl SessionTracker {
    pub fn new(heater_power: Watts) -> Self {
        Self { heater_power, session: PowerSession::default() }
    }

    pub const fn session(&self) -> &PowerSession {
        &self.session
    }

    /// Record the directive unless the plug is already in the requested state.
    pub fn apply(
        &mut self,
        directive: Power,
        actual: Power,
        price: KilowattHourPrice,
        temperature: Celsius,
        now: DateTime<Local>,
    ) -> Transition {
        if directive == actual {
            return Transition::Unchanged;
        }
        let event = SwitchEvent { at: now, price, temperature };
        match directive {
            Power::On => {
                self.session = PowerSession { on: Some(event), off: None };
                Transition::SwitchedOn
            }
            Power::Off => {
                let off = *self.session.off.insert(event);
                let report = self.session.on.take().map_or(
                    CostReport {
                        cost: Cost::ZERO,
                        start_temperature: None,
                        end_temperature: temperature,
                        elapsed: FormattedDuration(TimeDelta::zero()),
                    },
                    |on| CostReport {
                        cost: estimate_cost(&on, &off, self.heater_power),
                        start_temperature: Some(on.temperature),
                        end_temperature: temperature,
                        elapsed: FormattedDuration(off.at - on.at),
                    },
                );
                Transition::SwitchedOff(report)
            }
        }
    }
}

/// Estimate the cost of the heater running between the two events.
///
/// Exact for sessions within one clock hour or crossing a single hour boundary.
/// Longer sessions are approximated with the mean of the two known prices,
/// since the prices of the hours in between are not tracked.
pub fn estimate_cost(on: &SwitchEvent, off: &SwitchEvent, heater_power: Watts) -> Cost {
    let elapsed = (off.at - on.at).max(TimeDelta::zero());
    let hours = start_of_hour(on.at)
        .zip(start_of_hour(off.at))
        .map(|(on_hour, off_hour)| (off_hour, (off_hour - on_hour).num_hours()));
    match hours {
        Some((_, 0)) => heater_power * Hours::from(elapsed) * off.price,
        Some((boundary, 1)) => {
            heater_power * Hours::from(boundary - on.at) * on.price
                + heater_power * Hours::from(off.at - boundary) * off.price
        }
        _ => heater_power * Hours::from(elapsed) * on.price.midpoint(off.price),
    }
}

fn start_of_hour(time: DateTime<Local>) -> Option<DateTime<Local>> {
    time.with_minute(0)?.with_second(0)?.with_nanosecond(0)
}
