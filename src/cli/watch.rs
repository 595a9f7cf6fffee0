use std::time::Duration;

use chrono::Local;
use clap::Parser;
use reqwest::Url;
use tokio::{
    signal::unix::{SignalKind, signal},
    time::sleep,
};

use crate::{
    api::heartbeat,
    cli::{
        hue::{HueArgs, PlugArgs, SensorArgs},
        thresholds::ThresholdsArgs,
        tibber::TibberArgs,
    },
    core::{
        control::{ControlLoop, Timing},
        hour::Hour,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long, env = "POLLING_INTERVAL", default_value = "47s")]
    polling_interval: humantime::Duration,

    /// Pause after switching the heater on.
    #[clap(long, env = "DEBOUNCE_AFTER_ON", default_value = "10min")]
    debounce_after_on: humantime::Duration,

    /// Pause after switching the heater off.
    #[clap(long, env = "DEBOUNCE_AFTER_OFF", default_value = "2min")]
    debounce_after_off: humantime::Duration,

    /// Pause after the provider returned a day without exactly 24 hourly prices.
    #[clap(long, env = "ANOMALY_BACKOFF", default_value = "30min")]
    anomaly_backoff: humantime::Duration,

    /// Local hour after which tomorrow's prices are expected.
    #[clap(long = "price-publication-hour", env = "PRICE_PUBLICATION_HOUR", default_value = "13")]
    publication_hour: Hour,

    #[clap(flatten)]
    tibber: TibberArgs,

    #[clap(flatten)]
    hue: HueArgs,

    #[clap(flatten)]
    sensor: SensorArgs,

    #[clap(flatten)]
    plug: PlugArgs,

    #[clap(flatten)]
    thresholds: ThresholdsArgs,

    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    heartbeat_url: Option<Url>,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let thresholds = self.thresholds.build()?;
        let bridge = self.hue.connect()?;
        let timing = Timing::builder()
            .debounce_after_on(self.debounce_after_on.into())
            .debounce_after_off(self.debounce_after_off.into())
            .anomaly_backoff(self.anomaly_backoff.into())
            .publication_hour(self.publication_hour)
            .build();
        let mut control = ControlLoop::builder()
            .sensor(bridge.thermometer(self.sensor.name))
            .switch(bridge.plug(self.plug.name))
            .provider(self.tibber.new_client()?)
            .thresholds(thresholds)
            .timing(timing)
            .build();
        let heartbeat = heartbeat::Client::new(self.heartbeat_url)?;
        let polling_interval: Duration = self.polling_interval.into();

        // Registered upfront so that a signal during an iteration is not lost:
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        info!(?thresholds, ?timing, polling_interval = %self.polling_interval, "watching…");
        loop {
            let pause = control.iterate(Local::now()).await;
            heartbeat.send().await;

            let sleep_duration = polling_interval + pause;
            debug!(sleep_duration = %humantime::format_duration(sleep_duration), "sleeping…");
            tokio::select! {
                () = sleep(sleep_duration) => {}
                _ = interrupt.recv() => break,
                _ = terminate.recv() => break,
            }
        }

        info!("shutting down…");
        Ok(())
    }
}
