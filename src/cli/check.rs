use chrono::Local;
use clap::{Parser, Subcommand};

use crate::{
    cli::{
        hue::{HueArgs, PlugArgs, SensorArgs},
        thresholds::ThresholdsArgs,
        tibber::TibberArgs,
    },
    core::{
        device::{Switch, TemperatureSensor},
        power::Power,
        price_table::PriceTable,
        provider::PriceProvider,
    },
    prelude::*,
    tables::build_price_table,
};

#[derive(Parser)]
pub struct CheckArgs {
    #[command(subcommand)]
    command: CheckCommand,
}

impl CheckArgs {
    pub async fn run(self) -> Result {
        match self.command {
            CheckCommand::Prices(args) => args.run().await,
            CheckCommand::Temperature(args) => args.run().await,
            CheckCommand::Switch(args) => args.run().await,
        }
    }
}

#[derive(Subcommand)]
pub enum CheckCommand {
    /// Fetch the prices and print them along with today's percentiles.
    Prices(CheckPricesArgs),

    /// Read the temperature sensor.
    Temperature(CheckTemperatureArgs),

    /// Print, and optionally change, the plug state.
    Switch(CheckSwitchArgs),
}

#[derive(Parser)]
pub struct CheckPricesArgs {
    #[clap(flatten)]
    tibber: TibberArgs,

    #[clap(flatten)]
    thresholds: ThresholdsArgs,
}

impl CheckPricesArgs {
    async fn run(self) -> Result {
        let thresholds = self.thresholds.build()?;
        let schedule = self.tibber.new_client()?.get_prices().await?;
        let mut price_table = PriceTable::default();
        let state = price_table.ingest(&schedule, Local::now())?;
        info!(%state, "ingested");
        println!("{}", build_price_table(&price_table, &thresholds));
        Ok(())
    }
}

#[derive(Parser)]
pub struct CheckTemperatureArgs {
    #[clap(flatten)]
    hue: HueArgs,

    #[clap(flatten)]
    sensor: SensorArgs,
}

impl CheckTemperatureArgs {
    async fn run(self) -> Result {
        let temperature = self.hue.connect()?.thermometer(self.sensor.name).read_temperature().await?;
        info!(%temperature, "gotcha");
        Ok(())
    }
}

#[derive(Parser)]
pub struct CheckSwitchArgs {
    #[clap(flatten)]
    hue: HueArgs,

    #[clap(flatten)]
    plug: PlugArgs,

    /// Switch the plug to this state.
    #[clap(long)]
    set: Option<Power>,
}

impl CheckSwitchArgs {
    async fn run(self) -> Result {
        let plug = self.hue.connect()?.plug(self.plug.name);
        if let Some(power) = self.set {
            plug.set_power(power).await?;
            info!(%power, "switched");
        }
        let power = plug.power().await?;
        info!(%power, "gotcha");
        Ok(())
    }
}
